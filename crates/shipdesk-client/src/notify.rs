//! User-facing notices.
//!
//! A notice stays active until dismissed. Posting a notice with the same
//! level and message as an active one does nothing, so a burst of identical
//! failures shows up once.

use tracing::{info, warn};

use crate::error::{ApiError, ErrorKind};

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    /// An operation succeeded.
    Success,
    /// An operation failed.
    Error,
    /// Something needs attention.
    Warning,
    /// Neutral information.
    Info,
}

impl Level {
    /// Returns the level name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

/// One notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Identity used for de-duplication: `level-message`.
    pub id: String,
    /// Severity.
    pub level: Level,
    /// Text shown to the user.
    pub message: String,
}

/// Queue of active notices.
#[derive(Debug, Clone, Default)]
pub struct Notifier {
    active: Vec<Notice>,
}

impl Notifier {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Posts a notice. Returns false if an identical notice is active.
    pub fn notify(&mut self, level: Level, message: impl Into<String>) -> bool {
        let message = message.into();
        let id = format!("{}-{message}", level.as_str());
        if self.active.iter().any(|n| n.id == id) {
            return false;
        }
        match level {
            Level::Error | Level::Warning => warn!(level = level.as_str(), "{message}"),
            Level::Success | Level::Info => info!(level = level.as_str(), "{message}"),
        }
        self.active.push(Notice { id, level, message });
        true
    }

    /// Posts a success notice.
    pub fn success(&mut self, message: impl Into<String>) -> bool {
        self.notify(Level::Success, message)
    }

    /// Posts an error notice.
    pub fn error(&mut self, message: impl Into<String>) -> bool {
        self.notify(Level::Error, message)
    }

    /// Posts a warning notice.
    pub fn warning(&mut self, message: impl Into<String>) -> bool {
        self.notify(Level::Warning, message)
    }

    /// Posts an info notice.
    pub fn info(&mut self, message: impl Into<String>) -> bool {
        self.notify(Level::Info, message)
    }

    /// Posts the user message of an API error. Cancellations are silent.
    pub fn api_error(&mut self, error: &ApiError) -> bool {
        if error.kind() == ErrorKind::Cancelled {
            return false;
        }
        self.error(error.user_message())
    }

    /// Removes a notice. Returns whether it was active.
    pub fn dismiss(&mut self, id: &str) -> bool {
        let before = self.active.len();
        self.active.retain(|n| n.id != id);
        self.active.len() != before
    }

    /// Returns the active notices, oldest first.
    #[must_use]
    pub fn active(&self) -> &[Notice] {
        &self.active
    }

    /// Removes and returns every active notice.
    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_are_suppressed() {
        let mut notifier = Notifier::new();
        assert!(notifier.error("Failed to load orders"));
        assert!(!notifier.error("Failed to load orders"));
        assert!(notifier.warning("Failed to load orders"));
        assert_eq!(notifier.active().len(), 2);
    }

    #[test]
    fn test_dismiss_allows_repost() {
        let mut notifier = Notifier::new();
        notifier.success("Saved");
        assert!(notifier.dismiss("success-Saved"));
        assert!(!notifier.dismiss("success-Saved"));
        assert!(notifier.success("Saved"));
    }

    #[test]
    fn test_cancellations_are_silent() {
        let mut notifier = Notifier::new();
        assert!(!notifier.api_error(&ApiError::Cancelled));
        assert!(notifier.api_error(&ApiError::Timeout(15_000)));
        let notices = notifier.drain();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, Level::Error);
        assert!(notifier.active().is_empty());
    }
}
