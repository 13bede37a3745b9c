//! Bulk actions over selected records and their outcome reports.
//!
//! A bulk action runs as one independent request per record, so it can
//! partially fail. [`BulkReport`] keeps per-record outcomes and renders the
//! "K of N" summary shown to the user.

use crate::record::RecordId;

/// A bulk action that can be performed on selected items.
pub trait Action: Send + Sync {
    /// Returns the action name (used as value).
    fn name(&self) -> &str;

    /// Returns the action description (shown in dropdown).
    fn description(&self) -> &str;

    /// Past participle used in reports, e.g. "deleted".
    fn verb(&self) -> &str;

    /// Whether records the action succeeded on leave the list.
    fn removes_records(&self) -> bool {
        false
    }
}

/// Delete selected items action.
pub struct DeleteSelectedAction;

impl Action for DeleteSelectedAction {
    fn name(&self) -> &str {
        "delete_selected"
    }

    fn description(&self) -> &str {
        "Delete selected items"
    }

    fn verb(&self) -> &str {
        "deleted"
    }

    fn removes_records(&self) -> bool {
        true
    }
}

/// Set the status of selected items.
pub struct UpdateStatusAction {
    status: String,
    description: String,
}

impl UpdateStatusAction {
    /// Creates a status update action.
    #[must_use]
    pub fn new(status: impl Into<String>) -> Self {
        let status = status.into();
        let description = format!("Mark selected as {status}");
        Self {
            status,
            description,
        }
    }

    /// Returns the target status.
    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }
}

impl Action for UpdateStatusAction {
    fn name(&self) -> &str {
        "update_status"
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn verb(&self) -> &str {
        "updated"
    }
}

/// A record the action failed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkFailure {
    /// Record identifier.
    pub id: RecordId,
    /// User-facing failure reason.
    pub reason: String,
}

/// Per-record outcome of a bulk action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkReport {
    /// Action name.
    pub action: String,
    /// Past participle for the summary.
    pub verb: String,
    /// Whether succeeded records leave the list.
    pub removes_records: bool,
    /// Records the action succeeded on.
    pub succeeded: Vec<RecordId>,
    /// Records the action failed on.
    pub failed: Vec<BulkFailure>,
}

impl BulkReport {
    /// Creates an empty report for `action`.
    #[must_use]
    pub fn new(action: &dyn Action) -> Self {
        Self {
            action: action.name().to_string(),
            verb: action.verb().to_string(),
            removes_records: action.removes_records(),
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }

    /// Records a success.
    pub fn record_success(&mut self, id: RecordId) {
        self.succeeded.push(id);
    }

    /// Records a failure.
    pub fn record_failure(&mut self, id: RecordId, reason: impl Into<String>) {
        self.failed.push(BulkFailure {
            id,
            reason: reason.into(),
        });
    }

    /// Number of records the action was requested for.
    #[must_use]
    pub fn requested(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    /// Returns whether every record succeeded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Returns whether some but not all records succeeded.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        !self.succeeded.is_empty() && !self.failed.is_empty()
    }

    /// Returns the ids the action failed on.
    #[must_use]
    pub fn failed_ids(&self) -> Vec<RecordId> {
        self.failed.iter().map(|f| f.id.clone()).collect()
    }

    /// Renders `"2 of 3 deleted"`.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} of {} {}",
            self.succeeded.len(),
            self.requested(),
            self.verb
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_selected_action() {
        let action = DeleteSelectedAction;
        assert_eq!(action.name(), "delete_selected");
        assert!(action.removes_records());
    }

    #[test]
    fn test_update_status_action() {
        let action = UpdateStatusAction::new("shipped");
        assert_eq!(action.status(), "shipped");
        assert_eq!(action.description(), "Mark selected as shipped");
        assert!(!action.removes_records());
    }

    #[test]
    fn test_partial_report_summary() {
        let mut report = BulkReport::new(&DeleteSelectedAction);
        report.record_success(RecordId::from("1"));
        report.record_failure(RecordId::from("2"), "not found");
        report.record_success(RecordId::from("3"));

        assert_eq!(report.requested(), 3);
        assert!(report.is_partial());
        assert!(!report.is_complete());
        assert_eq!(report.summary(), "2 of 3 deleted");
        assert_eq!(report.failed_ids(), vec![RecordId::from("2")]);
    }

    #[test]
    fn test_complete_report() {
        let mut report = BulkReport::new(&UpdateStatusAction::new("paid"));
        report.record_success(RecordId::from("1"));
        assert!(report.is_complete());
        assert_eq!(report.summary(), "1 of 1 updated");
    }
}
