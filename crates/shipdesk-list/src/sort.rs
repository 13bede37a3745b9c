//! Record ordering.
//!
//! Comparison is type-aware: dates compare as instants, numbers
//! numerically and text by Unicode collation (accents and case only break
//! ties between otherwise equal letters). Missing values
//! collapse to the empty string, zero or the epoch, so they sort first in
//! ascending order and comparison never fails.

use std::borrow::Borrow;
use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
pub use feruca::Collator;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::record::Record;

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    #[serde(rename = "asc")]
    Ascending,
    /// Largest first.
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    /// Returns the opposite direction.
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Applies the direction to an ascending ordering.
    #[must_use]
    pub const fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }

    /// Returns `"asc"` or `"desc"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }

    /// Parses `asc`/`desc` (any case).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(Self::Ascending),
            "desc" | "descending" => Some(Self::Descending),
            _ => None,
        }
    }
}

/// How a sortable field's values compare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Collated text ordering.
    #[default]
    Text,
    /// Numeric ordering.
    Number,
    /// Instant ordering.
    Date,
}

/// Current sort column and direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortState {
    /// Field being sorted on.
    pub field: String,
    /// Sort direction.
    pub direction: SortDirection,
}

impl SortState {
    /// Creates a sort state.
    #[must_use]
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    /// Ascending sort on `field`.
    #[must_use]
    pub fn ascending(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Ascending)
    }

    /// Descending sort on `field`.
    #[must_use]
    pub fn descending(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Descending)
    }

    /// Parses an ordering string (prefix with `-` for descending).
    #[must_use]
    pub fn from_ordering(ordering: &str) -> Self {
        match ordering.strip_prefix('-') {
            Some(field) => Self::descending(field),
            None => Self::ascending(ordering),
        }
    }

    /// Renders the ordering string (`-field` when descending).
    #[must_use]
    pub fn to_ordering(&self) -> String {
        match self.direction {
            SortDirection::Ascending => self.field.clone(),
            SortDirection::Descending => format!("-{}", self.field),
        }
    }

    /// Returns the next state after the user selects a column header.
    ///
    /// Re-selecting the current field toggles the direction; a different
    /// field starts ascending.
    #[must_use]
    pub fn select(current: Option<&Self>, field: &str) -> Self {
        match current {
            Some(state) if state.field == field => Self::new(field, state.direction.toggle()),
            _ => Self::ascending(field),
        }
    }
}

/// Compares two text values with the Unicode collation algorithm.
///
/// Base letters decide first, so `"Émile"` sorts with the `e`s rather than
/// after `z`. The raw strings break remaining ties, which keeps the order
/// total.
pub fn compare_text(collator: &mut Collator, a: &str, b: &str) -> Ordering {
    collator.collate(a, b).then_with(|| a.cmp(b))
}

/// Returns a field's numeric sort key; absent or unparseable values are zero.
#[must_use]
pub fn number_key(record: &Record, field: &str) -> f64 {
    record.number(field).unwrap_or(0.0)
}

/// Returns a field's date sort key in epoch milliseconds.
///
/// Absent or unparseable dates are the epoch. JSON numbers are taken as
/// epoch milliseconds; fractional or exponent forms are truncated.
#[must_use]
pub fn date_key(record: &Record, field: &str) -> i64 {
    match record.get(field) {
        Some(Value::String(s)) => parse_date_millis(s).unwrap_or(0),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().and_then(float_millis))
            .unwrap_or(0),
        _ => 0,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn float_millis(value: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up, so the upper bound is exclusive
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if value.is_finite() && (-LIMIT..LIMIT).contains(&value) {
        Some(value.trunc() as i64)
    } else {
        None
    }
}

fn parse_date_millis(s: &str) -> Option<i64> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// Compares two records on `field`.
///
/// Text fields go through `collator`; one collator can be reused across a
/// whole sort.
#[must_use]
pub fn compare(
    collator: &mut Collator,
    a: &Record,
    b: &Record,
    field: &str,
    kind: FieldKind,
    direction: SortDirection,
) -> Ordering {
    let ordering = match kind {
        FieldKind::Text => compare_text(collator, &a.text(field), &b.text(field)),
        FieldKind::Number => number_key(a, field).total_cmp(&number_key(b, field)),
        FieldKind::Date => date_key(a, field).cmp(&date_key(b, field)),
    };
    direction.apply(ordering)
}

/// Stable-sorts records in place; equal keys keep their input order.
pub fn sort_records<R: Borrow<Record>>(
    items: &mut [R],
    field: &str,
    kind: FieldKind,
    direction: SortDirection,
) {
    let mut collator = Collator::default();
    items.sort_by(|a, b| compare(&mut collator, a.borrow(), b.borrow(), field, kind, direction));
}
