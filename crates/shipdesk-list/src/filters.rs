//! Search predicate and discrete filters for list views.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::record::Record;

/// A free-text search term, case-folded once on construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchTerm {
    raw: String,
    folded: String,
}

impl SearchTerm {
    /// Creates a search term.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let folded = raw.to_lowercase();
        Self { raw, folded }
    }

    /// Returns the term as typed.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the lowercase form used for matching.
    #[must_use]
    pub fn folded(&self) -> &str {
        &self.folded
    }

    /// Returns whether the term is empty (matches everything).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

/// Returns true iff at least one of `fields` contains the term,
/// case-insensitively. An empty term matches every record.
#[must_use]
pub fn matches_search(record: &Record, term: &SearchTerm, fields: &[String]) -> bool {
    if term.is_empty() {
        return true;
    }
    fields
        .iter()
        .any(|field| record.text(field).to_lowercase().contains(term.folded()))
}

/// Returns whether a filter value means "no constraint".
#[must_use]
pub fn is_unconstrained(value: &str) -> bool {
    value.is_empty() || value.eq_ignore_ascii_case("all")
}

/// Active discrete filters (field -> value).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    active: BTreeMap<String, String>,
}

impl FilterState {
    /// Creates an empty filter state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a filter. `""` and `"all"` remove the constraint.
    ///
    /// Returns whether the state changed.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) -> bool {
        let field = field.into();
        let value = value.into();
        if is_unconstrained(&value) {
            return self.active.remove(&field).is_some();
        }
        self.active.insert(field, value.clone()).as_deref() != Some(value.as_str())
    }

    /// Removes the constraint on a field.
    pub fn remove(&mut self, field: &str) -> bool {
        self.active.remove(field).is_some()
    }

    /// Removes every constraint.
    pub fn clear(&mut self) {
        self.active.clear();
    }

    /// Returns the active value for a field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.active.get(field).map(String::as_str)
    }

    /// Iterates over active constraints in field order.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.active.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns whether no constraint is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Returns the number of active constraints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.active.len()
    }
}

/// Returns true iff the record satisfies every active constraint.
///
/// Fields with a registered [`Filter`] are evaluated by it; any other field
/// is compared for string equality against [`Record::text`].
#[must_use]
pub fn matches_filters(record: &Record, state: &FilterState, filters: &[Arc<dyn Filter>]) -> bool {
    state.iter().all(|(field, value)| {
        match filters.iter().find(|f| f.field() == field) {
            Some(filter) => filter.matches(record, value).unwrap_or(false),
            None => record.text(field) == value,
        }
    })
}

/// A filter that can be applied to list views.
pub trait Filter: Send + Sync {
    /// Returns the filter's field name.
    fn field(&self) -> &str;

    /// Returns the display label for this filter.
    fn label(&self) -> &str;

    /// Returns the available filter options as (value, label) pairs.
    fn choices(&self) -> Vec<(String, String)>;

    /// Returns whether `value` is a valid selection for this filter.
    fn accepts(&self, value: &str) -> bool {
        self.choices().iter().any(|(v, _)| v == value)
    }

    /// Evaluates the filter against a record.
    ///
    /// Returns None if the value is not valid for this filter.
    fn matches(&self, record: &Record, value: &str) -> Option<bool>;
}

/// A filter for boolean fields.
pub struct BooleanFilter {
    field: String,
    label: String,
    true_label: String,
    false_label: String,
}

impl BooleanFilter {
    /// Creates a new boolean filter.
    #[must_use]
    pub fn new(field: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            label: label.into(),
            true_label: "Yes".to_string(),
            false_label: "No".to_string(),
        }
    }

    /// Sets custom labels for true/false values.
    #[must_use]
    pub fn labels(mut self, true_label: impl Into<String>, false_label: impl Into<String>) -> Self {
        self.true_label = true_label.into();
        self.false_label = false_label.into();
        self
    }

    fn is_truthy(&self, record: &Record) -> bool {
        matches!(record.text(&self.field).as_ref(), "true" | "1")
    }
}

impl Filter for BooleanFilter {
    fn field(&self) -> &str {
        &self.field
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn choices(&self) -> Vec<(String, String)> {
        vec![
            ("1".to_string(), self.true_label.clone()),
            ("0".to_string(), self.false_label.clone()),
        ]
    }

    fn accepts(&self, value: &str) -> bool {
        matches!(value, "1" | "true" | "0" | "false")
    }

    fn matches(&self, record: &Record, value: &str) -> Option<bool> {
        match value {
            "1" | "true" => Some(self.is_truthy(record)),
            "0" | "false" => Some(!self.is_truthy(record)),
            _ => None,
        }
    }
}

/// A filter with predefined choices, such as an order status.
pub struct ChoicesFilter {
    field: String,
    label: String,
    choices: Vec<(String, String)>,
}

impl ChoicesFilter {
    /// Creates a new choices filter.
    #[must_use]
    pub fn new(field: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            label: label.into(),
            choices: Vec::new(),
        }
    }

    /// Adds a choice to the filter.
    #[must_use]
    pub fn choice(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.choices.push((value.into(), label.into()));
        self
    }

    /// Sets all choices at once.
    #[must_use]
    pub fn choices(mut self, choices: Vec<(impl Into<String>, impl Into<String>)>) -> Self {
        self.choices = choices
            .into_iter()
            .map(|(v, l)| (v.into(), l.into()))
            .collect();
        self
    }
}

impl Filter for ChoicesFilter {
    fn field(&self) -> &str {
        &self.field
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn choices(&self) -> Vec<(String, String)> {
        self.choices.clone()
    }

    fn matches(&self, record: &Record, value: &str) -> Option<bool> {
        if self.choices.iter().any(|(v, _)| v == value) {
            Some(record.text(&self.field) == value)
        } else {
            None
        }
    }
}

/// A filter for numeric ranges.
pub struct RangeFilter {
    field: String,
    label: String,
    ranges: Vec<(String, String, Option<i64>, Option<i64>)>,
}

impl RangeFilter {
    /// Creates a new range filter.
    #[must_use]
    pub fn new(field: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            label: label.into(),
            ranges: Vec::new(),
        }
    }

    /// Adds a range option. Bounds are inclusive.
    #[must_use]
    pub fn range(
        mut self,
        value: impl Into<String>,
        label: impl Into<String>,
        min: Option<i64>,
        max: Option<i64>,
    ) -> Self {
        self.ranges.push((value.into(), label.into(), min, max));
        self
    }
}

impl Filter for RangeFilter {
    fn field(&self) -> &str {
        &self.field
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn choices(&self) -> Vec<(String, String)> {
        self.ranges
            .iter()
            .map(|(v, l, _, _)| (v.clone(), l.clone()))
            .collect()
    }

    #[allow(clippy::cast_precision_loss)]
    fn matches(&self, record: &Record, value: &str) -> Option<bool> {
        let (_, _, min, max) = self.ranges.iter().find(|(v, _, _, _)| v == value)?;
        let Some(n) = record.number(&self.field) else {
            return Some(false);
        };
        let above = min.is_none_or(|min| n >= min as f64);
        let below = max.is_none_or(|max| n <= max as f64);
        Some(above && below)
    }
}

/// A filter for empty/not empty checks.
pub struct NullFilter {
    field: String,
    label: String,
}

impl NullFilter {
    /// Creates a new null filter.
    #[must_use]
    pub fn new(field: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            label: label.into(),
        }
    }
}

impl Filter for NullFilter {
    fn field(&self) -> &str {
        &self.field
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn choices(&self) -> Vec<(String, String)> {
        vec![
            ("null".to_string(), "Empty".to_string()),
            ("notnull".to_string(), "Not empty".to_string()),
        ]
    }

    fn matches(&self, record: &Record, value: &str) -> Option<bool> {
        match value {
            "null" => Some(record.is_blank(&self.field)),
            "notnull" => Some(!record.is_blank(&self.field)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let record = Record::new()
            .with("markId", "UX0099")
            .with("name", "Company HQ");
        let fields = fields(&["markId", "name"]);

        assert!(matches_search(&record, &SearchTerm::new("ux00"), &fields));
        assert!(matches_search(&record, &SearchTerm::new("hq"), &fields));
        assert!(!matches_search(&record, &SearchTerm::new("remote"), &fields));
    }

    #[test]
    fn test_search_empty_term_matches_all() {
        let record = Record::new();
        assert!(matches_search(&record, &SearchTerm::new(""), &fields(&["name"])));
    }

    #[test]
    fn test_search_missing_field_never_matches() {
        let record = Record::new().with("name", serde_json::Value::Null);
        let fields = fields(&["name", "phone"]);
        assert!(!matches_search(&record, &SearchTerm::new("a"), &fields));
    }

    #[test]
    fn test_filter_state_all_means_unconstrained() {
        let mut state = FilterState::new();
        assert!(state.set("status", "pending"));
        assert!(!state.set("status", "pending"));
        assert_eq!(state.get("status"), Some("pending"));

        assert!(state.set("status", "All"));
        assert!(state.is_empty());
        assert!(!state.set("status", ""));
    }

    #[test]
    fn test_boolean_filter() {
        let filter = BooleanFilter::new("is_active", "Active").labels("Active", "Inactive");

        assert_eq!(filter.field(), "is_active");
        assert_eq!(filter.label(), "Active");

        let choices = filter.choices();
        assert_eq!(choices.len(), 2);
        assert_eq!(choices[0], ("1".to_string(), "Active".to_string()));

        let active = Record::new().with("is_active", true);
        let inactive = Record::new().with("is_active", false);
        assert_eq!(filter.matches(&active, "1"), Some(true));
        assert_eq!(filter.matches(&inactive, "true"), Some(false));
        assert_eq!(filter.matches(&inactive, "0"), Some(true));
        assert_eq!(filter.matches(&active, "maybe"), None);
    }

    #[test]
    fn test_choices_filter() {
        let filter = ChoicesFilter::new("status", "Status")
            .choice("pending", "Pending")
            .choice("shipped", "Shipped")
            .choice("delivered", "Delivered");

        // Use Filter trait method to get choices
        let choices = Filter::choices(&filter);
        assert_eq!(choices.len(), 3);

        let record = Record::new().with("status", "shipped");
        assert_eq!(filter.matches(&record, "shipped"), Some(true));
        assert_eq!(filter.matches(&record, "pending"), Some(false));
        assert_eq!(filter.matches(&record, "invalid"), None);
        assert!(!filter.accepts("invalid"));
    }

    #[test]
    fn test_range_filter() {
        let filter = RangeFilter::new("quantity", "Quantity")
            .range("small", "1-9", Some(1), Some(9))
            .range("bulk", "10+", Some(10), None);

        let small = Record::new().with("quantity", 5);
        let bulk = Record::new().with("quantity", "20");
        let unknown = Record::new();

        assert_eq!(filter.matches(&small, "small"), Some(true));
        assert_eq!(filter.matches(&bulk, "small"), Some(false));
        assert_eq!(filter.matches(&bulk, "bulk"), Some(true));
        assert_eq!(filter.matches(&unknown, "bulk"), Some(false));
        assert_eq!(filter.matches(&small, "huge"), None);
    }

    #[test]
    fn test_null_filter() {
        let filter = NullFilter::new("invoice", "Invoice");
        let with_invoice = Record::new().with("invoice", "INV-1");
        let without = Record::new().with("invoice", serde_json::Value::Null);

        assert_eq!(filter.matches(&without, "null"), Some(true));
        assert_eq!(filter.matches(&with_invoice, "notnull"), Some(true));
        assert_eq!(filter.matches(&with_invoice, "null"), Some(false));
    }

    #[test]
    fn test_matches_filters_mixes_registered_and_plain() {
        let registered: Vec<Arc<dyn Filter>> =
            vec![Arc::new(BooleanFilter::new("paid", "Paid"))];
        let mut state = FilterState::new();
        state.set("paid", "1");
        state.set("status", "pending");

        let hit = Record::new().with("paid", true).with("status", "pending");
        let wrong_status = Record::new().with("paid", true).with("status", "shipped");
        let unpaid = Record::new().with("paid", false).with("status", "pending");

        assert!(matches_filters(&hit, &state, &registered));
        assert!(!matches_filters(&wrong_status, &state, &registered));
        assert!(!matches_filters(&unpaid, &state, &registered));
    }
}
