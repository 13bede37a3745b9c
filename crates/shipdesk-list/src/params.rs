//! Query parameters for server-driven list requests.

use crate::filters::{is_unconstrained, FilterState};
use crate::sort::{SortDirection, SortState};

/// How an endpoint spells its list parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QueryStyle {
    /// `page`, `page_size`, `search`, `ordering=-field`.
    #[default]
    Ordering,
    /// `page`, `limit`, `search`, `sortField`, `sortDirection`.
    SortField,
    /// `page`, `page_size`, `q`; the server picks the order, so no sort
    /// parameter is sent.
    Search,
}

impl QueryStyle {
    /// Returns whether requests in this style carry the sort order.
    #[must_use]
    pub const fn sends_ordering(self) -> bool {
        !matches!(self, Self::Search)
    }
}

/// The parameters of one list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// Current page number (1-indexed).
    pub page: usize,
    /// Items per page.
    pub page_size: usize,
    /// Search query.
    pub search: Option<String>,
    /// Sort column and direction.
    pub ordering: Option<SortState>,
    /// Active filters (field -> value).
    pub filters: FilterState,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 20,
            search: None,
            ordering: None,
            filters: FilterState::new(),
        }
    }
}

impl ListQuery {
    /// Parses list parameters from query pairs.
    ///
    /// Both spellings are accepted; every other parameter is treated as a
    /// filter.
    #[must_use]
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut query = Self::default();
        let mut sort_field = None;
        let mut sort_direction = SortDirection::Ascending;

        for (key, value) in pairs {
            match key {
                "page" => query.page = value.parse::<usize>().unwrap_or(1).max(1),
                "page_size" | "limit" => {
                    if let Ok(size) = value.parse::<usize>() {
                        if size > 0 {
                            query.page_size = size;
                        }
                    }
                }
                "search" | "q" => {
                    query.search = Some(value.to_string()).filter(|s| !s.is_empty());
                }
                "ordering" | "o" => {
                    if !value.is_empty() {
                        query.ordering = Some(SortState::from_ordering(value));
                    }
                }
                "sortField" => sort_field = Some(value.to_string()).filter(|s| !s.is_empty()),
                "sortDirection" => {
                    sort_direction = SortDirection::parse(value).unwrap_or_default();
                }
                _ => {
                    query.filters.set(key, value);
                }
            }
        }

        if let Some(field) = sort_field {
            query.ordering = Some(SortState::new(field, sort_direction));
        }
        query
    }

    /// Renders the query as (key, value) pairs in the given style.
    ///
    /// Unset values and unconstrained filters are omitted.
    #[must_use]
    pub fn to_query_pairs(&self, style: QueryStyle) -> Vec<(String, String)> {
        let mut pairs = vec![("page".to_string(), self.page.to_string())];

        let size_key = match style {
            QueryStyle::Ordering | QueryStyle::Search => "page_size",
            QueryStyle::SortField => "limit",
        };
        pairs.push((size_key.to_string(), self.page_size.to_string()));

        if let Some(ref q) = self.search {
            let search_key = match style {
                QueryStyle::Search => "q",
                QueryStyle::Ordering | QueryStyle::SortField => "search",
            };
            pairs.push((search_key.to_string(), q.clone()));
        }

        if let Some(ref sort) = self.ordering {
            match style {
                QueryStyle::Ordering => pairs.push(("ordering".to_string(), sort.to_ordering())),
                QueryStyle::Search => {}
                QueryStyle::SortField => {
                    pairs.push(("sortField".to_string(), sort.field.clone()));
                    pairs.push((
                        "sortDirection".to_string(),
                        sort.direction.as_str().to_string(),
                    ));
                }
            }
        }

        for (field, value) in self.filters.iter() {
            if !is_unconstrained(value) {
                pairs.push((field.to_string(), value.to_string()));
            }
        }

        pairs
    }

    /// Builds a query string (with leading `?`) from the parameters.
    #[must_use]
    pub fn to_query_string(&self, style: QueryStyle) -> String {
        encode_pairs(&self.to_query_pairs(style))
    }
}

/// Encodes pairs as `?k=v&k2=v2`, or the empty string for no pairs.
#[must_use]
pub fn encode_pairs(pairs: &[(String, String)]) -> String {
    if pairs.is_empty() {
        return String::new();
    }
    let parts: Vec<String> = pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding_simple(k), urlencoding_simple(v)))
        .collect();
    format!("?{}", parts.join("&"))
}

/// Simple URL encoding.
fn urlencoding_simple(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(char::from(byte));
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
