/*
[INPUT]:  Column names and values supplied by callers
[OUTPUT]: Equality filters rendered as PostgREST query pairs
[POS]:    Data layer - request-side types
[UPDATE]: When supporting new filter operators
*/

use serde::{Deserialize, Serialize};

/// Exact-match filters on table columns, applied as a conjunction.
///
/// Matching is case-sensitive; values are sent to PostgREST verbatim with
/// the `eq.` operator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    conditions: Vec<(String, String)>,
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `column = value` condition
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.conditions.push((column.into(), value.into()));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.conditions
            .iter()
            .map(|(column, value)| (column.as_str(), value.as_str()))
    }

    /// Query-string pairs in PostgREST syntax (`column=eq.value`)
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        self.iter()
            .map(|(column, value)| (column.to_string(), format!("eq.{value}")))
            .collect()
    }

    /// Check a JSON row against every condition.
    ///
    /// Only string columns can match; a missing or non-string column fails.
    pub fn matches(&self, row: &serde_json::Value) -> bool {
        self.iter().all(|(column, value)| {
            row.get(column).and_then(serde_json::Value::as_str) == Some(value)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_pairs_use_eq_operator() {
        let filters = Filters::new()
            .eq("artistName", "Banksy")
            .eq("artistEmail", "b@example.com");
        assert_eq!(
            filters.to_query_pairs(),
            vec![
                ("artistName".to_string(), "eq.Banksy".to_string()),
                ("artistEmail".to_string(), "eq.b@example.com".to_string()),
            ]
        );
    }

    #[test]
    fn test_matches_is_exact_and_case_sensitive() {
        let filters = Filters::new().eq("artistName", "Banksy");
        assert!(filters.matches(&json!({ "artistName": "Banksy" })));
        assert!(!filters.matches(&json!({ "artistName": "banksy" })));
        assert!(!filters.matches(&json!({ "artistName": "Banksy " })));
        assert!(!filters.matches(&json!({ "other": "Banksy" })));
    }
}
