//! Page query-string parsing
//!
//! `?source=<provider>&k=v...`: `source` selects the initial basemap, every
//! other pair is passed through as a map option.

use serde::Serialize;

const SOURCE_KEY: &str = "source";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryParams {
    pub source: Option<String>,
    /// Pass-through options in encounter order
    pub options: Vec<(String, String)>,
}

impl QueryParams {
    pub fn option(&self, key: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn set_option(&mut self, key: &str, value: &str) {
        match self.options.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.options.push((key.to_string(), value.to_string())),
        }
    }
}

/// Parse a query string, with or without the leading `?`
///
/// Pairs split on the first `=`; a key without `=` gets an empty value.
/// A repeated key keeps its first position and its last value.
pub fn parse_query(query: &str) -> QueryParams {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut params = QueryParams::default();

    for pair in query.split('&').filter(|s| !s.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        if key == SOURCE_KEY {
            params.source = Some(value.to_string());
        } else {
            params.set_option(key, value);
        }
    }

    params
}
