//! Query string parsing module
//!
//! Parses the raw query string into an ordered key/multi-value map.
//! Decoding is best-effort: pairs with empty keys are dropped, a key with
//! no `=` yields an empty value, and invalid UTF-8 percent-sequences
//! decode lossily to U+FFFD. Parsing never fails.

use std::fmt;

use url::form_urlencoded;

/// Ordered query parameter map; a key may repeat
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct QueryMap {
    pairs: Vec<(String, String)>,
}

impl QueryMap {
    pub fn parse(query: Option<&str>) -> Self {
        let Some(query) = query else {
            return Self::default();
        };
        let pairs = form_urlencoded::parse(query.as_bytes())
            .filter(|(key, _)| !key.is_empty())
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        Self { pairs }
    }

    /// First value for `key`; repeated keys resolve to the first occurrence
    pub fn first(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First value for `key` if it is non-empty
    pub fn first_non_empty(&self, key: &str) -> Option<&str> {
        self.first(key).filter(|v| !v.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }
}

impl fmt::Display for QueryMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.pairs.is_empty() {
            return write!(f, "(none)");
        }
        for (i, (key, value)) in self.pairs.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{key}={value:?}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_pair() {
        let query = QueryMap::parse(Some("message=ping"));
        assert_eq!(query.first("message"), Some("ping"));
    }

    #[test]
    fn test_parse_none() {
        let query = QueryMap::parse(None);
        assert!(query.is_empty());
        assert_eq!(query.first("message"), None);
    }

    #[test]
    fn test_percent_decoding() {
        let query = QueryMap::parse(Some("message=hello%20world"));
        assert_eq!(query.first("message"), Some("hello world"));
    }

    #[test]
    fn test_plus_decodes_to_space() {
        let query = QueryMap::parse(Some("message=hello+world"));
        assert_eq!(query.first("message"), Some("hello world"));
    }

    #[test]
    fn test_first_value_wins() {
        let query = QueryMap::parse(Some("message=a&message=b"));
        assert_eq!(query.first("message"), Some("a"));
        assert_eq!(query.pairs().len(), 2);
    }

    #[test]
    fn test_key_without_equals_yields_empty_value() {
        let query = QueryMap::parse(Some("message"));
        assert_eq!(query.first("message"), Some(""));
        assert_eq!(query.first_non_empty("message"), None);
    }

    #[test]
    fn test_empty_value() {
        let query = QueryMap::parse(Some("message="));
        assert_eq!(query.first("message"), Some(""));
        assert_eq!(query.first_non_empty("message"), None);
    }

    #[test]
    fn test_trailing_ampersand_dropped() {
        let query = QueryMap::parse(Some("message=ping&"));
        assert_eq!(query.pairs().len(), 1);
        assert_eq!(query.first("message"), Some("ping"));
    }

    #[test]
    fn test_stray_equals_dropped() {
        // "=x" has an empty key and is not a usable parameter
        let query = QueryMap::parse(Some("=x&message=ping"));
        assert_eq!(query.pairs().len(), 1);
        assert_eq!(query.first("message"), Some("ping"));
    }

    #[test]
    fn test_invalid_utf8_replaced() {
        let query = QueryMap::parse(Some("message=%FF"));
        assert_eq!(query.first("message"), Some("\u{FFFD}"));
    }

    #[test]
    fn test_display_empty() {
        assert_eq!(QueryMap::parse(Some("")).to_string(), "(none)");
    }

    #[test]
    fn test_display_pairs() {
        let query = QueryMap::parse(Some("message=ping&n=2"));
        assert_eq!(query.to_string(), r#"message="ping" n="2""#);
    }
}
