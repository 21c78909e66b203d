//! Query-string construction.

use url::form_urlencoded;

/// Form-urlencoded query builder that skips absent values.
#[derive(Debug, Default, Clone)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pair.
    pub fn push(mut self, key: &str, value: impl ToString) -> Self {
        self.pairs.push((key.to_string(), value.to_string()));
        self
    }

    /// Append a pair only when `value` is present.
    pub fn push_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.push(key, value),
            None => self,
        }
    }

    /// Append a string pair only when present and non-empty.
    pub fn push_str(self, key: &str, value: Option<&str>) -> Self {
        self.push_opt(key, value.filter(|v| !v.is_empty()))
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Encoded query without the leading `?`.
    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }

    /// `path` with `?query` appended when there is at least one pair.
    pub fn to_path(&self, path: &str) -> String {
        if self.is_empty() {
            path.to_string()
        } else {
            format!("{}?{}", path, self.encode())
        }
    }
}

/// Percent-encode a single path segment (ids, slugs).
pub fn segment(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_has_no_question_mark() {
        let query = Query::new().push_opt::<u32>("page", None).push_str("search", Some(""));
        assert_eq!(query.to_path("/api/products"), "/api/products");
    }

    #[test]
    fn test_pairs_are_encoded_in_order() {
        let query = Query::new()
            .push("isActive", true)
            .push_str("search", Some("red shirt & tie"))
            .push_opt("page", Some(2));
        assert_eq!(
            query.to_path("/api/products"),
            "/api/products?isActive=true&search=red+shirt+%26+tie&page=2"
        );
    }

    #[test]
    fn test_segment() {
        assert_eq!(segment("abc123"), "abc123");
        assert_eq!(segment("a/b c"), "a%2Fb%20c");
    }
}
