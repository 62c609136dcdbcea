//! # Raw Query Parameters
//!
//! Ordered multimap of decoded query-string pairs. Repeated keys are kept.

/// Parameters reserved for sorting, projection and pagination
pub const RESERVED_KEYS: [&str; 4] = ["page", "sort", "limit", "fields"];

/// Whether a key is reserved and never treated as a filter.
///
/// Any bracket suffix is ignored, so `page[gte]` is reserved too.
pub fn is_reserved(key: &str) -> bool {
    let field = key.split_once('[').map_or(key, |(field, _)| field);
    RESERVED_KEYS.contains(&field)
}

/// Decoded request parameters, in arrival order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawParameters {
    pairs: Vec<(String, String)>,
}

impl RawParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw (percent-encoded) query string
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect()
    }

    /// Return a copy with one more pair appended
    pub fn with(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut pairs = self.pairs.clone();
        pairs.push((key.into(), value.into()));
        Self { pairs }
    }

    /// Last value for a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// All values for a key, in order
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether any key names this field, with or without an operator
    pub fn mentions_field(&self, field: &str) -> bool {
        self.pairs.iter().any(|(k, _)| {
            k == field
                || k.strip_prefix(field)
                    .is_some_and(|rest| rest.starts_with('['))
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawParameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
