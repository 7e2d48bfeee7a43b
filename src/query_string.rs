use crate::api_client::{ApiError, Result};
use std::fmt;

/// An ordered set of query parameters with unique keys.
///
/// Values are written out as given. Escaping `&`, `=` or any other
/// reserved character is left to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryString {
    params: Vec<(String, String)>,
}

impl QueryString {
    pub fn new() -> QueryString {
        QueryString::default()
    }

    /// Adds a parameter, failing if `key` is already present
    pub fn add(&mut self, key: &str, value: &str) -> Result<()> {
        if self.contains_key(key) {
            return Err(ApiError::DuplicateParameter(key.to_string()));
        }
        self.params.push((key.to_string(), value.to_string()));
        Ok(())
    }

    /// Adds a parameter, overwriting the value of an existing `key` in place
    pub fn add_or_replace(&mut self, key: &str, value: &str) {
        match self.params.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value.to_string(),
            None => self.params.push((key.to_string(), value.to_string())),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.params.iter().any(|(k, _)| k == key)
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Serializes to `?k1=v1&k2=v2` in insertion order
    pub fn serialize(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for QueryString {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("?")?;
        for (i, (key, value)) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str("&")?;
            }
            write!(f, "{}={}", key, value)?;
        }
        Ok(())
    }
}
