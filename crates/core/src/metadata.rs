//! Scraped key/value metadata.
//!
//! [`MetadataMap`] is an ordered reducer: candidate pairs are folded in
//! priority order and the first non-empty value for a key wins. Scanners
//! therefore never need to check what an earlier scanner already found.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use crate::{DatacatError, Result};

/// Case-sensitive string mapping that keeps insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataMap {
    entries: Vec<(String, String)>,
}

impl MetadataMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `value` under `key` unless the key already holds a non-empty value.
    ///
    /// Empty keys and blank values are ignored. Values are trimmed. Returns
    /// whether the map changed.
    pub fn set_if_absent(&mut self, key: &str, value: &str) -> bool {
        let value = value.trim();
        if key.is_empty() || value.is_empty() {
            return false;
        }

        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) if !existing.is_empty() => false,
            Some((_, existing)) => {
                *existing = value.to_string();
                true
            }
            None => {
                self.entries.push((key.to_string(), value.to_string()));
                true
            }
        }
    }

    /// Fold candidate pairs in order with [`MetadataMap::set_if_absent`].
    pub fn merge<K, V, I>(&mut self, candidates: I)
    where
        K: AsRef<str>,
        V: AsRef<str>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in candidates {
            self.set_if_absent(key.as_ref(), value.as_ref());
        }
    }

    /// Value for `key`, if present and non-empty.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
    }

    /// First non-empty value among `keys`, tried in order.
    pub fn first_of(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| self.get(key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build from a JSON object.
    ///
    /// Numbers and booleans are stringified and `null` is skipped; nested
    /// objects or arrays are a structural error.
    pub fn from_json(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| DatacatError::Assembly(format!("metadata must be an object, found {}", kind(value))))?;

        let mut map = Self::new();
        for (key, value) in object {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Null => continue,
                other => {
                    return Err(DatacatError::Assembly(format!(
                        "metadata value for `{}` must be text, found {}",
                        key,
                        kind(other)
                    )));
                }
            };
            map.set_if_absent(key, &text);
        }
        Ok(map)
    }
}

/// Short JSON type name for error messages.
pub(crate) fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for MetadataMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.merge(iter);
        map
    }
}

impl Serialize for MetadataMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_non_empty_wins() {
        let mut md = MetadataMap::new();
        assert!(md.set_if_absent("License", "  CC-BY  "));
        assert!(!md.set_if_absent("License", "MIT"));
        assert_eq!(md.get("License"), Some("CC-BY"));
    }

    #[test]
    fn test_blank_values_ignored() {
        let mut md = MetadataMap::new();
        assert!(!md.set_if_absent("Author", "   "));
        assert!(!md.set_if_absent("", "value"));
        assert!(md.is_empty());
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let md: MetadataMap = [("License", "A"), ("license", "B")].into_iter().collect();
        assert_eq!(md.len(), 2);
        assert_eq!(md.get("license"), Some("B"));
    }

    #[test]
    fn test_first_of() {
        let md: MetadataMap = [("Owner", "someone"), ("Uploaded by", "other")].into_iter().collect();
        assert_eq!(md.first_of(&["Author", "Owner", "Uploaded by"]), Some("someone"));
        assert_eq!(md.first_of(&["Author"]), None);
    }

    #[test]
    fn test_serializes_in_insertion_order() {
        let md: MetadataMap = [("Zeta", "1"), ("Alpha", "2")].into_iter().collect();
        assert_eq!(serde_json::to_string(&md).unwrap(), r#"{"Zeta":"1","Alpha":"2"}"#);
    }

    #[test]
    fn test_from_json_coerces_scalars() {
        let md = MetadataMap::from_json(&json!({"Year": 2020, "Open": true, "Gone": null, "Name": "x"})).unwrap();
        assert_eq!(md.get("Year"), Some("2020"));
        assert_eq!(md.get("Open"), Some("true"));
        assert_eq!(md.get("Gone"), None);
    }

    #[test]
    fn test_from_json_rejects_nested() {
        let err = MetadataMap::from_json(&json!({"Author": {"name": "x"}})).unwrap_err();
        assert!(matches!(err, DatacatError::Assembly(_)));
        assert!(err.to_string().contains("Author"));
    }
}
