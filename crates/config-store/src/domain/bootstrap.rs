//! Global bootstrap object decoding.
//!
//! The store holds one JSON object at [`GLOBAL_BOOTSTRAP_KEY`](super::GLOBAL_BOOTSTRAP_KEY)
//! whose scalar entries seed every service's configuration.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::domain::StoreError;

/// Decoded bootstrap entries, all normalized to strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalBootstrap {
    entries: BTreeMap<String, String>,
}

impl GlobalBootstrap {
    /// Decode the raw bootstrap value stored under `key`.
    ///
    /// Strings are kept as-is, numbers and booleans are stringified. Nulls,
    /// arrays and nested objects are rejected.
    pub fn decode(key: &str, raw: Option<&str>) -> Result<Self, StoreError> {
        let raw = match raw.map(str::trim) {
            Some(raw) if !raw.is_empty() => raw,
            _ => {
                return Err(StoreError::MissingBootstrap {
                    key: key.to_string(),
                })
            }
        };

        let invalid = |reason: String| StoreError::InvalidBootstrap {
            key: key.to_string(),
            reason,
        };

        let value: Value = serde_json::from_str(raw).map_err(|e| invalid(e.to_string()))?;
        let Value::Object(map) = value else {
            return Err(invalid("expected a JSON object".into()));
        };

        let mut entries = BTreeMap::new();
        for (name, value) in map {
            let text = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Null | Value::Array(_) | Value::Object(_) => {
                    return Err(invalid(format!("entry '{name}' is not a scalar value")));
                }
            };
            entries.insert(name, text);
        }

        Ok(Self { entries })
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
