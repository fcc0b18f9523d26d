//! Immutable service context.
//!
//! The context is the process environment snapshot overlaid by the global
//! bootstrap entries. It is built once and threaded explicitly into the
//! components that need configuration. The process environment itself is
//! never written.

use std::collections::BTreeMap;

use crate::domain::{EnvSnapshot, GlobalBootstrap};

/// Read-only configuration view shared by all components of a service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceContext {
    values: BTreeMap<String, String>,
}

impl ServiceContext {
    /// Overlay `bootstrap` on top of `env`. Bootstrap entries win.
    #[must_use]
    pub fn new(env: &EnvSnapshot, bootstrap: &GlobalBootstrap) -> Self {
        let mut values: BTreeMap<String, String> = env
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        for (k, v) in bootstrap.iter() {
            values.insert(k.to_string(), v.to_string());
        }
        Self { values }
    }

    /// Context built directly from pairs, without a store.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Trimmed value of `key`, treating empty values as unset.
    #[must_use]
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|v| !v.is_empty())
    }

    /// Comma-separated list under `key`, trimmed, empty items dropped.
    #[must_use]
    pub fn list(&self, key: &str) -> Vec<String> {
        self.get(key)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Iterate all entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
