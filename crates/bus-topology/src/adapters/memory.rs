//! Fixed in-process key set.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::domain::{private_key_path, public_key_path, KeyMaterial, LookupError};
use crate::ports::KeyLookup;

/// Key lookup over a fixed map, counting every lookup performed.
#[derive(Debug, Default)]
pub struct StaticKeyLookup {
    keys: BTreeMap<String, String>,
    failing: BTreeSet<String>,
    lookups: AtomicUsize,
}

impl StaticKeyLookup {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_public_key(mut self, identity: &str, key: &str) -> Self {
        self.keys.insert(public_key_path(identity), key.to_string());
        self
    }

    #[must_use]
    pub fn with_private_key(mut self, identity: &str, key: &str) -> Self {
        self.keys.insert(private_key_path(identity), key.to_string());
        self
    }

    /// Make every lookup for `identity` fail.
    #[must_use]
    pub fn with_failing_identity(mut self, identity: &str) -> Self {
        self.failing.insert(identity.to_string());
        self
    }

    /// Total lookups served, successful or not.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    fn fetch(&self, identity: &str, path: String) -> Result<Option<KeyMaterial>, LookupError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(identity) {
            return Err(LookupError::Store {
                key: path,
                reason: "lookup refused".into(),
            });
        }
        Ok(self.keys.get(&path).map(KeyMaterial::new))
    }
}

impl KeyLookup for StaticKeyLookup {
    fn public_key(&self, identity: &str) -> Result<Option<KeyMaterial>, LookupError> {
        self.fetch(identity, public_key_path(identity))
    }

    fn private_key(&self, identity: &str) -> Result<Option<KeyMaterial>, LookupError> {
        self.fetch(identity, private_key_path(identity))
    }
}
