//! Key lookups backed by the config store.

use std::sync::Arc;

use config_store::ConfigStoreApi;

use crate::domain::{private_key_path, public_key_path, KeyMaterial, LookupError};
use crate::ports::KeyLookup;

/// Reads `/Publickeys/<id>` and `/<id>/private_key` through the store client.
///
/// An empty stored value counts as absent.
#[derive(Clone)]
pub struct StoreKeyLookup {
    store: Arc<dyn ConfigStoreApi>,
}

impl StoreKeyLookup {
    pub fn new(store: Arc<dyn ConfigStoreApi>) -> Self {
        Self { store }
    }

    fn fetch(&self, path: String) -> Result<Option<KeyMaterial>, LookupError> {
        match self.store.get(&path) {
            Ok(Some(value)) if !value.is_empty() => Ok(Some(KeyMaterial::new(value))),
            Ok(_) => Ok(None),
            Err(e) => Err(LookupError::Store {
                key: path,
                reason: e.to_string(),
            }),
        }
    }
}

impl KeyLookup for StoreKeyLookup {
    fn public_key(&self, identity: &str) -> Result<Option<KeyMaterial>, LookupError> {
        self.fetch(public_key_path(identity))
    }

    fn private_key(&self, identity: &str) -> Result<Option<KeyMaterial>, LookupError> {
        self.fetch(private_key_path(identity))
    }
}
