//! # Outbound Ports (Driven Ports)

use crate::domain::{KeyMaterial, LookupError};

/// Key store access.
///
/// Production: `StoreKeyLookup` over the config store client
/// Testing: `StaticKeyLookup`
pub trait KeyLookup: Send + Sync {
    /// Public key of `identity`. Absent is `Ok(None)`.
    fn public_key(&self, identity: &str) -> Result<Option<KeyMaterial>, LookupError>;

    /// Private key of `identity`. Absent is `Ok(None)`.
    fn private_key(&self, identity: &str) -> Result<Option<KeyMaterial>, LookupError>;
}
