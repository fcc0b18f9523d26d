//! # Key Material
//!
//! Opaque key blobs fetched from the store. Private keys are secrets, so
//! every blob is zeroized on drop and never printed by `Debug`.

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Store path of an identity's public key.
#[must_use]
pub fn public_key_path(identity: &str) -> String {
    format!("/Publickeys/{identity}")
}

/// Store path of an identity's private key.
#[must_use]
pub fn private_key_path(identity: &str) -> String {
    format!("/{identity}/private_key")
}

/// Key blob that zeroizes on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct KeyMaterial {
    inner: String,
}

impl KeyMaterial {
    pub fn new(key: impl Into<String>) -> Self {
        Self { inner: key.into() }
    }

    /// The raw key text (use carefully!).
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.inner
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("KeyMaterial(***)")
    }
}
