//! # Inbound Ports (Driving Ports)
//!
//! The store API consumed by the topology resolver and the runtime.

use std::sync::Arc;

use crate::domain::StoreError;

/// Watch callback, invoked as `(key, value)` on the client's dispatch thread.
///
/// Keys are reported without the namespace prefix.
pub type WatchCallback = Arc<dyn Fn(&str, &str) + Send + Sync>;

/// Minimal CRUD + watch surface of the store client.
pub trait ConfigStoreApi: Send + Sync {
    /// Read a value. An absent key is `Ok(None)`.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value.
    fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Watch a single key.
    ///
    /// ## Single Slot
    ///
    /// Key and prefix registrations share one slot. Registering either kind
    /// replaces the previous registration.
    fn register_key_watch(&self, key: &str, callback: WatchCallback) -> Result<(), StoreError>;

    /// Watch every key under `prefix`. Shares the slot with key watches.
    fn register_dir_watch(&self, prefix: &str, callback: WatchCallback) -> Result<(), StoreError>;
}
