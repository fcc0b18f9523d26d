//! Store decorator recording operation outcomes.

use std::sync::Arc;

use bus_telemetry::{STORE_OPERATIONS, WATCH_EVENTS};
use config_store::{ConfigStoreApi, StoreError, WatchCallback};

/// Wraps any `ConfigStoreApi` and counts its operations by outcome.
pub struct MeteredStore<S> {
    inner: S,
}

impl<S: ConfigStoreApi> MeteredStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    fn counted(callback: WatchCallback) -> WatchCallback {
        Arc::new(move |key: &str, value: &str| {
            WATCH_EVENTS.inc();
            callback(key, value);
        })
    }
}

fn record<T>(op: &str, result: &Result<T, StoreError>, absent: bool) {
    let outcome = match result {
        Err(_) => "error",
        Ok(_) if absent => "absent",
        Ok(_) => "ok",
    };
    STORE_OPERATIONS.with_label_values(&[op, outcome]).inc();
}

impl<S: ConfigStoreApi> ConfigStoreApi for MeteredStore<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let result = self.inner.get(key);
        let absent = matches!(result, Ok(None));
        record("get", &result, absent);
        result
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let result = self.inner.put(key, value);
        record("put", &result, false);
        result
    }

    fn register_key_watch(&self, key: &str, callback: WatchCallback) -> Result<(), StoreError> {
        let result = self.inner.register_key_watch(key, Self::counted(callback));
        record("watch", &result, false);
        result
    }

    fn register_dir_watch(&self, prefix: &str, callback: WatchCallback) -> Result<(), StoreError> {
        let result = self.inner.register_dir_watch(prefix, Self::counted(callback));
        record("watch", &result, false);
        result
    }
}
