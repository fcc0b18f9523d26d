//! In-memory key-value backend.
//!
//! Used for development and tests. Watches are notified synchronously from
//! `put`, in registration order. Availability can be toggled to simulate a
//! backend outage.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::trace;

use crate::domain::{BackendError, ChangeEvent, StoreSettings, WatchTarget};
use crate::ports::{BackendConnector, ChangeSink, KvBackend, WatchGuard};

struct Watcher {
    target: WatchTarget,
    sink: ChangeSink,
    active: Arc<AtomicBool>,
}

/// Backend storing values in a `BTreeMap`.
#[derive(Default)]
pub struct InMemoryKvBackend {
    data: RwLock<BTreeMap<String, Vec<u8>>>,
    watchers: Mutex<Vec<Watcher>>,
    unavailable: AtomicBool,
    reads: AtomicU64,
    writes: AtomicU64,
    opens: AtomicU64,
}

impl InMemoryKvBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle, usable as a `BackendConnector`.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Simulate an outage: every call fails with `Unavailable` while unset.
    pub fn set_available(&self, available: bool) {
        self.unavailable.store(!available, Ordering::SeqCst);
    }

    /// Number of `get` calls served.
    pub fn read_count(&self) -> u64 {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of `put` calls served.
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    /// Number of times this backend was opened through its connector.
    pub fn open_count(&self) -> u64 {
        self.opens.load(Ordering::SeqCst)
    }

    /// Watches not yet cancelled.
    pub fn active_watch_count(&self) -> usize {
        self.watchers
            .lock()
            .iter()
            .filter(|w| w.active.load(Ordering::SeqCst))
            .count()
    }

    /// Raw stored keys, namespaced.
    pub fn keys(&self) -> Vec<String> {
        self.data.read().keys().cloned().collect()
    }

    fn check_available(&self) -> Result<(), BackendError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(BackendError::Unavailable("in-memory backend offline".into()))
        } else {
            Ok(())
        }
    }

    fn notify(&self, key: &str, value: &[u8]) {
        let mut watchers = self.watchers.lock();
        watchers.retain(|w| w.active.load(Ordering::SeqCst));
        watchers.retain(|w| {
            if !w.target.matches(key) {
                return true;
            }
            w.sink.deliver(ChangeEvent::new(key, value))
        });
    }
}

impl KvBackend for InMemoryKvBackend {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BackendError> {
        self.check_available()?;
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.data.read().get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), BackendError> {
        self.check_available()?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.data.write().insert(key.to_string(), value.to_vec());
        trace!(key = %key, "in-memory put");
        self.notify(key, value);
        Ok(())
    }

    fn watch(
        &self,
        target: &WatchTarget,
        sink: ChangeSink,
    ) -> Result<Box<dyn WatchGuard>, BackendError> {
        self.check_available()?;
        let active = Arc::new(AtomicBool::new(true));
        self.watchers.lock().push(Watcher {
            target: target.clone(),
            sink,
            active: Arc::clone(&active),
        });
        Ok(Box::new(MemoryWatchGuard { active }))
    }
}

impl BackendConnector for Arc<InMemoryKvBackend> {
    fn open(&self, _settings: &StoreSettings) -> Result<Arc<dyn KvBackend>, BackendError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::clone(self) as Arc<dyn KvBackend>)
    }
}

struct MemoryWatchGuard {
    active: Arc<AtomicBool>,
}

impl WatchGuard for MemoryWatchGuard {
    fn cancel(&mut self) {
        self.active.store(false, Ordering::SeqCst);
    }
}

impl Drop for MemoryWatchGuard {
    fn drop(&mut self) {
        self.cancel();
    }
}
