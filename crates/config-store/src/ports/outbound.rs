//! # Outbound Ports (Driven Ports)
//!
//! Dependencies the store client requires from its host.
//!
//! Production: `EtcdConnector` (feature `etcd`), `TcpReachabilityProbe`
//! Testing: `InMemoryKvBackend`

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::{BackendError, ChangeEvent, StoreEndpoint, StoreSettings, WatchTarget};

/// Byte-level key-value backend.
///
/// Keys passed here are already namespaced.
pub trait KvBackend: Send + Sync {
    /// Get a value by key.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BackendError>;

    /// Put a single key-value pair.
    fn put(&self, key: &str, value: &[u8]) -> Result<(), BackendError>;

    /// Start delivering changes under `target` into `sink`.
    ///
    /// Deletions are delivered with an empty value. Delivery stops once the
    /// returned guard is cancelled or dropped. A remote backend may also stop
    /// delivering when its watch stream ends; it must log that at error
    /// level since the client keeps reporting the target as watched.
    fn watch(
        &self,
        target: &WatchTarget,
        sink: ChangeSink,
    ) -> Result<Box<dyn WatchGuard>, BackendError>;
}

/// Handle for an active backend watch.
///
/// Implementations also cancel on drop.
pub trait WatchGuard: Send {
    /// Stop delivering events. Idempotent.
    fn cancel(&mut self);
}

/// Receives changes from a backend watch.
///
/// `deliver` returns `false` once the receiving side is gone, after which
/// the backend may discard the watch.
#[derive(Clone)]
pub struct ChangeSink {
    deliver: Arc<dyn Fn(ChangeEvent) -> bool + Send + Sync>,
}

impl ChangeSink {
    pub fn new(deliver: impl Fn(ChangeEvent) -> bool + Send + Sync + 'static) -> Self {
        Self {
            deliver: Arc::new(deliver),
        }
    }

    /// Hand one change to the receiver.
    pub fn deliver(&self, event: ChangeEvent) -> bool {
        (self.deliver)(event)
    }
}

impl fmt::Debug for ChangeSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeSink").finish_non_exhaustive()
    }
}

/// Opens a backend once the store is known to be reachable.
pub trait BackendConnector {
    fn open(&self, settings: &StoreSettings) -> Result<Arc<dyn KvBackend>, BackendError>;
}

/// Single connection attempt used by the readiness probe.
///
/// Success means the store accepted a connection.
pub trait ReachabilityProbe {
    fn probe_once(&self, endpoint: &StoreEndpoint, timeout: Duration) -> bool;
}
