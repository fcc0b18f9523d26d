//! # Store Client Service
//!
//! Connects to the store once, verifies it, decodes the global bootstrap and
//! then serves namespaced get/put and the single watch slot.

mod dispatch;


use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use crate::domain::{
    BackendError, EnvSnapshot, GlobalBootstrap, ServiceContext, StoreError, StoreOp,
    StoreSettings, WatchTarget, GLOBAL_BOOTSTRAP_KEY,
};
use crate::ports::{
    BackendConnector, ConfigStoreApi, KvBackend, ReachabilityProbe, WatchCallback, WatchGuard,
};
use dispatch::{ActiveWatch, Dispatcher};

#[derive(Default)]
struct WatchSlot {
    generation: u64,
    target: Option<WatchTarget>,
    guard: Option<Box<dyn WatchGuard>>,
}

/// Readiness-checked store client.
///
/// One instance per process. `Send + Sync`; reads may run concurrently while
/// watch registrations are serialized by the slot lock.
pub struct StoreClient {
    settings: StoreSettings,
    backend: Arc<dyn KvBackend>,
    bootstrap: GlobalBootstrap,
    slot: Mutex<WatchSlot>,
    dispatcher: Dispatcher,
}

impl StoreClient {
    /// Probe, open and bootstrap.
    ///
    /// ## Errors
    ///
    /// - `InvalidSettings`: settings failed validation
    /// - `ConnectionUnavailable`: probe budget exhausted, nothing opened
    /// - `BackendOpen`: connector failed
    /// - `MissingBootstrap` / `InvalidBootstrap`: `/GlobalEnv/` unusable
    pub fn connect(
        settings: StoreSettings,
        probe: &dyn ReachabilityProbe,
        connector: &dyn BackendConnector,
    ) -> Result<Self, StoreError> {
        settings.validate()?;
        wait_until_reachable(&settings, probe)?;

        let backend = connector.open(&settings).map_err(StoreError::BackendOpen)?;
        info!(
            endpoint = %settings.endpoint,
            kind = %settings.kind,
            tls = settings.tls.is_some(),
            prefix = settings.namespace.prefix().unwrap_or(""),
            "store backend opened"
        );

        let bootstrap_key = settings.namespace.apply(GLOBAL_BOOTSTRAP_KEY);
        let raw = backend
            .get(&bootstrap_key)
            .map_err(|e| StoreError::operation(StoreOp::Get, GLOBAL_BOOTSTRAP_KEY, e))?;
        let raw = raw
            .map(|bytes| {
                String::from_utf8(bytes).map_err(|e| StoreError::InvalidBootstrap {
                    key: GLOBAL_BOOTSTRAP_KEY.to_string(),
                    reason: e.to_string(),
                })
            })
            .transpose()?;
        let bootstrap = GlobalBootstrap::decode(GLOBAL_BOOTSTRAP_KEY, raw.as_deref())
            .inspect_err(|e| error!(error = %e, "global bootstrap unusable"))?;
        debug!(entries = bootstrap.len(), "global bootstrap decoded");

        let dispatcher = Dispatcher::spawn(settings.namespace.clone());

        Ok(Self {
            settings,
            backend,
            bootstrap,
            slot: Mutex::new(WatchSlot::default()),
            dispatcher,
        })
    }

    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    /// Bootstrap entries decoded at construction.
    pub fn bootstrap(&self) -> &GlobalBootstrap {
        &self.bootstrap
    }

    /// Immutable context: `env` overlaid by the bootstrap entries.
    pub fn context(&self, env: &EnvSnapshot) -> ServiceContext {
        ServiceContext::new(env, &self.bootstrap)
    }

    /// Target of the current watch registration, if any.
    pub fn active_watch(&self) -> Option<WatchTarget> {
        self.slot.lock().target.clone()
    }

    fn register(&self, target: WatchTarget, callback: WatchCallback) -> Result<(), StoreError> {
        if !self.dispatcher.is_running() {
            return Err(StoreError::operation(
                StoreOp::Watch,
                target.path(),
                BackendError::Unavailable("dispatch thread not running".into()),
            ));
        }

        let mut slot = self.slot.lock();
        let generation = slot.generation + 1;

        // Activate first so that no event of the new generation is missed.
        let previous = self.dispatcher.activate(Some(ActiveWatch {
            generation,
            callback,
        }));

        let backend_target = target.map_path(|p| self.settings.namespace.apply(p));
        let guard = match self
            .backend
            .watch(&backend_target, self.dispatcher.sink(generation))
        {
            Ok(guard) => guard,
            Err(e) => {
                self.dispatcher.activate(previous);
                warn!(path = %target.path(), error = %e, "watch registration failed, keeping previous");
                return Err(StoreError::operation(StoreOp::Watch, target.path(), e));
            }
        };

        if let Some(mut superseded) = slot.guard.replace(guard) {
            superseded.cancel();
        }
        slot.generation = generation;
        debug!(path = %target.path(), generation, "watch registered");
        slot.target = Some(target);
        Ok(())
    }
}

/// Fixed-interval readiness probe. No sleep after the last attempt.
fn wait_until_reachable(
    settings: &StoreSettings,
    probe: &dyn ReachabilityProbe,
) -> Result<(), StoreError> {
    let policy = settings.probe;
    for attempt in 1..=policy.max_attempts {
        if probe.probe_once(&settings.endpoint, policy.connect_timeout) {
            debug!(endpoint = %settings.endpoint, attempt, "store accepted connection");
            return Ok(());
        }
        if attempt < policy.max_attempts {
            thread::sleep(policy.interval);
        }
    }

    error!(
        endpoint = %settings.endpoint,
        attempts = policy.max_attempts,
        "store is not up"
    );
    Err(StoreError::ConnectionUnavailable {
        endpoint: settings.endpoint.to_string(),
        attempts: policy.max_attempts,
    })
}

impl ConfigStoreApi for StoreClient {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let stored = self
            .backend
            .get(&self.settings.namespace.apply(key))
            .map_err(|e| StoreError::operation(StoreOp::Get, key, e))?;
        stored
            .map(|bytes| {
                String::from_utf8(bytes).map_err(|e| {
                    StoreError::operation(
                        StoreOp::Get,
                        key,
                        BackendError::Encoding(e.to_string()),
                    )
                })
            })
            .transpose()
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.backend
            .put(&self.settings.namespace.apply(key), value.as_bytes())
            .map_err(|e| StoreError::operation(StoreOp::Put, key, e))
    }

    fn register_key_watch(&self, key: &str, callback: WatchCallback) -> Result<(), StoreError> {
        self.register(WatchTarget::Key(key.to_string()), callback)
    }

    fn register_dir_watch(&self, prefix: &str, callback: WatchCallback) -> Result<(), StoreError> {
        self.register(WatchTarget::Prefix(prefix.to_string()), callback)
    }
}

impl Drop for StoreClient {
    fn drop(&mut self) {
        if let Some(mut guard) = self.slot.get_mut().guard.take() {
            guard.cancel();
        }
    }
}
