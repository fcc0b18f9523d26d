//! Shared fixtures for the integration flows.

use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use config_store::{
    EnvSnapshot, InMemoryKvBackend, KeyNamespace, KvBackend, ProbePolicy, StoreClient,
    StoreEndpoint, StoreError, StoreSettings, TcpReachabilityProbe, GLOBAL_BOOTSTRAP_KEY,
};

pub const APP_NAME: &str = "VideoAnalytics";

/// Bootstrap object stored at `/GlobalEnv/`.
pub const BOOTSTRAP_JSON: &str = r#"{"DEV_MODE": "false", "ZMQ_RECV_HWM": 1000}"#;

/// A store "server": a loopback listener for the readiness probe plus the
/// in-memory backend that stands behind it.
pub struct LoopbackStore {
    listener: TcpListener,
    pub backend: Arc<InMemoryKvBackend>,
    pub namespace: KeyNamespace,
}

impl LoopbackStore {
    pub fn start() -> Self {
        Self::start_in(KeyNamespace::root())
    }

    pub fn start_in(namespace: KeyNamespace) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let store = Self {
            listener,
            backend: InMemoryKvBackend::shared(),
            namespace,
        };
        store.seed(GLOBAL_BOOTSTRAP_KEY, BOOTSTRAP_JSON);
        store
    }

    /// Write directly to the backend, applying the namespace.
    pub fn seed(&self, key: &str, value: &str) {
        self.backend
            .put(&self.namespace.apply(key), value.as_bytes())
            .unwrap();
    }

    /// Seed the public and private key of an identity.
    pub fn seed_identity(&self, identity: &str) {
        self.seed(&format!("/Publickeys/{identity}"), &format!("{identity}-pub"));
        self.seed(&format!("/{identity}/private_key"), &format!("{identity}-priv"));
    }

    pub fn port(&self) -> u16 {
        self.listener.local_addr().unwrap().port()
    }

    /// Settings as a deployment would provide them through the environment.
    pub fn env(&self) -> EnvSnapshot {
        let mut pairs = vec![("ETCD_ENDPOINT".to_string(), format!("127.0.0.1:{}", self.port()))];
        if let Some(prefix) = self.namespace.prefix() {
            pairs.push(("ETCD_PREFIX".to_string(), prefix.to_string()));
        }
        EnvSnapshot::from_pairs(pairs)
    }

    pub fn settings(&self) -> StoreSettings {
        StoreSettings::from_env(&self.env())
            .unwrap()
            .with_probe(fast_probe(20))
    }

    pub fn connect(&self) -> Result<StoreClient, StoreError> {
        StoreClient::connect(self.settings(), &TcpReachabilityProbe, &self.backend)
    }
}

pub fn fast_probe(max_attempts: u32) -> ProbePolicy {
    ProbePolicy {
        interval: Duration::from_millis(5),
        max_attempts,
        connect_timeout: Duration::from_millis(200),
    }
}

/// A loopback port with nothing listening on it.
pub fn closed_endpoint() -> StoreEndpoint {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    StoreEndpoint::new("127.0.0.1", port)
}

/// Process environment of the application under test.
pub fn app_env(extra: &[(&str, &str)]) -> EnvSnapshot {
    let mut pairs = vec![("AppName".to_string(), APP_NAME.to_string())];
    pairs.extend(extra.iter().map(|(k, v)| (k.to_string(), v.to_string())));
    EnvSnapshot::from_pairs(pairs)
}
