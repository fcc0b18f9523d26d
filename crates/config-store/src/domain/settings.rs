//! Store location, namespace, TLS and probe settings.
//!
//! Settings are resolved from an [`EnvSnapshot`] instead of the live process
//! environment so that resolution is deterministic and testable.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `ETCD_ENDPOINT` | unset | `host:port`, overrides host and port |
//! | `ETCD_HOST` | `localhost` | Store host |
//! | `ETCD_CLIENT_PORT` | `2379` | Store port |
//! | `ETCD_PREFIX` | unset | Key namespace prefix |
//! | `CONFIGMGR_CERT` | unset | Client certificate (PEM) |
//! | `CONFIGMGR_KEY` | unset | Client private key (PEM) |
//! | `CONFIGMGR_CACERT` | unset | Trusted CA certificate (PEM) |

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::{KeyNamespace, StoreError};
use crate::{DEFAULT_STORE_HOST, DEFAULT_STORE_PORT};

/// Immutable snapshot of environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    vars: BTreeMap<String, String>,
}

impl EnvSnapshot {
    /// Capture the current process environment.
    #[must_use]
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    /// Build a snapshot from explicit pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Raw value of `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Trimmed value of `key`, treating empty values as unset.
    #[must_use]
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|v| !v.is_empty())
    }

    /// Iterate all variables in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Supported store backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StorageKind {
    #[default]
    Etcd,
}

impl StorageKind {
    /// Parse a storage type name, case-insensitively.
    pub fn parse(name: &str) -> Result<Self, StoreError> {
        match name.trim().to_lowercase().as_str() {
            "etcd" => Ok(Self::Etcd),
            other => Err(StoreError::InvalidSettings(format!(
                "unsupported storage type '{other}'"
            ))),
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Etcd => write!(f, "etcd"),
        }
    }
}

/// Resolved store address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEndpoint {
    pub host: String,
    pub port: u16,
}

impl StoreEndpoint {
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Parse a combined `host:port` string.
    pub fn parse(combined: &str) -> Result<Self, StoreError> {
        let (host, port) = combined.trim().rsplit_once(':').ok_or_else(|| {
            StoreError::InvalidSettings(format!("endpoint '{combined}' is not host:port"))
        })?;
        Ok(Self::new(host.trim(), parse_port(port)?))
    }
}

impl Default for StoreEndpoint {
    fn default() -> Self {
        Self::new(DEFAULT_STORE_HOST, DEFAULT_STORE_PORT)
    }
}

impl fmt::Display for StoreEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Mutual-TLS material for the store connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreTls {
    pub cert_file: PathBuf,
    pub key_file: PathBuf,
    pub ca_file: PathBuf,
}

/// Readiness probe budget. The interval is fixed, not exponential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbePolicy {
    /// Pause between failed attempts.
    pub interval: Duration,
    /// Maximum connection attempts before giving up.
    pub max_attempts: u32,
    /// Per-attempt connect timeout.
    pub connect_timeout: Duration,
}

impl Default for ProbePolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(100),
            max_attempts: 1000,
            connect_timeout: Duration::from_secs(5),
        }
    }
}

/// Complete store client settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreSettings {
    pub kind: StorageKind,
    pub endpoint: StoreEndpoint,
    pub namespace: KeyNamespace,
    pub tls: Option<StoreTls>,
    pub probe: ProbePolicy,
}

impl StoreSettings {
    /// Resolve settings from environment variables.
    ///
    /// Address precedence: `ETCD_ENDPOINT` > `ETCD_HOST`/`ETCD_CLIENT_PORT` >
    /// `localhost:2379`. `CONFIGMGR_STORAGE_TYPE` selects the backend kind
    /// (default `etcd`).
    pub fn from_env(env: &EnvSnapshot) -> Result<Self, StoreError> {
        let endpoint = match env.get_non_empty("ETCD_ENDPOINT") {
            Some(combined) => StoreEndpoint::parse(combined)?,
            None => {
                let host = env.get_non_empty("ETCD_HOST").unwrap_or(DEFAULT_STORE_HOST);
                let port = match env.get_non_empty("ETCD_CLIENT_PORT") {
                    Some(port) => parse_port(port)?,
                    None => DEFAULT_STORE_PORT,
                };
                StoreEndpoint::new(host, port)
            }
        };

        let namespace = env
            .get_non_empty("ETCD_PREFIX")
            .map(KeyNamespace::new)
            .unwrap_or_default();

        let tls = resolve_tls(
            env.get_non_empty("CONFIGMGR_CERT"),
            env.get_non_empty("CONFIGMGR_KEY"),
            env.get_non_empty("CONFIGMGR_CACERT"),
        )?;

        let kind = match env.get_non_empty("CONFIGMGR_STORAGE_TYPE") {
            Some(name) => StorageKind::parse(name)?,
            None => StorageKind::default(),
        };

        let settings = Self {
            kind,
            endpoint,
            namespace,
            tls,
            probe: ProbePolicy::default(),
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Override the probe budget.
    #[must_use]
    pub fn with_probe(mut self, probe: ProbePolicy) -> Self {
        self.probe = probe;
        self
    }

    /// Override the key namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: KeyNamespace) -> Self {
        self.namespace = namespace;
        self
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.endpoint.host.trim().is_empty() {
            return Err(StoreError::InvalidSettings("store host is empty".into()));
        }
        if self.endpoint.port == 0 {
            return Err(StoreError::InvalidSettings("store port is zero".into()));
        }
        if self.probe.max_attempts == 0 {
            return Err(StoreError::InvalidSettings(
                "probe must allow at least one attempt".into(),
            ));
        }
        Ok(())
    }
}

fn parse_port(raw: &str) -> Result<u16, StoreError> {
    raw.trim()
        .parse::<u16>()
        .map_err(|e| StoreError::InvalidSettings(format!("invalid store port '{raw}': {e}")))
}

/// All three files empty means plaintext; a partial set is a misconfiguration.
fn resolve_tls(
    cert: Option<&str>,
    key: Option<&str>,
    ca: Option<&str>,
) -> Result<Option<StoreTls>, StoreError> {
    match (cert, key, ca) {
        (None, None, None) => Ok(None),
        (Some(cert), Some(key), Some(ca)) => Ok(Some(StoreTls {
            cert_file: PathBuf::from(cert),
            key_file: PathBuf::from(key),
            ca_file: PathBuf::from(ca),
        })),
        _ => Err(StoreError::InvalidSettings(
            "TLS requires certificate, key and CA files together".into(),
        )),
    }
}
