//! # Config Store - Readiness-Checked Key-Value Store Client
//!
//! Minimal CRUD + watch facade over a distributed key-value store. Every
//! other component trusts the store only after this crate has verified it.
//!
//! ## Startup Sequence
//!
//! ```text
//! EnvSnapshot ──→ StoreSettings::from_env
//!                        │
//!                        ↓
//!              [Readiness Probe]  bounded, fixed interval
//!                        │  ConnectionUnavailable ✗
//!                        ↓
//!              [BackendConnector::open]
//!                        │
//!                        ↓
//!              [Fetch /GlobalEnv/]  MissingBootstrap ✗
//!                        │
//!                        ↓
//!                  StoreClient ──→ ServiceContext (immutable)
//! ```
//!
//! ## Watch Model
//!
//! The client owns exactly one watch slot and one dispatch thread. Key and
//! prefix registrations share the slot: the most recent registration wins
//! and the superseded backend watch is cancelled.
//!
//! ## Hexagonal Architecture
//!
//! - **Domain Layer** (`domain/`): keys, settings, bootstrap, context, errors
//! - **Ports Layer** (`ports/`): `ConfigStoreApi` inbound, `KvBackend` outbound
//! - **Adapters Layer** (`adapters/`): in-memory backend, TCP probe, etcd
//! - **Service Layer** (`service`): `StoreClient`

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use domain::{
    BackendError, ChangeEvent, EnvSnapshot, GlobalBootstrap, KeyNamespace, ProbePolicy,
    ServiceContext, StorageKind, StoreEndpoint, StoreError, StoreOp, StoreSettings, StoreTls,
    WatchTarget, GLOBAL_BOOTSTRAP_KEY,
};

pub use ports::{
    BackendConnector, ChangeSink, ConfigStoreApi, KvBackend, ReachabilityProbe, WatchCallback,
    WatchGuard,
};

pub use adapters::{InMemoryKvBackend, TcpReachabilityProbe};

#[cfg(feature = "etcd")]
pub use adapters::EtcdConnector;

pub use service::StoreClient;

/// Default store host when neither an endpoint nor a host is configured.
pub const DEFAULT_STORE_HOST: &str = "localhost";

/// Default etcd client port.
pub const DEFAULT_STORE_PORT: u16 = 2379;
