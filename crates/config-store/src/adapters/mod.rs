//! # Adapters Layer
//!
//! - `memory` - in-process backend with real watch semantics
//! - `probe` - TCP readiness probe
//! - `etcd` - etcd v3 backend (feature `etcd`)

pub mod memory;
pub mod probe;

#[cfg(feature = "etcd")]
pub mod etcd;

pub use memory::InMemoryKvBackend;
pub use probe::TcpReachabilityProbe;

#[cfg(feature = "etcd")]
pub use etcd::EtcdConnector;
