//! # Topology Runtime Library
//!
//! Exposes the runtime's building blocks for testing. The main entry point is
//! the `main.rs` binary.
//!
//! - `metered` - `ConfigStoreApi` decorator recording Prometheus counters
//! - `report` - resolution of every declared topic into one JSON document
//! - `runtime` - `TopologyRuntime`, wiring store, context and resolver

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod metered;
pub mod report;
pub mod runtime;

pub use metered::MeteredStore;
pub use report::{ResolvedTopic, TopologyReport};
pub use runtime::TopologyRuntime;
