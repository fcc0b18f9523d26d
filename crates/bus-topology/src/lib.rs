//! # Bus Topology
//!
//! Translates declarative per-topic descriptors into concrete message-bus
//! endpoints and assembles the key bundle each role needs.
//!
//! **Architecture:** Hexagonal (Domain + Ports/Adapters)
//!
//! ## Roles and Trust
//!
//! | Role | Block key | Production credentials |
//! |------|-----------|------------------------|
//! | Publisher | `publish` | `allowed_clients`, `server_secret_key` |
//! | Subscriber | topic | `server_public_key`, `client_public_key`, `client_secret_key` |
//! | Server | topic | `allowed_clients`, `server_secret_key` |
//! | Client | topic | as Subscriber, only for listed request endpoints |
//!
//! Development mode attaches no credentials. IPC transports never touch the
//! key store.
//!
//! ## Failure Model
//!
//! Resolution never raises. A missing or malformed descriptor yields `None`;
//! an unknown mode or bad address yields a config without transport; a failed
//! key lookup omits that field. Every soft failure is logged with a
//! [`ResolveIssue`] tag.
//!
//! ## Module Structure
//!
//! ```text
//! bus-topology/
//! ├── domain/     # Role, TrustMode, Descriptor, TopicConfig, KeyMaterial, settings
//! ├── ports/      # TopologyApi (inbound), KeyLookup (outbound)
//! ├── adapters/   # StoreKeyLookup, StaticKeyLookup
//! └── service/    # TopologyResolver, credential assembly
//! ```

#![warn(clippy::all)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{StaticKeyLookup, StoreKeyLookup};
pub use domain::{
    private_key_path, public_key_path, CredentialBundle, Descriptor, KeyMaterial, LookupError,
    ResolveIssue, ResolveRequest, Role, TopicConfig, TopicKind, TopicSpec, TopologySettings,
    Transport, TransportMode, TrustMode, MAX_ALLOWED_CLIENTS, MAX_REQUEST_ENDPOINTS,
};
pub use ports::{KeyLookup, TopologyApi};
pub use service::{assemble_credentials, TopologyResolver};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
