//! # Bus Topology Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Loopback store endpoint, seeded backend, key sets
//! └── integration/      # Cross-crate flows
//!     ├── startup_flow.rs
//!     ├── resolution_flow.rs
//!     └── watch_flow.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p topology-tests
//! cargo test -p topology-tests integration::watch_flow
//! ```

#![allow(dead_code)]

pub mod fixtures;
pub mod integration;
