//! # Integration Flows
//!
//! End-to-end flows across the store client, the topology resolver and the
//! runtime, against the in-memory backend behind a real loopback probe.

pub mod resolution_flow;
pub mod startup_flow;
pub mod watch_flow;
