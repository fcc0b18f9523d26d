//! # Ports Layer
//!
//! - `inbound.rs` - `TopologyApi`, resolution entry point
//! - `outbound.rs` - `KeyLookup`, key store access

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
