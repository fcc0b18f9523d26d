//! # Ports Layer
//!
//! - `inbound.rs` - Driving port (`ConfigStoreApi`) used by other components
//! - `outbound.rs` - Driven ports (backend, connector, readiness probe)

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
