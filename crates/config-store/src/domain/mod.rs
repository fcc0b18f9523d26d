//! # Domain Layer
//!
//! Pure store-client logic: key namespacing, settings resolution, bootstrap
//! decoding and the immutable service context.
//!
//! This module performs NO I/O. Network access, the readiness probe and
//! watch delivery are abstracted through ports in the `ports` module.

pub mod bootstrap;
pub mod context;
pub mod errors;
pub mod keys;
pub mod settings;
pub mod watch;

pub use bootstrap::*;
pub use context::*;
pub use errors::*;
pub use keys::*;
pub use settings::*;
pub use watch::*;
