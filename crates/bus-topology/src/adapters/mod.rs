//! # Adapters Layer
//!
//! - `store` - `KeyLookup` over a `ConfigStoreApi`
//! - `memory` - fixed key set with lookup accounting

pub mod memory;
pub mod store;

pub use memory::StaticKeyLookup;
pub use store::StoreKeyLookup;
