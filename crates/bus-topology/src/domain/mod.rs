//! # Domain Layer
//!
//! Pure resolution types. No store access happens here.

pub mod descriptor;
pub mod errors;
pub mod key_material;
pub mod request;
pub mod role;
pub mod settings;
pub mod topic_config;

pub use descriptor::*;
pub use errors::*;
pub use key_material::*;
pub use request::*;
pub use role::*;
pub use settings::*;
pub use topic_config::*;
