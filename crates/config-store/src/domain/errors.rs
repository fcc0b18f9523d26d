//! # Domain Errors
//!
//! Error taxonomy for the store client.
//!
//! | Variant | Raised by | Fatal |
//! |---------|-----------|-------|
//! | `ConnectionUnavailable` | readiness probe | yes |
//! | `MissingBootstrap` / `InvalidBootstrap` | bootstrap fetch | yes |
//! | `InvalidSettings` | settings resolution | yes |
//! | `BackendOpen` | backend connector | yes |
//! | `Operation` | get / put / watch | no, surfaced to caller |

use std::fmt;
use thiserror::Error;

/// Store operations that can fail after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    Get,
    Put,
    Watch,
}

impl fmt::Display for StoreOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "get"),
            Self::Put => write!(f, "put"),
            Self::Watch => write!(f, "watch"),
        }
    }
}

/// Failures reported by a `KvBackend` implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The backend could not be reached.
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// The backend refused the request.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// A stored value could not be decoded.
    #[error("value encoding error: {0}")]
    Encoding(String),
}

/// Errors surfaced by the store client.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Store never accepted a connection within the probe budget.
    #[error("store at {endpoint} is not up after {attempts} connection attempts")]
    ConnectionUnavailable { endpoint: String, attempts: u32 },

    /// The global bootstrap object is absent.
    #[error("bootstrap key {key} must be set as a prerequisite")]
    MissingBootstrap { key: String },

    /// The global bootstrap object is present but unusable.
    #[error("bootstrap key {key} is invalid: {reason}")]
    InvalidBootstrap { key: String, reason: String },

    /// Store location or TLS settings are inconsistent.
    #[error("invalid store settings: {0}")]
    InvalidSettings(String),

    /// The backend connector failed after the store was reachable.
    #[error("failed to open store backend: {0}")]
    BackendOpen(#[source] BackendError),

    /// A get/put/watch call failed.
    #[error("store {op} failed for key {key}: {source}")]
    Operation {
        op: StoreOp,
        key: String,
        #[source]
        source: BackendError,
    },
}

impl StoreError {
    /// Wrap a backend failure for a keyed operation.
    pub fn operation(op: StoreOp, key: impl Into<String>, source: BackendError) -> Self {
        Self::Operation {
            op,
            key: key.into(),
            source,
        }
    }

    /// Whether this error must abort process startup.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Operation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_error_display() {
        let err = StoreError::operation(
            StoreOp::Get,
            "/Publickeys/Sub",
            BackendError::Unavailable("closed".into()),
        );
        let text = err.to_string();
        assert!(text.contains("get"));
        assert!(text.contains("/Publickeys/Sub"));
        assert!(text.contains("closed"));
    }

    #[test]
    fn test_fatality() {
        assert!(StoreError::MissingBootstrap {
            key: "/GlobalEnv/".into()
        }
        .is_fatal());
        assert!(StoreError::ConnectionUnavailable {
            endpoint: "localhost:2379".into(),
            attempts: 3
        }
        .is_fatal());
        assert!(!StoreError::operation(
            StoreOp::Put,
            "/k",
            BackendError::Rejected("read-only".into())
        )
        .is_fatal());
    }
}
