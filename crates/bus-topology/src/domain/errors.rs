//! Resolution errors and soft-failure tags.

use std::fmt;

use thiserror::Error;

/// Failure of a single key lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The key store could not serve the request.
    #[error("key lookup for {key} failed: {reason}")]
    Store { key: String, reason: String },
}

/// Soft failure observed during resolution. Only used as a log field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveIssue {
    MissingDescriptor,
    MalformedDescriptor,
    InvalidMode,
    InvalidAddress,
    KeyLookupFailed,
    MissingCounterpart,
    PeerLimitExceeded,
}

impl fmt::Display for ResolveIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::MissingDescriptor => "missing_descriptor",
            Self::MalformedDescriptor => "malformed_descriptor",
            Self::InvalidMode => "invalid_mode",
            Self::InvalidAddress => "invalid_address",
            Self::KeyLookupFailed => "key_lookup_failed",
            Self::MissingCounterpart => "missing_counterpart",
            Self::PeerLimitExceeded => "peer_limit_exceeded",
        };
        f.write_str(tag)
    }
}
