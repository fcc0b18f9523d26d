//! # Inbound Ports (Driving Ports)

use crate::domain::{ResolveRequest, TopicConfig};

/// Topic resolution API.
pub trait TopologyApi {
    /// Resolve one topic for one role.
    ///
    /// Returns `None` when the descriptor is missing or malformed. Otherwise
    /// returns a possibly partial config; callers must check for the fields
    /// they require before connecting.
    fn resolve(&self, request: &ResolveRequest) -> Option<TopicConfig>;
}
