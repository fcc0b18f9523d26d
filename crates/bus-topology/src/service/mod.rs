//! # Topology Resolver Service
//!
//! Stateless: every call reads only its request, the immutable settings and
//! the key store.

mod credentials;


use std::path::PathBuf;

use tracing::{debug, error};

use crate::domain::{
    parse_tcp_address, Descriptor, ResolveIssue, ResolveRequest, Role, TopicConfig,
    TopologySettings, Transport, TransportMode,
};
use crate::ports::{KeyLookup, TopologyApi};

pub use credentials::assemble_credentials;

/// Resolves topic configurations against a key store.
pub struct TopologyResolver<L: KeyLookup> {
    settings: TopologySettings,
    keys: L,
}

impl<L: KeyLookup> TopologyResolver<L> {
    pub fn new(settings: TopologySettings, keys: L) -> Self {
        Self { settings, keys }
    }

    pub fn settings(&self) -> &TopologySettings {
        &self.settings
    }

    pub fn keys(&self) -> &L {
        &self.keys
    }

    fn descriptor_for(&self, request: &ResolveRequest) -> Option<&str> {
        match request.role {
            Role::Server => self.settings.server_descriptor.as_deref(),
            _ => self.settings.descriptor(&request.topic),
        }
    }
}

impl<L: KeyLookup> TopologyApi for TopologyResolver<L> {
    fn resolve(&self, request: &ResolveRequest) -> Option<TopicConfig> {
        let topic = request.topic.as_str();
        let role = request.role;

        let Some(raw) = self.descriptor_for(request) else {
            error!(
                topic = %topic,
                role = %role,
                issue = %ResolveIssue::MissingDescriptor,
                "descriptor not set"
            );
            return None;
        };

        let Some(descriptor) = Descriptor::parse(raw) else {
            error!(
                topic = %topic,
                role = %role,
                descriptor = %raw,
                issue = %ResolveIssue::MalformedDescriptor,
                "descriptor is not <mode>,<address>"
            );
            return None;
        };

        let mut config = TopicConfig::new(descriptor.mode.clone(), self.settings.recv_hwm);

        match descriptor.transport_mode() {
            None => {
                error!(
                    topic = %topic,
                    role = %role,
                    mode = %descriptor.mode,
                    issue = %ResolveIssue::InvalidMode,
                    "unsupported transport mode"
                );
            }
            Some(TransportMode::Ipc) => {
                config.transport = Some(Transport::Ipc {
                    socket_dir: PathBuf::from(&descriptor.address),
                });
            }
            Some(TransportMode::Tcp) => {
                let Some((host, port)) = parse_tcp_address(&descriptor.address) else {
                    error!(
                        topic = %topic,
                        role = %role,
                        address = %descriptor.address,
                        issue = %ResolveIssue::InvalidAddress,
                        "tcp address is not host:port"
                    );
                    return Some(config);
                };

                let block_key = match role {
                    Role::Publisher => config.publish_block_key().to_string(),
                    _ => topic.to_string(),
                };
                let credentials = if self.settings.trust_mode.is_development() {
                    Default::default()
                } else {
                    assemble_credentials(request, &self.settings, &self.keys)
                };

                config.transport = Some(Transport::Tcp {
                    block_key,
                    host,
                    port,
                    credentials,
                });
            }
        }

        debug!(topic = %topic, role = %role, mode = %config.mode, "topic resolved");
        Some(config)
    }
}
