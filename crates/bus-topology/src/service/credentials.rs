//! Role-dispatched credential assembly.
//!
//! Only called in production trust mode for TCP transports.

use tracing::{debug, error, warn};

use crate::domain::{
    CredentialBundle, KeyMaterial, LookupError, ResolveIssue, ResolveRequest, Role,
    TopicSpec, TopologySettings, MAX_ALLOWED_CLIENTS, MAX_REQUEST_ENDPOINTS,
};
use crate::ports::KeyLookup;

/// Build the key bundle for `request.role`.
///
/// | Role | Fields |
/// |------|--------|
/// | Publisher, Server | `allowed_clients`, `server_secret_key` |
/// | Subscriber | `server_public_key`, `client_public_key`, `client_secret_key` |
/// | Client | as Subscriber, only if the topic is a listed request endpoint |
pub fn assemble_credentials<L: KeyLookup + ?Sized>(
    request: &ResolveRequest,
    settings: &TopologySettings,
    keys: &L,
) -> CredentialBundle {
    let ctx = LookupContext {
        topic: &request.topic,
        role: request.role,
        keys,
    };

    match request.role {
        Role::Publisher | Role::Server => CredentialBundle {
            allowed_clients: Some(ctx.allowed_clients(&request.peers)),
            server_secret_key: ctx.own_private_key(&settings.app_name),
            ..CredentialBundle::default()
        },
        Role::Subscriber => ctx.connecting_credentials(request.counterpart(), &settings.app_name),
        Role::Client => {
            if settings.request_endpoints.len() > MAX_REQUEST_ENDPOINTS {
                error!(
                    topic = %request.topic,
                    endpoints = settings.request_endpoints.len(),
                    limit = MAX_REQUEST_ENDPOINTS,
                    issue = %ResolveIssue::PeerLimitExceeded,
                    "too many request endpoints, attaching no credentials"
                );
                return CredentialBundle::default();
            }
            let listed = settings
                .request_endpoints
                .iter()
                .any(|entry| TopicSpec::parse(entry).topic == request.topic);
            if !listed {
                debug!(topic = %request.topic, "topic not a listed request endpoint");
                return CredentialBundle::default();
            }
            ctx.connecting_credentials(request.counterpart(), &settings.app_name)
        }
    }
}

struct LookupContext<'a, L: ?Sized> {
    topic: &'a str,
    role: Role,
    keys: &'a L,
}

impl<L: KeyLookup + ?Sized> LookupContext<'_, L> {
    /// Public keys of every peer that has one, capped at `MAX_ALLOWED_CLIENTS`.
    fn allowed_clients(&self, peers: &[String]) -> Vec<KeyMaterial> {
        if peers.len() > MAX_ALLOWED_CLIENTS {
            error!(
                topic = %self.topic,
                role = %self.role,
                peers = peers.len(),
                limit = MAX_ALLOWED_CLIENTS,
                issue = %ResolveIssue::PeerLimitExceeded,
                "too many peers, allow-list left empty"
            );
            return Vec::new();
        }

        peers
            .iter()
            .map(|peer| peer.trim())
            .filter(|peer| !peer.is_empty())
            .filter_map(|peer| {
                let key = self.checked(peer, "public", self.keys.public_key(peer));
                if key.is_none() {
                    debug!(topic = %self.topic, peer = %peer, "peer has no public key, skipped");
                }
                key
            })
            .collect()
    }

    fn own_private_key(&self, app_name: &str) -> Option<KeyMaterial> {
        let key = self.checked(app_name, "private", self.keys.private_key(app_name));
        if key.is_none() {
            warn!(
                topic = %self.topic,
                role = %self.role,
                identity = %app_name,
                "own private key not found"
            );
        }
        key
    }

    /// Subscriber and Client bundle.
    fn connecting_credentials(
        &self,
        counterpart: Option<&str>,
        app_name: &str,
    ) -> CredentialBundle {
        let server_public_key = match counterpart {
            Some(peer) => {
                let key = self.checked(peer, "public", self.keys.public_key(peer));
                if key.is_none() {
                    warn!(
                        topic = %self.topic,
                        role = %self.role,
                        peer = %peer,
                        "counterpart public key not found"
                    );
                }
                key
            }
            None => {
                warn!(
                    topic = %self.topic,
                    role = %self.role,
                    issue = %ResolveIssue::MissingCounterpart,
                    "no counterpart identity, server public key omitted"
                );
                None
            }
        };

        CredentialBundle {
            server_public_key,
            client_public_key: self.checked(app_name, "public", self.keys.public_key(app_name)),
            client_secret_key: self.own_private_key(app_name),
            ..CredentialBundle::default()
        }
    }

    /// Log failed lookups and fold them into absence.
    fn checked(
        &self,
        identity: &str,
        kind: &'static str,
        result: Result<Option<KeyMaterial>, LookupError>,
    ) -> Option<KeyMaterial> {
        match result {
            Ok(key) => key,
            Err(e) => {
                error!(
                    topic = %self.topic,
                    role = %self.role,
                    identity = %identity,
                    kind,
                    error = %e,
                    issue = %ResolveIssue::KeyLookupFailed,
                    "key lookup failed, field omitted"
                );
                None
            }
        }
    }
}
