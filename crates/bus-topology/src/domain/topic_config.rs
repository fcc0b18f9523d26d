//! # Topic Configuration
//!
//! Result of one resolution, rendered to the bus client's JSON schema:
//!
//! ```text
//! tcp: {"type", "recv_hwm"?, "<block_key>": {"host", "port", keys...}, "allowed_clients"?}
//! ipc: {"type", "recv_hwm"?, "socket_dir"}
//! ```
//!
//! `zmq_` modes use `zmq_recv_hwm` and `zmq_tcp_publish` instead.

use std::path::PathBuf;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::domain::{is_zmq_mode, KeyMaterial};

/// Keys attached to a TCP endpoint. Every field is optional because lookups
/// fail soft.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialBundle {
    pub server_public_key: Option<KeyMaterial>,
    pub client_public_key: Option<KeyMaterial>,
    pub client_secret_key: Option<KeyMaterial>,
    pub server_secret_key: Option<KeyMaterial>,
    pub allowed_clients: Option<Vec<KeyMaterial>>,
}

impl CredentialBundle {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.server_public_key.is_none()
            && self.client_public_key.is_none()
            && self.client_secret_key.is_none()
            && self.server_secret_key.is_none()
            && self.allowed_clients.is_none()
    }

    /// Fields rendered inside the endpoint block.
    fn block_entries(&self) -> impl Iterator<Item = (&'static str, &KeyMaterial)> {
        [
            ("server_public_key", self.server_public_key.as_ref()),
            ("client_public_key", self.client_public_key.as_ref()),
            ("client_secret_key", self.client_secret_key.as_ref()),
            ("server_secret_key", self.server_secret_key.as_ref()),
        ]
        .into_iter()
        .filter_map(|(name, key)| key.map(|k| (name, k)))
    }
}

/// Concrete transport of a topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transport {
    Tcp {
        /// `publish` for publishers, the topic otherwise.
        block_key: String,
        host: String,
        port: u16,
        credentials: CredentialBundle,
    },
    Ipc {
        socket_dir: PathBuf,
    },
}

/// Per-topic bus configuration. Computed fresh on every resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicConfig {
    pub mode: String,
    pub recv_hwm: Option<u32>,
    pub transport: Option<Transport>,
}

impl TopicConfig {
    /// Config seeded with `{type: mode}` and no transport.
    pub fn new(mode: impl Into<String>, recv_hwm: Option<u32>) -> Self {
        Self {
            mode: mode.into(),
            recv_hwm,
            transport: None,
        }
    }

    /// Block key used for publisher endpoints in this mode's dialect.
    #[must_use]
    pub fn publish_block_key(&self) -> &'static str {
        if is_zmq_mode(&self.mode) {
            "zmq_tcp_publish"
        } else {
            "publish"
        }
    }

    fn recv_hwm_key(&self) -> &'static str {
        if is_zmq_mode(&self.mode) {
            "zmq_recv_hwm"
        } else {
            "recv_hwm"
        }
    }

    /// Credentials of a TCP transport.
    #[must_use]
    pub fn credentials(&self) -> Option<&CredentialBundle> {
        match &self.transport {
            Some(Transport::Tcp { credentials, .. }) => Some(credentials),
            _ => None,
        }
    }

    /// Render to the bus client's JSON schema. Secret keys are included.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut root = Map::new();
        root.insert("type".into(), Value::from(self.mode.as_str()));
        if let Some(hwm) = self.recv_hwm {
            root.insert(self.recv_hwm_key().into(), Value::from(hwm));
        }

        match &self.transport {
            Some(Transport::Tcp {
                block_key,
                host,
                port,
                credentials,
            }) => {
                let mut block = Map::new();
                block.insert("host".into(), Value::from(host.as_str()));
                block.insert("port".into(), Value::from(*port));
                for (name, key) in credentials.block_entries() {
                    block.insert(name.into(), Value::from(key.expose()));
                }
                root.insert(block_key.clone(), Value::Object(block));

                if let Some(clients) = &credentials.allowed_clients {
                    let keys = clients.iter().map(|k| Value::from(k.expose())).collect();
                    root.insert("allowed_clients".into(), Value::Array(keys));
                }
            }
            Some(Transport::Ipc { socket_dir }) => {
                root.insert(
                    "socket_dir".into(),
                    Value::from(socket_dir.to_string_lossy().into_owned()),
                );
            }
            None => {}
        }

        Value::Object(root)
    }
}

impl Serialize for TopicConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tcp(block_key: &str, credentials: CredentialBundle) -> Transport {
        Transport::Tcp {
            block_key: block_key.into(),
            host: "127.0.0.1".into(),
            port: 65013,
            credentials,
        }
    }

    #[test]
    fn test_plain_publisher_json() {
        let mut config = TopicConfig::new("tcp", None);
        config.transport = Some(tcp(config.publish_block_key(), CredentialBundle::default()));
        assert_eq!(
            config.to_json(),
            json!({"type": "tcp", "publish": {"host": "127.0.0.1", "port": 65013}})
        );
    }

    #[test]
    fn test_zmq_dialect_keys() {
        let mut config = TopicConfig::new("zmq_tcp", Some(50));
        config.transport = Some(tcp(config.publish_block_key(), CredentialBundle::default()));
        let rendered = config.to_json();
        assert_eq!(rendered["zmq_recv_hwm"], json!(50));
        assert!(rendered.get("zmq_tcp_publish").is_some());
    }

    #[test]
    fn test_credentials_placement() {
        let credentials = CredentialBundle {
            server_secret_key: Some(KeyMaterial::new("srv-secret")),
            allowed_clients: Some(vec![KeyMaterial::new("a"), KeyMaterial::new("b")]),
            ..CredentialBundle::default()
        };
        let mut config = TopicConfig::new("tcp", None);
        config.transport = Some(tcp("echo_service", credentials));

        let rendered = config.to_json();
        assert_eq!(rendered["echo_service"]["server_secret_key"], json!("srv-secret"));
        assert_eq!(rendered["allowed_clients"], json!(["a", "b"]));
        assert!(rendered["echo_service"].get("allowed_clients").is_none());
    }

    #[test]
    fn test_ipc_json() {
        let mut config = TopicConfig::new("ipc", Some(10));
        config.transport = Some(Transport::Ipc {
            socket_dir: PathBuf::from("/var/run/sock"),
        });
        assert_eq!(
            config.to_json(),
            json!({"type": "ipc", "recv_hwm": 10, "socket_dir": "/var/run/sock"})
        );
        assert!(config.credentials().is_none());
    }

    #[test]
    fn test_serialize_matches_to_json() {
        let config = TopicConfig::new("udp", None);
        assert_eq!(serde_json::to_value(&config).unwrap(), json!({"type": "udp"}));
    }
}
