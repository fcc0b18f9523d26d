//! Resolution requests and topic list entries.

use crate::domain::Role;

/// One resolution: a topic, the role played on it and the peer identities.
///
/// Publisher and Server take the identities allowed to connect. Subscriber
/// and Client take the single counterpart they connect to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveRequest {
    pub topic: String,
    pub role: Role,
    pub peers: Vec<String>,
}

impl ResolveRequest {
    pub fn new(topic: &str, role: Role, peers: Vec<String>) -> Self {
        Self {
            topic: topic.trim().to_string(),
            role,
            peers,
        }
    }

    pub fn publisher(topic: &str, subscribers: Vec<String>) -> Self {
        Self::new(topic, Role::Publisher, subscribers)
    }

    pub fn server(topic: &str, clients: Vec<String>) -> Self {
        Self::new(topic, Role::Server, clients)
    }

    /// Subscriber request from a `<publisher>/<topic>` list entry.
    pub fn subscriber(spec: &TopicSpec) -> Self {
        Self::new(
            &spec.topic,
            Role::Subscriber,
            spec.publisher.iter().cloned().collect(),
        )
    }

    pub fn client(topic: &str, server: &str) -> Self {
        Self::new(topic, Role::Client, vec![server.trim().to_string()])
    }

    /// The single counterpart of a Subscriber or Client.
    #[must_use]
    pub fn counterpart(&self) -> Option<&str> {
        self.peers
            .first()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
    }
}

/// Which topic list to read from the service context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicKind {
    /// `PubTopics`
    Pub,
    /// `SubTopics`
    Sub,
    /// `RequestEP`
    Client,
}

impl TopicKind {
    #[must_use]
    pub fn env_key(self) -> &'static str {
        match self {
            Self::Pub => "PubTopics",
            Self::Sub => "SubTopics",
            Self::Client => "RequestEP",
        }
    }
}

/// A topic list entry, optionally qualified by its publisher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicSpec {
    pub publisher: Option<String>,
    pub topic: String,
}

impl TopicSpec {
    /// Parse `"<publisher>/<topic>"` or a bare `"<topic>"`.
    #[must_use]
    pub fn parse(entry: &str) -> Self {
        match entry.trim().split_once('/') {
            Some((publisher, topic)) => {
                let publisher = publisher.trim();
                Self {
                    publisher: (!publisher.is_empty()).then(|| publisher.to_string()),
                    topic: topic.trim().to_string(),
                }
            }
            None => Self {
                publisher: None,
                topic: entry.trim().to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_is_trimmed() {
        let req = ResolveRequest::publisher("  camera1_stream ", vec![]);
        assert_eq!(req.topic, "camera1_stream");
    }

    #[test]
    fn test_qualified_topic_spec() {
        let spec = TopicSpec::parse(" VideoIngestion / camera1_stream ");
        assert_eq!(spec.publisher.as_deref(), Some("VideoIngestion"));
        assert_eq!(spec.topic, "camera1_stream");

        let req = ResolveRequest::subscriber(&spec);
        assert_eq!(req.role, Role::Subscriber);
        assert_eq!(req.counterpart(), Some("VideoIngestion"));
    }

    #[test]
    fn test_bare_topic_spec() {
        let spec = TopicSpec::parse("camera1_stream");
        assert_eq!(spec.publisher, None);
        assert_eq!(ResolveRequest::subscriber(&spec).counterpart(), None);
    }

    #[test]
    fn test_client_counterpart() {
        let req = ResolveRequest::client("ImageStore", " ImageStore ");
        assert_eq!(req.counterpart(), Some("ImageStore"));
    }
}
