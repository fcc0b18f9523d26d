//! Resolver settings derived from the service context.
//!
//! | Key | Meaning |
//! |-----|---------|
//! | `AppName` | Own identity for key lookups |
//! | `DEV_MODE` | `true` / `false` trust mode |
//! | `ZMQ_RECV_HWM` | Receive queue depth, `-1` = unset |
//! | `PubTopics` / `SubTopics` / `RequestEP` | Topic lists |
//! | `Clients` | Identities allowed to connect to Publisher/Server |
//! | `Server` | Shared server descriptor |
//! | `<topic>_cfg` | Per-topic descriptor |

use std::collections::BTreeMap;

use config_store::ServiceContext;
use tracing::warn;

use crate::domain::{TopicKind, TopicSpec, TrustMode};

/// Maximum identities in a Publisher/Server allow-list.
pub const MAX_ALLOWED_CLIENTS: usize = 200;

/// Maximum entries in the request-endpoint allow-list.
pub const MAX_REQUEST_ENDPOINTS: usize = 100;

const DESCRIPTOR_SUFFIX: &str = "_cfg";

/// Everything the resolver needs besides the key store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopologySettings {
    pub app_name: String,
    pub trust_mode: TrustMode,
    pub recv_hwm: Option<u32>,
    pub pub_topics: Vec<String>,
    pub sub_topics: Vec<String>,
    pub clients: Vec<String>,
    pub request_endpoints: Vec<String>,
    pub server_descriptor: Option<String>,
    /// Topic name to raw descriptor.
    pub descriptors: BTreeMap<String, String>,
}

impl TopologySettings {
    #[must_use]
    pub fn from_context(ctx: &ServiceContext) -> Self {
        let descriptors = ctx
            .iter()
            .filter_map(|(key, value)| {
                key.strip_suffix(DESCRIPTOR_SUFFIX)
                    .filter(|topic| !topic.is_empty())
                    .map(|topic| (topic.to_string(), value.to_string()))
            })
            .collect();

        Self {
            app_name: ctx.get_non_empty("AppName").unwrap_or_default().to_string(),
            trust_mode: TrustMode::from_dev_mode(ctx.get("DEV_MODE")),
            recv_hwm: parse_recv_hwm(ctx.get_non_empty("ZMQ_RECV_HWM")),
            pub_topics: ctx.list("PubTopics"),
            sub_topics: ctx.list("SubTopics"),
            clients: ctx.list("Clients"),
            request_endpoints: ctx.list("RequestEP"),
            server_descriptor: ctx.get_non_empty("Server").map(str::to_string),
            descriptors,
        }
    }

    /// Topic list entries of one kind.
    #[must_use]
    pub fn topics(&self, kind: TopicKind) -> Vec<TopicSpec> {
        let entries = match kind {
            TopicKind::Pub => &self.pub_topics,
            TopicKind::Sub => &self.sub_topics,
            TopicKind::Client => &self.request_endpoints,
        };
        entries.iter().map(|e| TopicSpec::parse(e)).collect()
    }

    /// Raw descriptor for a non-server topic.
    #[must_use]
    pub fn descriptor(&self, topic: &str) -> Option<&str> {
        self.descriptors.get(topic).map(String::as_str)
    }
}

/// `-1` and unset mean no override. Other invalid values are ignored with a warning.
fn parse_recv_hwm(raw: Option<&str>) -> Option<u32> {
    let raw = raw?;
    match raw.parse::<i64>() {
        Ok(-1) => None,
        Ok(value) => match u32::try_from(value) {
            Ok(hwm) => Some(hwm),
            Err(_) => {
                warn!(value, "ZMQ_RECV_HWM out of range, ignoring");
                None
            }
        },
        Err(e) => {
            warn!(raw = %raw, error = %e, "ZMQ_RECV_HWM is not an integer, ignoring");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> ServiceContext {
        ServiceContext::from_pairs([
            ("AppName", "VideoAnalytics"),
            ("DEV_MODE", "false"),
            ("ZMQ_RECV_HWM", "1000"),
            ("PubTopics", "camera1_stream_results"),
            ("SubTopics", "VideoIngestion/camera1_stream"),
            ("Clients", "Visualizer, ImageStore"),
            ("camera1_stream_cfg", "zmq_tcp,127.0.0.1:65013"),
            ("camera1_stream_results_cfg", "zmq_tcp,127.0.0.1:65014"),
            ("_cfg", "ignored"),
        ])
    }

    #[test]
    fn test_from_context() {
        let settings = TopologySettings::from_context(&context());
        assert_eq!(settings.app_name, "VideoAnalytics");
        assert_eq!(settings.trust_mode, TrustMode::Production);
        assert_eq!(settings.recv_hwm, Some(1000));
        assert_eq!(settings.clients, vec!["Visualizer", "ImageStore"]);
        assert_eq!(settings.descriptors.len(), 2);
        assert_eq!(
            settings.descriptor("camera1_stream"),
            Some("zmq_tcp,127.0.0.1:65013")
        );
        assert_eq!(settings.server_descriptor, None);
    }

    #[test]
    fn test_sub_topics_carry_publisher() {
        let settings = TopologySettings::from_context(&context());
        let subs = settings.topics(TopicKind::Sub);
        assert_eq!(subs[0].publisher.as_deref(), Some("VideoIngestion"));
        assert_eq!(subs[0].topic, "camera1_stream");
    }

    #[test]
    fn test_recv_hwm_sentinel() {
        assert_eq!(parse_recv_hwm(Some("-1")), None);
        assert_eq!(parse_recv_hwm(None), None);
        assert_eq!(parse_recv_hwm(Some("-5")), None);
        assert_eq!(parse_recv_hwm(Some("lots")), None);
        assert_eq!(parse_recv_hwm(Some("0")), Some(0));
    }
}
