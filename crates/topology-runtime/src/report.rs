//! Resolution of every declared topic.
//!
//! ```text
//! {
//!   "app_name": "...",
//!   "publishers":  { "<topic>": <TopicConfig> | null },
//!   "subscribers": { "<topic>": ... },
//!   "clients":     { "<topic>": ... },
//!   "server":      <TopicConfig> | null
//! }
//! ```

use std::collections::BTreeMap;

use bus_telemetry::TOPIC_RESOLUTIONS;
use bus_topology::{ResolveRequest, Role, TopicConfig, TopicKind, TopologyApi, TopologySettings};
use serde::Serialize;
use tracing::info;

/// Outcome of one topic resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTopic {
    pub role: Role,
    pub topic: String,
    pub config: Option<TopicConfig>,
}

impl ResolvedTopic {
    /// `resolved`, `partial` (no transport) or `missing` (no config).
    pub fn outcome(&self) -> &'static str {
        match &self.config {
            Some(config) if config.transport.is_some() => "resolved",
            Some(_) => "partial",
            None => "missing",
        }
    }
}

/// All resolutions of one startup.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TopologyReport {
    pub app_name: String,
    pub publishers: BTreeMap<String, Option<TopicConfig>>,
    pub subscribers: BTreeMap<String, Option<TopicConfig>>,
    pub clients: BTreeMap<String, Option<TopicConfig>>,
    pub server: Option<TopicConfig>,
}

impl TopologyReport {
    /// Resolve every topic declared in `settings`.
    ///
    /// Publisher and server allow-lists come from `Clients`. Subscribers
    /// connect to the publisher named in their `<publisher>/<topic>` entry;
    /// clients connect to the identity named the same way, or to the topic's
    /// own name when unqualified.
    pub fn build(resolver: &impl TopologyApi, settings: &TopologySettings) -> Self {
        let mut report = Self {
            app_name: settings.app_name.clone(),
            ..Self::default()
        };

        for spec in settings.topics(TopicKind::Pub) {
            let request = ResolveRequest::publisher(&spec.topic, settings.clients.clone());
            let resolved = resolve(resolver, &request);
            report.publishers.insert(resolved.topic, resolved.config);
        }

        for spec in settings.topics(TopicKind::Sub) {
            let resolved = resolve(resolver, &ResolveRequest::subscriber(&spec));
            report.subscribers.insert(resolved.topic, resolved.config);
        }

        for spec in settings.topics(TopicKind::Client) {
            let server = spec.publisher.as_deref().unwrap_or(&spec.topic);
            let resolved = resolve(resolver, &ResolveRequest::client(&spec.topic, server));
            report.clients.insert(resolved.topic, resolved.config);
        }

        if settings.server_descriptor.is_some() {
            let request = ResolveRequest::server(&settings.app_name, settings.clients.clone());
            report.server = resolve(resolver, &request).config;
        }

        info!(
            app = %report.app_name,
            publishers = report.publishers.len(),
            subscribers = report.subscribers.len(),
            clients = report.clients.len(),
            server = report.server.is_some(),
            "topology resolved"
        );
        report
    }

    /// Every configuration slot that came back empty.
    pub fn missing(&self) -> Vec<String> {
        let sections = [
            ("publishers", &self.publishers),
            ("subscribers", &self.subscribers),
            ("clients", &self.clients),
        ];
        sections
            .iter()
            .flat_map(|(section, entries)| {
                entries
                    .iter()
                    .filter(|(_, config)| config.is_none())
                    .map(move |(topic, _)| format!("{section}/{topic}"))
            })
            .collect()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

fn resolve(resolver: &impl TopologyApi, request: &ResolveRequest) -> ResolvedTopic {
    let resolved = ResolvedTopic {
        role: request.role,
        topic: request.topic.clone(),
        config: resolver.resolve(request),
    };
    let role = request.role.to_string();
    TOPIC_RESOLUTIONS
        .with_label_values(&[role.as_str(), resolved.outcome()])
        .inc();
    resolved
}
