//! # Resolution Flow
//!
//! Store-backed key lookup feeding the resolver, as a service sees it at
//! startup.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bus_topology::{
        ResolveRequest, StoreKeyLookup, TopicKind, TopologyApi, TopologyResolver,
        TopologySettings, Transport, TrustMode,
    };
    use config_store::{ConfigStoreApi, EnvSnapshot, StoreClient};
    use serde_json::json;
    use topology_runtime::TopologyRuntime;

    use crate::fixtures::{app_env, LoopbackStore, APP_NAME};

    // =========================================================================
    // FIXTURES
    // =========================================================================

    fn production_store() -> LoopbackStore {
        let store = LoopbackStore::start();
        for identity in [APP_NAME, "Visualizer", "ImageStore", "CameraFeed"] {
            store.seed_identity(identity);
        }
        store
    }

    fn resolver_for(
        client: StoreClient,
        env: &EnvSnapshot,
    ) -> TopologyResolver<StoreKeyLookup> {
        let settings = TopologySettings::from_context(&client.context(env));
        let store: Arc<dyn ConfigStoreApi> = Arc::new(client);
        TopologyResolver::new(settings, StoreKeyLookup::new(store))
    }

    // =========================================================================
    // PUBLISHER
    // =========================================================================

    #[test]
    fn test_production_publisher_gets_allow_list_from_store() {
        let store = production_store();
        let env = app_env(&[
            ("PubTopics", "camera1"),
            ("camera1_cfg", "zmq_tcp,127.0.0.1:65013"),
            ("Clients", "Visualizer, ImageStore, Unregistered"),
        ]);
        let resolver = resolver_for(store.connect().unwrap(), &env);
        assert_eq!(resolver.settings().trust_mode, TrustMode::Production);

        let request = ResolveRequest::publisher("camera1", resolver.settings().clients.clone());
        let config = resolver.resolve(&request).unwrap();

        assert_eq!(
            config.to_json(),
            json!({
                "type": "zmq_tcp",
                "zmq_recv_hwm": 1000,
                "zmq_tcp_publish": {
                    "host": "127.0.0.1",
                    "port": 65013,
                    "server_secret_key": "VideoAnalytics-priv"
                },
                "allowed_clients": ["Visualizer-pub", "ImageStore-pub"]
            })
        );
    }

    // =========================================================================
    // SUBSCRIBER / CLIENT
    // =========================================================================

    #[test]
    fn test_subscriber_keys_come_from_named_publisher() {
        let store = production_store();
        let env = app_env(&[
            ("SubTopics", "CameraFeed/camera1"),
            ("camera1_cfg", "tcp,10.0.0.5:65013"),
        ]);
        let resolver = resolver_for(store.connect().unwrap(), &env);

        let spec = resolver.settings().topics(TopicKind::Sub).remove(0);
        let config = resolver.resolve(&ResolveRequest::subscriber(&spec)).unwrap();

        let credentials = config.credentials().unwrap();
        assert_eq!(
            credentials.server_public_key.as_ref().map(|k| k.expose()),
            Some("CameraFeed-pub")
        );
        assert_eq!(
            credentials.client_public_key.as_ref().map(|k| k.expose()),
            Some("VideoAnalytics-pub")
        );
        assert_eq!(
            credentials.client_secret_key.as_ref().map(|k| k.expose()),
            Some("VideoAnalytics-priv")
        );
        assert_eq!(config.to_json()["camera1"]["host"], "10.0.0.5");
    }

    #[test]
    fn test_unlisted_request_endpoint_gets_no_keys() {
        let store = production_store();
        let env = app_env(&[
            ("RequestEP", "ImageStore"),
            ("ImageStore_cfg", "tcp,127.0.0.1:5669"),
            ("Visualizer_cfg", "tcp,127.0.0.1:5670"),
        ]);
        let resolver = resolver_for(store.connect().unwrap(), &env);

        let listed = resolver
            .resolve(&ResolveRequest::client("ImageStore", "ImageStore"))
            .unwrap();
        let unlisted = resolver
            .resolve(&ResolveRequest::client("Visualizer", "Visualizer"))
            .unwrap();

        assert!(listed.credentials().is_some_and(|c| c.server_public_key.is_some()));
        assert!(unlisted.credentials().is_some_and(|c| c.is_empty()));
    }

    // =========================================================================
    // IPC
    // =========================================================================

    #[test]
    fn test_ipc_never_touches_store() {
        let store = production_store();
        let socket_dir = tempfile::tempdir().unwrap();
        let descriptor = format!("zmq_ipc,{}", socket_dir.path().display());
        let env = app_env(&[("PubTopics", "camera1"), ("camera1_cfg", descriptor.as_str())]);
        let resolver = resolver_for(store.connect().unwrap(), &env);
        let reads_before = store.backend.read_count();

        let config = resolver
            .resolve(&ResolveRequest::publisher("camera1", vec!["Visualizer".into()]))
            .unwrap();

        assert_eq!(
            config.transport,
            Some(Transport::Ipc {
                socket_dir: socket_dir.path().to_path_buf()
            })
        );
        assert_eq!(store.backend.read_count(), reads_before);
    }

    #[test]
    fn test_development_mode_skips_store_lookups() {
        let store = production_store();
        store.seed("/GlobalEnv/", r#"{"DEV_MODE": "TRUE"}"#);
        let env = app_env(&[("PubTopics", "camera1"), ("camera1_cfg", "tcp,127.0.0.1:65013")]);
        let resolver = resolver_for(store.connect().unwrap(), &env);
        let reads_before = store.backend.read_count();

        let config = resolver
            .resolve(&ResolveRequest::publisher("camera1", vec!["Visualizer".into()]))
            .unwrap();

        assert_eq!(
            config.to_json(),
            json!({"type": "tcp", "publish": {"host": "127.0.0.1", "port": 65013}})
        );
        assert_eq!(store.backend.read_count(), reads_before);
    }

    // =========================================================================
    // RUNTIME
    // =========================================================================

    #[test]
    fn test_runtime_resolves_every_declared_slot() {
        let store = production_store();
        let env = app_env(&[
            ("PubTopics", "camera1,camera2"),
            ("SubTopics", "CameraFeed/frames"),
            ("Clients", "Visualizer"),
            ("RequestEP", "ImageStore"),
            ("Server", "tcp,127.0.0.1:5669"),
            ("camera1_cfg", "tcp,127.0.0.1:65013"),
            ("frames_cfg", "tcp,127.0.0.1:65014"),
            ("ImageStore_cfg", "tcp,127.0.0.1:5670"),
        ]);
        let runtime = TopologyRuntime::new(store.connect().unwrap(), &env);

        let report = runtime.resolve_all();

        assert_eq!(report.app_name, APP_NAME);
        assert!(report.publishers["camera1"].is_some());
        assert!(report.publishers["camera2"].is_none());
        assert!(report.subscribers["frames"].is_some());
        assert!(report.clients["ImageStore"].is_some());
        let server = report.server.as_ref().unwrap().to_json();
        assert_eq!(server[APP_NAME]["server_secret_key"], "VideoAnalytics-priv");
        assert_eq!(server["allowed_clients"], json!(["Visualizer-pub"]));
        assert_eq!(report.missing(), vec!["publishers/camera2".to_string()]);
    }
}
