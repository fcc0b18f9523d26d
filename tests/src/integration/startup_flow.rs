//! # Startup Flow
//!
//! Probe → open → bootstrap → context, through a real loopback probe.

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use config_store::{
        ConfigStoreApi, KeyNamespace, StoreClient, StoreError, StoreSettings,
        TcpReachabilityProbe, GLOBAL_BOOTSTRAP_KEY,
    };

    use crate::fixtures::{app_env, closed_endpoint, fast_probe, LoopbackStore, APP_NAME};

    // =========================================================================
    // READINESS
    // =========================================================================

    #[test]
    fn test_connects_when_store_accepts() {
        let store = LoopbackStore::start();

        let client = store.connect().unwrap();

        assert_eq!(store.backend.open_count(), 1);
        assert_eq!(client.bootstrap().get("DEV_MODE"), Some("false"));
        assert_eq!(client.bootstrap().get("ZMQ_RECV_HWM"), Some("1000"));
    }

    #[test]
    fn test_unreachable_store_fails_before_bootstrap() {
        let store = LoopbackStore::start();
        let settings = StoreSettings {
            endpoint: closed_endpoint(),
            ..StoreSettings::default()
        }
        .with_probe(fast_probe(3));

        let started = Instant::now();
        let result = StoreClient::connect(settings, &TcpReachabilityProbe, &store.backend);

        match result {
            Err(StoreError::ConnectionUnavailable { attempts, .. }) => assert_eq!(attempts, 3),
            Err(other) => panic!("expected ConnectionUnavailable, got {other}"),
            Ok(_) => panic!("connected to a closed port"),
        }
        assert_eq!(store.backend.open_count(), 0);
        assert_eq!(store.backend.read_count(), 0);
        assert!(started.elapsed().as_secs() < 5);
    }

    // =========================================================================
    // BOOTSTRAP
    // =========================================================================

    #[test]
    fn test_missing_bootstrap_is_fatal() {
        let store = LoopbackStore::start_in(KeyNamespace::new("/site-a"));
        // Bootstrap seeded under the prefix; an unprefixed client must not find it.
        let settings = store.settings().with_namespace(KeyNamespace::root());

        let err = StoreClient::connect(settings, &TcpReachabilityProbe, &store.backend)
            .err()
            .unwrap();

        assert!(matches!(err, StoreError::MissingBootstrap { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_invalid_bootstrap_is_fatal() {
        let store = LoopbackStore::start();
        store.seed(GLOBAL_BOOTSTRAP_KEY, "[1, 2, 3]");

        let err = store.connect().err().unwrap();

        assert!(matches!(err, StoreError::InvalidBootstrap { .. }));
    }

    #[test]
    fn test_context_overlays_bootstrap_on_env() {
        let store = LoopbackStore::start();
        let client = store.connect().unwrap();
        let env = app_env(&[("DEV_MODE", "true"), ("PubTopics", "camera1")]);

        let ctx = client.context(&env);

        assert_eq!(ctx.get("DEV_MODE"), Some("false"));
        assert_eq!(ctx.get("AppName"), Some(APP_NAME));
        assert_eq!(ctx.list("PubTopics"), vec!["camera1"]);
        assert_eq!(env.get("DEV_MODE"), Some("true"));
    }

    // =========================================================================
    // NAMESPACING
    // =========================================================================

    #[test]
    fn test_prefixed_client_round_trip() {
        let store = LoopbackStore::start_in(KeyNamespace::new("/site-a"));
        let client = store.connect().unwrap();

        client.put("/VideoAnalytics/config", "{\"fps\": 30}").unwrap();

        assert!(store
            .backend
            .keys()
            .contains(&"/site-a/VideoAnalytics/config".to_string()));
        assert_eq!(
            client.get("/VideoAnalytics/config").unwrap().as_deref(),
            Some("{\"fps\": 30}")
        );
        assert_eq!(client.get("/VideoAnalytics/absent").unwrap(), None);
    }
}
