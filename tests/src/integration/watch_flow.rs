//! # Watch Flow
//!
//! Single-slot watch registration observed end to end: writes through one
//! client, notifications delivered to the callback of the current slot only.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use config_store::{ConfigStoreApi, KeyNamespace, KvBackend, WatchCallback, WatchTarget};
    use tokio::sync::mpsc;
    use tokio::time::timeout;
    use topology_runtime::TopologyRuntime;

    use crate::fixtures::{app_env, LoopbackStore};

    // =========================================================================
    // FIXTURES
    // =========================================================================

    type Received = mpsc::UnboundedReceiver<(String, String)>;

    fn recording_callback() -> (WatchCallback, Received) {
        let (tx, rx) = mpsc::unbounded_channel();
        let callback: WatchCallback = Arc::new(move |key: &str, value: &str| {
            let _ = tx.send((key.to_string(), value.to_string()));
        });
        (callback, rx)
    }

    async fn next(rx: &mut Received) -> Option<(String, String)> {
        timeout(Duration::from_secs(2), rx.recv()).await.ok().flatten()
    }

    /// No event arrives within `wait`. A closed channel counts as silent.
    async fn nothing_within(rx: &mut Received, wait: Duration) -> bool {
        matches!(timeout(wait, rx.recv()).await, Err(_) | Ok(None))
    }

    // =========================================================================
    // SLOT REPLACEMENT
    // =========================================================================

    #[tokio::test]
    async fn test_dir_watch_replaces_key_watch() {
        let store = LoopbackStore::start();
        let client = store.connect().unwrap();
        let (key_cb, mut key_rx) = recording_callback();
        let (dir_cb, mut dir_rx) = recording_callback();

        client
            .register_key_watch("/VideoAnalytics/config", key_cb)
            .unwrap();
        client.put("/VideoAnalytics/config", "v1").unwrap();
        assert_eq!(
            next(&mut key_rx).await,
            Some(("/VideoAnalytics/config".into(), "v1".into()))
        );

        client.register_dir_watch("/VideoAnalytics/", dir_cb).unwrap();
        assert_eq!(
            client.active_watch(),
            Some(WatchTarget::Prefix("/VideoAnalytics/".into()))
        );
        assert_eq!(store.backend.active_watch_count(), 1);

        client.put("/VideoAnalytics/config", "v2").unwrap();
        client.put("/VideoAnalytics/private_key", "secret").unwrap();

        assert_eq!(
            next(&mut dir_rx).await,
            Some(("/VideoAnalytics/config".into(), "v2".into()))
        );
        assert_eq!(
            next(&mut dir_rx).await,
            Some(("/VideoAnalytics/private_key".into(), "secret".into()))
        );
        assert!(nothing_within(&mut key_rx, Duration::from_millis(100)).await);
    }

    #[tokio::test]
    async fn test_prefixed_watch_reports_caller_keys() {
        let store = LoopbackStore::start_in(KeyNamespace::new("/site-a"));
        let client = store.connect().unwrap();
        let (callback, mut rx) = recording_callback();

        client.register_dir_watch("/VideoAnalytics/", callback).unwrap();
        store.seed("/VideoAnalytics/config", "{}");
        store
            .backend
            .put("/site-b/VideoAnalytics/config", b"other site")
            .unwrap();

        assert_eq!(
            next(&mut rx).await,
            Some(("/VideoAnalytics/config".into(), "{}".into()))
        );
        assert!(nothing_within(&mut rx, Duration::from_millis(100)).await);
    }

    #[tokio::test]
    async fn test_dropping_client_cancels_watch() {
        let store = LoopbackStore::start();
        let client = store.connect().unwrap();
        let (callback, mut rx) = recording_callback();
        client.register_key_watch("/VideoAnalytics/config", callback).unwrap();

        drop(client);
        store.seed("/VideoAnalytics/config", "late");

        assert_eq!(store.backend.active_watch_count(), 0);
        assert_eq!(next(&mut rx).await, None);
    }

    // =========================================================================
    // RUNTIME
    // =========================================================================

    #[tokio::test]
    async fn test_runtime_watches_application_directory() {
        let store = LoopbackStore::start();
        let runtime = TopologyRuntime::new(store.connect().unwrap(), &app_env(&[]));
        let (tx, mut rx) = mpsc::unbounded_channel();

        runtime
            .watch_app_config(move |key, value| {
                let _ = tx.send((key.to_string(), value.to_string()));
            })
            .unwrap();
        store.seed("/VideoAnalytics/config", "{\"fps\": 15}");
        store.seed("/Visualizer/config", "ignored");

        assert_eq!(runtime.app_prefix(), "/VideoAnalytics/");
        assert_eq!(
            next(&mut rx).await,
            Some(("/VideoAnalytics/config".into(), "{\"fps\": 15}".into()))
        );
        assert!(nothing_within(&mut rx, Duration::from_millis(100)).await);
    }
}
