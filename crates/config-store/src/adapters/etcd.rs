//! etcd v3 backend.
//!
//! Blocking facade over the async `etcd-client`. The backend owns a small
//! private tokio runtime. Every request is spawned onto that runtime and the
//! caller waits on a channel for the result, so the facade may be called
//! from any thread, including a worker of another tokio runtime. Watch
//! streams are pumped by a task on the private runtime straight into the
//! client's change sink.

use std::fs;
use std::future::Future;
use std::path::Path;
use std::sync::mpsc;
use std::sync::Arc;

use etcd_client::{
    Certificate, Client, ConnectOptions, EventType, Identity, TlsOptions, WatchOptions,
};
use tokio::runtime::Runtime;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::domain::{BackendError, ChangeEvent, StoreSettings, StoreTls, WatchTarget};
use crate::ports::{BackendConnector, ChangeSink, KvBackend, WatchGuard};

/// Opens an [`EtcdKvBackend`] from store settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct EtcdConnector;

impl BackendConnector for EtcdConnector {
    fn open(&self, settings: &StoreSettings) -> Result<Arc<dyn KvBackend>, BackendError> {
        let (endpoint, options) = match &settings.tls {
            Some(tls) => (
                format!("https://{}", settings.endpoint),
                Some(ConnectOptions::new().with_tls(tls_options(tls)?)),
            ),
            None => (format!("http://{}", settings.endpoint), None),
        };

        let runtime = adapter_runtime()?;
        let target = endpoint.clone();
        let connected = run_on(&runtime, async move {
            Client::connect([target.as_str()], options).await
        })
        .and_then(|result| result.map_err(map_error));
        let client = match connected {
            Ok(client) => client,
            Err(e) => {
                // The caller may be on an async worker, where dropping a runtime panics.
                runtime.shutdown_background();
                return Err(e);
            }
        };
        debug!(endpoint = %endpoint, "etcd client connected");

        Ok(Arc::new(EtcdKvBackend {
            client,
            runtime: Some(runtime),
        }))
    }
}

fn adapter_runtime() -> Result<Runtime, BackendError> {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("etcd-client")
        .enable_all()
        .build()
        .map_err(|e| BackendError::Unavailable(format!("runtime: {e}")))
}

/// Run `future` on `runtime` and block the calling thread until it finishes.
///
/// Unlike `Runtime::block_on` this never enters `runtime` on the calling
/// thread.
fn run_on<F>(runtime: &Runtime, future: F) -> Result<F::Output, BackendError>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    let (tx, rx) = mpsc::sync_channel(1);
    runtime.spawn(async move {
        let _ = tx.send(future.await);
    });
    rx.recv()
        .map_err(|_| BackendError::Unavailable("etcd runtime stopped".into()))
}

fn tls_options(tls: &StoreTls) -> Result<TlsOptions, BackendError> {
    let ca = read_pem(&tls.ca_file)?;
    let cert = read_pem(&tls.cert_file)?;
    let key = read_pem(&tls.key_file)?;
    Ok(TlsOptions::new()
        .ca_certificate(Certificate::from_pem(ca))
        .identity(Identity::from_pem(cert, key)))
}

fn read_pem(path: &Path) -> Result<String, BackendError> {
    fs::read_to_string(path)
        .map_err(|e| BackendError::Rejected(format!("cannot read {}: {e}", path.display())))
}

fn map_error(err: etcd_client::Error) -> BackendError {
    match err {
        etcd_client::Error::GRpcStatus(status) => {
            BackendError::Rejected(status.message().to_string())
        }
        other => BackendError::Unavailable(other.to_string()),
    }
}

/// Live etcd connection.
pub struct EtcdKvBackend {
    client: Client,
    runtime: Option<Runtime>,
}

impl EtcdKvBackend {
    fn runtime(&self) -> Result<&Runtime, BackendError> {
        self.runtime
            .as_ref()
            .ok_or_else(|| BackendError::Unavailable("etcd runtime shut down".into()))
    }
}

impl KvBackend for EtcdKvBackend {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BackendError> {
        let mut client = self.client.clone();
        let key = key.to_string();
        let response = run_on(self.runtime()?, async move { client.get(key, None).await })?
            .map_err(map_error)?;
        Ok(response.kvs().first().map(|kv| kv.value().to_vec()))
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), BackendError> {
        let mut client = self.client.clone();
        let key = key.to_string();
        let value = value.to_vec();
        run_on(self.runtime()?, async move { client.put(key, value, None).await })?
            .map_err(map_error)?;
        Ok(())
    }

    fn watch(
        &self,
        target: &WatchTarget,
        sink: ChangeSink,
    ) -> Result<Box<dyn WatchGuard>, BackendError> {
        let options = match target {
            WatchTarget::Key(_) => None,
            WatchTarget::Prefix(_) => Some(WatchOptions::new().with_prefix()),
        };
        let mut client = self.client.clone();
        let runtime = self.runtime()?;
        let path = target.path().to_string();
        let watch_path = path.clone();
        let (watcher, mut stream) =
            run_on(runtime, async move { client.watch(watch_path, options).await })?
                .map_err(map_error)?;

        let task = runtime.spawn(async move {
            // Holding the watcher keeps the server-side watch open.
            let _watcher = watcher;
            loop {
                match stream.message().await {
                    Ok(Some(response)) => {
                        for event in response.events() {
                            let Some(kv) = event.kv() else { continue };
                            let key = String::from_utf8_lossy(kv.key()).into_owned();
                            // Deletions arrive as an empty value.
                            let value = if matches!(event.event_type(), EventType::Put) {
                                kv.value().to_vec()
                            } else {
                                Vec::new()
                            };
                            if !sink.deliver(ChangeEvent::new(key, value)) {
                                return;
                            }
                        }
                    }
                    Ok(None) => {
                        error!(path = %path, "etcd watch stream closed, no further changes will be delivered");
                        return;
                    }
                    Err(e) => {
                        error!(path = %path, error = %e, "etcd watch stream failed, no further changes will be delivered");
                        return;
                    }
                }
            }
        });

        Ok(Box::new(EtcdWatchGuard { task: Some(task) }))
    }
}

impl Drop for EtcdKvBackend {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

struct EtcdWatchGuard {
    task: Option<JoinHandle<()>>,
}

impl WatchGuard for EtcdWatchGuard {
    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for EtcdWatchGuard {
    fn drop(&mut self) {
        self.cancel();
    }
}
