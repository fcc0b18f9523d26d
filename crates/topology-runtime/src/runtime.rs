//! Runtime wiring: store client, immutable context and resolver.

use std::sync::Arc;

use bus_topology::{StoreKeyLookup, TopologyResolver, TopologySettings};
use config_store::{ConfigStoreApi, EnvSnapshot, ServiceContext, StoreClient, StoreError};
use tracing::info;

use crate::metered::MeteredStore;
use crate::report::TopologyReport;

/// One process's view of its bus topology.
pub struct TopologyRuntime {
    store: Arc<MeteredStore<StoreClient>>,
    context: ServiceContext,
    resolver: TopologyResolver<StoreKeyLookup>,
}

impl TopologyRuntime {
    /// Wire a connected store client. `env` is overlaid by the bootstrap entries.
    pub fn new(client: StoreClient, env: &EnvSnapshot) -> Self {
        let context = client.context(env);
        let store = Arc::new(MeteredStore::new(client));
        let settings = TopologySettings::from_context(&context);
        let keys = StoreKeyLookup::new(Arc::clone(&store) as Arc<dyn ConfigStoreApi>);

        info!(
            app = %settings.app_name,
            trust_mode = ?settings.trust_mode,
            descriptors = settings.descriptors.len(),
            "topology runtime wired"
        );

        Self {
            store,
            context,
            resolver: TopologyResolver::new(settings, keys),
        }
    }

    pub fn context(&self) -> &ServiceContext {
        &self.context
    }

    pub fn settings(&self) -> &TopologySettings {
        self.resolver.settings()
    }

    pub fn store(&self) -> &Arc<MeteredStore<StoreClient>> {
        &self.store
    }

    /// Resolve every declared topic.
    pub fn resolve_all(&self) -> TopologyReport {
        TopologyReport::build(&self.resolver, self.resolver.settings())
    }

    /// The application's configuration directory, `/<AppName>/`.
    pub fn app_prefix(&self) -> String {
        format!("/{}/", self.settings().app_name)
    }

    /// Watch the application's configuration directory.
    ///
    /// Values are not logged since the directory holds the private key.
    pub fn watch_app_config(
        &self,
        on_change: impl Fn(&str, &str) + Send + Sync + 'static,
    ) -> Result<(), StoreError> {
        let prefix = self.app_prefix();
        self.store.register_dir_watch(
            &prefix,
            Arc::new(move |key: &str, value: &str| {
                info!(key = %key, bytes = value.len(), "application configuration changed");
                on_change(key, value);
            }),
        )?;
        info!(prefix = %prefix, "watching application configuration");
        Ok(())
    }
}
