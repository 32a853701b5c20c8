use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    CatalogService, IdentityService, SeaOrmCatalogService, SeaOrmIdentityService,
};

/// Everything a request handler or CLI command needs, built once at startup.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub identity_service: Arc<dyn IdentityService>,

    pub catalog_service: Arc<dyn CatalogService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::from_config(&config.database).await?;
        Ok(Self::with_store(config, store))
    }

    #[must_use]
    pub fn with_store(config: Config, store: Store) -> Self {
        let identity_service = Arc::new(SeaOrmIdentityService::new(
            store.clone(),
            config.security.clone(),
        )) as Arc<dyn IdentityService>;

        let catalog_service =
            Arc::new(SeaOrmCatalogService::new(store.clone())) as Arc<dyn CatalogService>;

        Self {
            config: Arc::new(config),
            store,
            identity_service,
            catalog_service,
        }
    }
}
