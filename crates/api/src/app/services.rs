use std::sync::Arc;

use rolegate_admin::{PermissionQuery, RoleService, UserService};
use rolegate_infra::{
    DirectoryStore, InMemoryDirectoryStore, PostgresDirectoryStore, StoreConfig, StoreResult,
};

/// Store handle shared by every service.
pub type SharedStore = Arc<dyn DirectoryStore>;

#[derive(Clone)]
pub struct AppServices {
    pub permissions: PermissionQuery<SharedStore>,
    pub roles: RoleService<SharedStore>,
    pub users: UserService<SharedStore>,
}

impl AppServices {
    pub fn new(store: SharedStore) -> Self {
        Self {
            permissions: PermissionQuery::new(store.clone()),
            roles: RoleService::new(store.clone()),
            users: UserService::new(store),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryDirectoryStore::new()))
    }
}

pub async fn build_services(config: &StoreConfig) -> StoreResult<AppServices> {
    if config.use_persistent {
        if config.database_url.is_none() {
            tracing::warn!(
                "USE_PERSISTENT_STORES=true but DATABASE_URL not set, falling back to in-memory"
            );
            return Ok(AppServices::in_memory());
        }
        return build_persistent_services(config).await;
    }

    tracing::info!("using in-memory directory store");
    Ok(AppServices::in_memory())
}

async fn build_persistent_services(config: &StoreConfig) -> StoreResult<AppServices> {
    let store = PostgresDirectoryStore::connect(config).await?;
    tracing::info!("using postgres directory store");
    Ok(AppServices::new(Arc::new(store)))
}
