use rolegate_core::Permission;
use rolegate_infra::DirectoryStore;

use crate::error::ServiceResult;

/// Read-only view over the seeded permission catalogue.
#[derive(Debug, Clone)]
pub struct PermissionQuery<S> {
    store: S,
}

impl<S: DirectoryStore> PermissionQuery<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Every permission, unfiltered and unpaginated, ordered by id.
    pub async fn list(&self) -> ServiceResult<Vec<Permission>> {
        Ok(self.store.list_permissions().await?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rolegate_infra::InMemoryDirectoryStore;

    use super::*;

    #[tokio::test]
    async fn lists_the_seeded_catalogue() {
        let query = PermissionQuery::new(Arc::new(InMemoryDirectoryStore::new()));
        let permissions = query.list().await.unwrap();

        let names: Vec<_> = permissions.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "Commission",
                "Endorsements",
                "Risk Management",
                "Administration",
                "Utilities",
                "Inactive"
            ]
        );
        assert!(!permissions[5].active);
    }
}
