//! Role administration.
//!
//! Check order matters for clients: name, name uniqueness, permission set,
//! then the write. The first failing check decides the message.

use rolegate_core::{
    EntityName, NewRole, Page, PageWindow, PermissionId, RoleDetails, RoleFilter, RoleId,
    RoleSummary, DEFAULT_PAGE_SIZE,
};
use rolegate_infra::DirectoryStore;

use crate::error::{constraint_error, ServiceError, ServiceResult};

pub const ROLE_NOT_FOUND: &str = "Role not found.";
pub const ROLE_NAME_TAKEN: &str = "Role name must be unique.";
pub const PERMISSION_IDS_EMPTY: &str = "Permission IDs cannot be empty.";
pub const PERMISSION_IDS_INVALID: &str = "One or more Permission IDs are invalid.";
pub const ROLE_IN_USE: &str = "Cannot delete role as it is assigned to one or more users.";

/// Role listing criteria. An absent page number means page 1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleListQuery {
    pub search: Option<String>,
    pub permission_id: Option<PermissionId>,
    pub active: Option<bool>,
    pub page_number: Option<i32>,
}

/// Client-supplied role contents for add and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleInput {
    pub name: String,
    pub active: bool,
    pub permission_ids: Option<Vec<PermissionId>>,
}

#[derive(Debug, Clone)]
pub struct RoleService<S> {
    store: S,
    page_size: u32,
}

impl<S: DirectoryStore> RoleService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// One page of matching roles, insertion ordered.
    ///
    /// Both a page number below 1 and a page starting past the last match
    /// (including page 1 of an empty result) are rejected.
    pub async fn list(&self, query: RoleListQuery) -> ServiceResult<Page<RoleSummary>> {
        let page_number = query.page_number.unwrap_or(1);
        let window = PageWindow::for_page(page_number, self.page_size)?;
        let filter = RoleFilter::new(query.search, query.permission_id, query.active);

        let total_matches = self.store.count_roles(&filter).await?;
        window.ensure_within(total_matches)?;

        let items = self.store.list_roles(&filter, Some(window)).await?;
        Ok(Page {
            page_number,
            total_matches,
            items,
        })
    }

    pub async fn get(&self, id: RoleId) -> ServiceResult<RoleDetails> {
        self.store
            .find_role(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(ROLE_NOT_FOUND))
    }

    pub async fn add(&self, input: RoleInput) -> ServiceResult<RoleId> {
        let role = self.validate(input, None).await?;
        let id = self
            .store
            .insert_role(&role)
            .await
            .map_err(|e| constraint_error(e, ROLE_NAME_TAKEN, PERMISSION_IDS_INVALID))?;

        tracing::info!(role_id = %id, name = role.name.as_str(), "role added");
        Ok(id)
    }

    /// Overwrite name and active flag and replace the whole permission set.
    pub async fn update(&self, id: RoleId, input: RoleInput) -> ServiceResult<RoleId> {
        if !self.store.role_exists(id).await? {
            return Err(ServiceError::not_found(ROLE_NOT_FOUND));
        }
        let role = self.validate(input, Some(id)).await?;

        let updated = self
            .store
            .update_role(id, &role)
            .await
            .map_err(|e| constraint_error(e, ROLE_NAME_TAKEN, PERMISSION_IDS_INVALID))?;
        if !updated {
            // Deleted between the existence check and the write.
            return Err(ServiceError::not_found(ROLE_NOT_FOUND));
        }

        tracing::info!(role_id = %id, name = role.name.as_str(), "role updated");
        Ok(id)
    }

    pub async fn delete(&self, id: RoleId) -> ServiceResult<RoleId> {
        if !self.store.role_exists(id).await? {
            return Err(ServiceError::not_found(ROLE_NOT_FOUND));
        }
        if self.store.role_in_use(id).await? {
            return Err(ServiceError::invalid_input(ROLE_IN_USE));
        }

        let deleted = self
            .store
            .delete_role(id)
            .await
            .map_err(|e| constraint_error(e, ROLE_IN_USE, ROLE_IN_USE))?;
        if !deleted {
            return Err(ServiceError::not_found(ROLE_NOT_FOUND));
        }

        tracing::info!(role_id = %id, "role deleted");
        Ok(id)
    }

    async fn validate(&self, input: RoleInput, exclude: Option<RoleId>) -> ServiceResult<NewRole> {
        let name = EntityName::parse("Role", input.name)?;
        if self.store.role_name_taken(name.as_str(), exclude).await? {
            return Err(ServiceError::invalid_input(ROLE_NAME_TAKEN));
        }

        let permission_ids = match input.permission_ids {
            Some(ids) if !ids.is_empty() => ids,
            _ => return Err(ServiceError::invalid_input(PERMISSION_IDS_EMPTY)),
        };

        // The store returns each existing id once, so duplicates in the
        // request show up as a count mismatch.
        let found = self.store.find_permissions(&permission_ids).await?;
        if found.len() != permission_ids.len() {
            return Err(ServiceError::invalid_input(PERMISSION_IDS_INVALID));
        }

        Ok(NewRole {
            name,
            active: input.active,
            permission_ids: found.into_iter().map(|p| p.id).collect(),
        })
    }
}
