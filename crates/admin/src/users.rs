//! User administration.

use rolegate_core::{
    EntityName, NewUser, Page, PageWindow, RoleId, UserFilter, UserId, UserSummary,
    DEFAULT_PAGE_SIZE,
};
use rolegate_infra::DirectoryStore;

use crate::error::{constraint_error, ServiceError, ServiceResult};

pub const USER_NOT_FOUND: &str = "User not found.";
pub const USER_NAME_TAKEN: &str = "User name must be unique.";
pub const ROLE_ID_MISSING: &str = "Role ID cannot be empty.";
pub const ROLE_ID_INVALID: &str = "Invalid Role ID.";

/// A user listing. `total_matches` is the unpaginated match count.
pub type UserPage = Page<UserSummary>;

/// User listing criteria. Without a page number every match is returned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserListQuery {
    pub search: Option<String>,
    pub role_id: Option<RoleId>,
    pub active: Option<bool>,
    pub page_number: Option<i32>,
}

/// Client-supplied user contents for add and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInput {
    pub name: String,
    pub active: bool,
    pub role_id: Option<RoleId>,
}

#[derive(Debug, Clone)]
pub struct UserService<S> {
    store: S,
    page_size: u32,
}

impl<S: DirectoryStore> UserService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Matching users with their role name, insertion ordered.
    ///
    /// A page past the last match is simply empty; only page numbers below 1
    /// are rejected.
    pub async fn list(&self, query: UserListQuery) -> ServiceResult<UserPage> {
        let window = query
            .page_number
            .map(|n| PageWindow::for_page(n, self.page_size))
            .transpose()?;
        let filter = UserFilter::new(query.search, query.role_id, query.active);

        let total_matches = self.store.count_users(&filter).await?;
        let items = self.store.list_users(&filter, window).await?;

        Ok(Page {
            page_number: query.page_number.unwrap_or(1),
            total_matches,
            items,
        })
    }

    pub async fn add(&self, input: UserInput) -> ServiceResult<UserId> {
        let user = self.validate(input, None).await?;
        let id = self
            .store
            .insert_user(&user)
            .await
            .map_err(|e| constraint_error(e, USER_NAME_TAKEN, ROLE_ID_INVALID))?;

        tracing::info!(user_id = %id, role_id = %user.role_id, "user added");
        Ok(id)
    }

    /// Overwrite name, active flag and role assignment.
    pub async fn update(&self, id: UserId, input: UserInput) -> ServiceResult<UserId> {
        if self.store.find_user(id).await?.is_none() {
            return Err(ServiceError::not_found(USER_NOT_FOUND));
        }
        let user = self.validate(input, Some(id)).await?;

        let updated = self
            .store
            .update_user(id, &user)
            .await
            .map_err(|e| constraint_error(e, USER_NAME_TAKEN, ROLE_ID_INVALID))?;
        if !updated {
            return Err(ServiceError::not_found(USER_NOT_FOUND));
        }

        tracing::info!(user_id = %id, role_id = %user.role_id, "user updated");
        Ok(id)
    }

    async fn validate(&self, input: UserInput, exclude: Option<UserId>) -> ServiceResult<NewUser> {
        let name = EntityName::parse("User", input.name)?;
        if self.store.user_name_taken(name.as_str(), exclude).await? {
            return Err(ServiceError::invalid_input(USER_NAME_TAKEN));
        }

        let role_id = input
            .role_id
            .ok_or_else(|| ServiceError::invalid_input(ROLE_ID_MISSING))?;
        if !self.store.role_exists(role_id).await? {
            return Err(ServiceError::invalid_input(ROLE_ID_INVALID));
        }

        Ok(NewUser {
            name,
            active: input.active,
            role_id,
        })
    }
}
