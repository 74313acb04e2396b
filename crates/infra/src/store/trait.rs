use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use rolegate_core::{
    NewRole, NewUser, PageWindow, Permission, PermissionId, RoleDetails, RoleFilter, RoleId,
    RoleSummary, User, UserFilter, UserId, UserSummary,
};

/// Persistence operation error.
///
/// These are **infrastructure errors** as opposed to domain errors. The two
/// constraint variants are what a lost read-then-write race looks like.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique key (role name, user name, role/permission pair) already exists.
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    /// A referenced row is missing, or a referenced row cannot be removed.
    #[error("foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    /// Connection, decoding, or any other backend failure.
    #[error("store backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// CRUD + filtered-query access to permissions, roles and users.
///
/// ## Consistency
///
/// Each read sees whatever snapshot the backend gives a single query. Each
/// write commits atomically: a role and its permission rows are inserted,
/// replaced or removed together.
///
/// ## Ordering
///
/// Listings are ordered by id, i.e. insertion order.
///
/// ## Validation
///
/// Implementations enforce schema constraints only (unique names, existing
/// foreign keys). Business rules live in the service layer.
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    /// Every permission, ordered by id.
    async fn list_permissions(&self) -> StoreResult<Vec<Permission>>;

    /// The subset of `ids` that exist (each at most once), ordered by id.
    async fn find_permissions(&self, ids: &[PermissionId]) -> StoreResult<Vec<Permission>>;

    /// A role with its permission ids (ascending).
    async fn find_role(&self, id: RoleId) -> StoreResult<Option<RoleDetails>>;

    async fn role_exists(&self, id: RoleId) -> StoreResult<bool>;

    /// Whether any role other than `exclude` has exactly this name.
    async fn role_name_taken(&self, name: &str, exclude: Option<RoleId>) -> StoreResult<bool>;

    async fn count_roles(&self, filter: &RoleFilter) -> StoreResult<u64>;

    /// Matching roles with their permission names; `window` applies skip/take.
    async fn list_roles(
        &self,
        filter: &RoleFilter,
        window: Option<PageWindow>,
    ) -> StoreResult<Vec<RoleSummary>>;

    /// Insert a role and attach exactly `role.permission_ids`.
    async fn insert_role(&self, role: &NewRole) -> StoreResult<RoleId>;

    /// Overwrite name/active and replace the whole permission set.
    ///
    /// Returns `false` when the role does not exist.
    async fn update_role(&self, id: RoleId, role: &NewRole) -> StoreResult<bool>;

    /// Remove a role and its permission rows. Fails with
    /// `ForeignKeyViolation` while users still reference it.
    ///
    /// Returns `false` when the role does not exist.
    async fn delete_role(&self, id: RoleId) -> StoreResult<bool>;

    /// Whether any user references the role.
    async fn role_in_use(&self, id: RoleId) -> StoreResult<bool>;

    async fn find_user(&self, id: UserId) -> StoreResult<Option<User>>;

    /// Whether any user other than `exclude` has exactly this name.
    async fn user_name_taken(&self, name: &str, exclude: Option<UserId>) -> StoreResult<bool>;

    async fn count_users(&self, filter: &UserFilter) -> StoreResult<u64>;

    /// Matching users with their role name inlined; `window` applies skip/take.
    async fn list_users(
        &self,
        filter: &UserFilter,
        window: Option<PageWindow>,
    ) -> StoreResult<Vec<UserSummary>>;

    async fn insert_user(&self, user: &NewUser) -> StoreResult<UserId>;

    /// Overwrite name/active/role. Returns `false` when the user does not exist.
    async fn update_user(&self, id: UserId, user: &NewUser) -> StoreResult<bool>;
}

#[async_trait]
impl<S> DirectoryStore for Arc<S>
where
    S: DirectoryStore + ?Sized,
{
    async fn list_permissions(&self) -> StoreResult<Vec<Permission>> {
        (**self).list_permissions().await
    }

    async fn find_permissions(&self, ids: &[PermissionId]) -> StoreResult<Vec<Permission>> {
        (**self).find_permissions(ids).await
    }

    async fn find_role(&self, id: RoleId) -> StoreResult<Option<RoleDetails>> {
        (**self).find_role(id).await
    }

    async fn role_exists(&self, id: RoleId) -> StoreResult<bool> {
        (**self).role_exists(id).await
    }

    async fn role_name_taken(&self, name: &str, exclude: Option<RoleId>) -> StoreResult<bool> {
        (**self).role_name_taken(name, exclude).await
    }

    async fn count_roles(&self, filter: &RoleFilter) -> StoreResult<u64> {
        (**self).count_roles(filter).await
    }

    async fn list_roles(
        &self,
        filter: &RoleFilter,
        window: Option<PageWindow>,
    ) -> StoreResult<Vec<RoleSummary>> {
        (**self).list_roles(filter, window).await
    }

    async fn insert_role(&self, role: &NewRole) -> StoreResult<RoleId> {
        (**self).insert_role(role).await
    }

    async fn update_role(&self, id: RoleId, role: &NewRole) -> StoreResult<bool> {
        (**self).update_role(id, role).await
    }

    async fn delete_role(&self, id: RoleId) -> StoreResult<bool> {
        (**self).delete_role(id).await
    }

    async fn role_in_use(&self, id: RoleId) -> StoreResult<bool> {
        (**self).role_in_use(id).await
    }

    async fn find_user(&self, id: UserId) -> StoreResult<Option<User>> {
        (**self).find_user(id).await
    }

    async fn user_name_taken(&self, name: &str, exclude: Option<UserId>) -> StoreResult<bool> {
        (**self).user_name_taken(name, exclude).await
    }

    async fn count_users(&self, filter: &UserFilter) -> StoreResult<u64> {
        (**self).count_users(filter).await
    }

    async fn list_users(
        &self,
        filter: &UserFilter,
        window: Option<PageWindow>,
    ) -> StoreResult<Vec<UserSummary>> {
        (**self).list_users(filter, window).await
    }

    async fn insert_user(&self, user: &NewUser) -> StoreResult<UserId> {
        (**self).insert_user(user).await
    }

    async fn update_user(&self, id: UserId, user: &NewUser) -> StoreResult<bool> {
        (**self).update_user(id, user).await
    }
}
