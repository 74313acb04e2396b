use std::collections::{BTreeMap, BTreeSet};
use std::sync::RwLock;

use async_trait::async_trait;

use rolegate_core::{
    NewRole, NewUser, PageWindow, Permission, PermissionId, Role, RoleDetails, RoleFilter,
    RoleId, RoleSummary, User, UserFilter, UserId, UserSummary,
};

use super::SEED_PERMISSIONS;
use super::r#trait::{DirectoryStore, StoreError, StoreResult};

#[derive(Debug, Default)]
struct Tables {
    permissions: BTreeMap<PermissionId, Permission>,
    roles: BTreeMap<RoleId, Role>,
    role_permissions: BTreeSet<(RoleId, PermissionId)>,
    users: BTreeMap<UserId, User>,
    last_role_id: i32,
    last_user_id: i32,
}

impl Tables {
    fn permission_ids_of(&self, role_id: RoleId) -> Vec<PermissionId> {
        self.role_permissions
            .range((role_id, PermissionId::new(i32::MIN))..=(role_id, PermissionId::new(i32::MAX)))
            .map(|(_, p)| *p)
            .collect()
    }

    fn role_name_taken(&self, name: &str, exclude: Option<RoleId>) -> bool {
        self.roles
            .values()
            .any(|r| r.name == name && Some(r.id) != exclude)
    }

    fn user_name_taken(&self, name: &str, exclude: Option<UserId>) -> bool {
        self.users
            .values()
            .any(|u| u.name == name && Some(u.id) != exclude)
    }

    fn matching_roles<'a>(&'a self, filter: &'a RoleFilter) -> impl Iterator<Item = &'a Role> + 'a {
        self.roles
            .values()
            .filter(move |r| filter.matches(r, &self.permission_ids_of(r.id)))
    }

    fn matching_users<'a>(&'a self, filter: &'a UserFilter) -> impl Iterator<Item = &'a User> + 'a {
        self.users.values().filter(move |u| filter.matches(u))
    }

    /// Same checks the SQL schema performs on the role/permission rows.
    fn check_role_row(&self, role: &NewRole, exclude: Option<RoleId>) -> StoreResult<()> {
        if self.role_name_taken(role.name.as_str(), exclude) {
            return Err(StoreError::UniqueViolation(format!(
                "roles.name '{}' already exists",
                role.name
            )));
        }
        let mut seen = BTreeSet::new();
        for pid in &role.permission_ids {
            if !seen.insert(*pid) {
                return Err(StoreError::UniqueViolation(format!(
                    "role_permissions pair for permission {pid} repeated"
                )));
            }
            if !self.permissions.contains_key(pid) {
                return Err(StoreError::ForeignKeyViolation(format!(
                    "permission {pid} does not exist"
                )));
            }
        }
        Ok(())
    }

    fn check_user_row(&self, user: &NewUser, exclude: Option<UserId>) -> StoreResult<()> {
        if self.user_name_taken(user.name.as_str(), exclude) {
            return Err(StoreError::UniqueViolation(format!(
                "users.name '{}' already exists",
                user.name
            )));
        }
        if !self.roles.contains_key(&user.role_id) {
            return Err(StoreError::ForeignKeyViolation(format!(
                "role {} does not exist",
                user.role_id
            )));
        }
        Ok(())
    }

    fn replace_permissions(&mut self, role_id: RoleId, ids: &[PermissionId]) {
        self.role_permissions.retain(|(r, _)| *r != role_id);
        self.role_permissions
            .extend(ids.iter().map(|pid| (role_id, *pid)));
    }

    fn summarize_role(&self, role: &Role) -> RoleSummary {
        RoleSummary {
            id: role.id,
            name: role.name.clone(),
            active: role.active,
            permissions: self
                .permission_ids_of(role.id)
                .iter()
                .filter_map(|pid| self.permissions.get(pid))
                .map(|p| p.name.clone())
                .collect(),
        }
    }

    fn summarize_user(&self, user: &User) -> UserSummary {
        UserSummary {
            id: user.id,
            name: user.name.clone(),
            role: self
                .roles
                .get(&user.role_id)
                .map(|r| r.name.clone())
                .unwrap_or_default(),
            active: user.active,
        }
    }
}

/// In-memory directory store.
///
/// Intended for tests/dev. Every write runs under a single write lock, so
/// constraint checks and mutation are atomic with respect to each other.
#[derive(Debug)]
pub struct InMemoryDirectoryStore {
    tables: RwLock<Tables>,
}

impl Default for InMemoryDirectoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDirectoryStore {
    /// A store holding the seeded permission catalogue and nothing else.
    pub fn new() -> Self {
        let permissions = SEED_PERMISSIONS
            .iter()
            .map(|(id, name, active)| Permission {
                id: PermissionId::new(*id),
                name: (*name).to_string(),
                active: *active,
            })
            .collect();
        Self::with_permissions(permissions)
    }

    pub fn with_permissions(permissions: Vec<Permission>) -> Self {
        let tables = Tables {
            permissions: permissions.into_iter().map(|p| (p.id, p)).collect(),
            ..Tables::default()
        };
        Self {
            tables: RwLock::new(tables),
        }
    }

    fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> StoreResult<T> {
        let tables = self
            .tables
            .read()
            .map_err(|_| StoreError::Backend("in-memory store lock poisoned".to_string()))?;
        Ok(f(&tables))
    }

    fn write<T>(&self, f: impl FnOnce(&mut Tables) -> StoreResult<T>) -> StoreResult<T> {
        let mut tables = self
            .tables
            .write()
            .map_err(|_| StoreError::Backend("in-memory store lock poisoned".to_string()))?;
        f(&mut tables)
    }
}

#[async_trait]
impl DirectoryStore for InMemoryDirectoryStore {
    async fn list_permissions(&self) -> StoreResult<Vec<Permission>> {
        self.read(|t| t.permissions.values().cloned().collect())
    }

    async fn find_permissions(&self, ids: &[PermissionId]) -> StoreResult<Vec<Permission>> {
        let wanted: BTreeSet<PermissionId> = ids.iter().copied().collect();
        self.read(|t| {
            wanted
                .iter()
                .filter_map(|id| t.permissions.get(id).cloned())
                .collect()
        })
    }

    async fn find_role(&self, id: RoleId) -> StoreResult<Option<RoleDetails>> {
        self.read(|t| {
            t.roles.get(&id).map(|role| RoleDetails {
                role: role.clone(),
                permission_ids: t.permission_ids_of(id),
            })
        })
    }

    async fn role_exists(&self, id: RoleId) -> StoreResult<bool> {
        self.read(|t| t.roles.contains_key(&id))
    }

    async fn role_name_taken(&self, name: &str, exclude: Option<RoleId>) -> StoreResult<bool> {
        self.read(|t| t.role_name_taken(name, exclude))
    }

    async fn count_roles(&self, filter: &RoleFilter) -> StoreResult<u64> {
        self.read(|t| t.matching_roles(filter).count() as u64)
    }

    async fn list_roles(
        &self,
        filter: &RoleFilter,
        window: Option<PageWindow>,
    ) -> StoreResult<Vec<RoleSummary>> {
        self.read(|t| {
            let rows = t.matching_roles(filter).map(|r| t.summarize_role(r));
            match window {
                Some(w) => w.slice(rows),
                None => rows.collect(),
            }
        })
    }

    async fn insert_role(&self, role: &NewRole) -> StoreResult<RoleId> {
        self.write(|t| {
            t.check_role_row(role, None)?;
            t.last_role_id += 1;
            let id = RoleId::new(t.last_role_id);
            t.roles.insert(
                id,
                Role {
                    id,
                    name: role.name.as_str().to_string(),
                    active: role.active,
                },
            );
            t.replace_permissions(id, &role.permission_ids);
            Ok(id)
        })
    }

    async fn update_role(&self, id: RoleId, role: &NewRole) -> StoreResult<bool> {
        self.write(|t| {
            if !t.roles.contains_key(&id) {
                return Ok(false);
            }
            t.check_role_row(role, Some(id))?;
            if let Some(existing) = t.roles.get_mut(&id) {
                existing.name = role.name.as_str().to_string();
                existing.active = role.active;
            }
            t.replace_permissions(id, &role.permission_ids);
            Ok(true)
        })
    }

    async fn delete_role(&self, id: RoleId) -> StoreResult<bool> {
        self.write(|t| {
            if !t.roles.contains_key(&id) {
                return Ok(false);
            }
            if t.users.values().any(|u| u.role_id == id) {
                return Err(StoreError::ForeignKeyViolation(format!(
                    "role {id} is still referenced by users"
                )));
            }
            t.replace_permissions(id, &[]);
            t.roles.remove(&id);
            Ok(true)
        })
    }

    async fn role_in_use(&self, id: RoleId) -> StoreResult<bool> {
        self.read(|t| t.users.values().any(|u| u.role_id == id))
    }

    async fn find_user(&self, id: UserId) -> StoreResult<Option<User>> {
        self.read(|t| t.users.get(&id).cloned())
    }

    async fn user_name_taken(&self, name: &str, exclude: Option<UserId>) -> StoreResult<bool> {
        self.read(|t| t.user_name_taken(name, exclude))
    }

    async fn count_users(&self, filter: &UserFilter) -> StoreResult<u64> {
        self.read(|t| t.matching_users(filter).count() as u64)
    }

    async fn list_users(
        &self,
        filter: &UserFilter,
        window: Option<PageWindow>,
    ) -> StoreResult<Vec<UserSummary>> {
        self.read(|t| {
            let rows = t.matching_users(filter).map(|u| t.summarize_user(u));
            match window {
                Some(w) => w.slice(rows),
                None => rows.collect(),
            }
        })
    }

    async fn insert_user(&self, user: &NewUser) -> StoreResult<UserId> {
        self.write(|t| {
            t.check_user_row(user, None)?;
            t.last_user_id += 1;
            let id = UserId::new(t.last_user_id);
            t.users.insert(
                id,
                User {
                    id,
                    name: user.name.as_str().to_string(),
                    active: user.active,
                    role_id: user.role_id,
                },
            );
            Ok(id)
        })
    }

    async fn update_user(&self, id: UserId, user: &NewUser) -> StoreResult<bool> {
        self.write(|t| {
            if !t.users.contains_key(&id) {
                return Ok(false);
            }
            t.check_user_row(user, Some(id))?;
            if let Some(existing) = t.users.get_mut(&id) {
                existing.name = user.name.as_str().to_string();
                existing.active = user.active;
                existing.role_id = user.role_id;
            }
            Ok(true)
        })
    }
}
