//! Directory records: permissions, roles and users.

use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::id::{PermissionId, RoleId, UserId};
use crate::value_object::EntityName;

/// A capability flag assignable to roles. Seeded once, read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub id: PermissionId,
    pub name: String,
    pub active: bool,
}

/// A named, activatable group of permissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    pub active: bool,
}

/// An account assigned to exactly one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub active: bool,
    pub role_id: RoleId,
}

/// A role together with the ids of its permissions (ascending).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDetails {
    pub role: Role,
    pub permission_ids: Vec<PermissionId>,
}

/// Listing row for roles: permission names are resolved eagerly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSummary {
    pub id: RoleId,
    pub name: String,
    pub active: bool,
    pub permissions: Vec<String>,
}

/// Listing row for users: the role is inlined by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
    pub role: String,
    pub active: bool,
}

/// Validated role contents, used for both insert and full replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRole {
    pub name: EntityName,
    pub active: bool,
    pub permission_ids: Vec<PermissionId>,
}

/// Validated user contents, used for both insert and full replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: EntityName,
    pub active: bool,
    pub role_id: RoleId,
}

impl Entity for Role {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

impl Entity for User {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
