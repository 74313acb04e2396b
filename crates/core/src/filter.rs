//! Listing filters.
//!
//! Each present field contributes one predicate; a record matches when all of
//! them hold. Backends translate these into SQL or evaluate them directly.

use crate::entity::Entity;
use crate::id::{PermissionId, RoleId};
use crate::model::{Role, User};

/// Filter criteria for role listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleFilter {
    /// Case-sensitive substring of the role name.
    pub search: Option<String>,
    /// Role must hold this permission.
    pub permission_id: Option<PermissionId>,
    pub active: Option<bool>,
}

/// Filter criteria for user listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    /// Case-sensitive substring of the user name.
    pub search: Option<String>,
    pub role_id: Option<RoleId>,
    pub active: Option<bool>,
}

/// Blank search text means "no name predicate".
pub fn normalize_search(search: Option<String>) -> Option<String> {
    search.filter(|s| !s.trim().is_empty())
}

fn name_matches<E: Entity>(entity: &E, search: Option<&str>) -> bool {
    search.is_none_or(|needle| entity.name().contains(needle))
}

fn active_matches<E: Entity>(entity: &E, active: Option<bool>) -> bool {
    active.is_none_or(|a| entity.is_active() == a)
}

impl RoleFilter {
    pub fn new(search: Option<String>, permission_id: Option<PermissionId>, active: Option<bool>) -> Self {
        Self {
            search: normalize_search(search),
            permission_id,
            active,
        }
    }

    pub fn matches(&self, role: &Role, permission_ids: &[PermissionId]) -> bool {
        name_matches(role, self.search.as_deref())
            && self.permission_id.is_none_or(|p| permission_ids.contains(&p))
            && active_matches(role, self.active)
    }
}

impl UserFilter {
    pub fn new(search: Option<String>, role_id: Option<RoleId>, active: Option<bool>) -> Self {
        Self {
            search: normalize_search(search),
            role_id,
            active,
        }
    }

    pub fn matches(&self, user: &User) -> bool {
        name_matches(user, self.search.as_deref())
            && self.role_id.is_none_or(|r| user.role_id == r)
            && active_matches(user, self.active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(name: &str, active: bool) -> Role {
        Role {
            id: RoleId::new(1),
            name: name.to_string(),
            active,
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        let f = RoleFilter::default();
        assert!(f.matches(&role("Ops", false), &[]));
    }

    #[test]
    fn blank_search_is_dropped() {
        let f = RoleFilter::new(Some("  ".into()), None, None);
        assert_eq!(f.search, None);
    }

    #[test]
    fn search_is_case_sensitive_substring() {
        let f = RoleFilter::new(Some("writ".into()), None, None);
        assert!(f.matches(&role("Underwriting", true), &[]));
        assert!(!f.matches(&role("WRITER", true), &[]));
    }

    #[test]
    fn predicates_are_conjunctive() {
        let f = RoleFilter::new(Some("Ops".into()), Some(PermissionId::new(2)), Some(true));
        let perms = [PermissionId::new(1), PermissionId::new(2)];
        assert!(f.matches(&role("Ops", true), &perms));
        assert!(!f.matches(&role("Ops", false), &perms));
        assert!(!f.matches(&role("Ops", true), &perms[..1]));
        assert!(!f.matches(&role("Sales", true), &perms));
    }

    #[test]
    fn user_filter_checks_role_assignment() {
        let user = User {
            id: crate::UserId::new(1),
            name: "alice".into(),
            active: true,
            role_id: RoleId::new(4),
        };
        assert!(UserFilter::new(None, Some(RoleId::new(4)), None).matches(&user));
        assert!(!UserFilter::new(None, Some(RoleId::new(5)), None).matches(&user));
        assert!(!UserFilter::new(Some("bob".into()), None, None).matches(&user));
    }
}
