//! Wire shapes. All field names are camelCase.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use rolegate_admin::{RoleInput, RoleListQuery, UserInput, UserListQuery, UserPage};
use rolegate_core::{Page, Permission, PermissionId, RoleDetails, RoleId, RoleSummary};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleListParams {
    pub search: Option<String>,
    pub permission_id: Option<i32>,
    pub active: Option<bool>,
    pub page_number: Option<i32>,
}

impl From<RoleListParams> for RoleListQuery {
    fn from(p: RoleListParams) -> Self {
        Self {
            search: p.search,
            permission_id: p.permission_id.map(PermissionId::new),
            active: p.active,
            page_number: p.page_number,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GetRoleParams {
    pub id: i32,
}

/// Body of `POST /api/Roles`. A missing name is treated as empty.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddRoleRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub active: bool,
    pub permission_ids: Option<Vec<i32>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleRequest {
    pub id: i32,
    #[serde(flatten)]
    pub role: AddRoleRequest,
}

impl From<AddRoleRequest> for RoleInput {
    fn from(r: AddRoleRequest) -> Self {
        Self {
            name: r.name,
            active: r.active,
            permission_ids: r
                .permission_ids
                .map(|ids| ids.into_iter().map(PermissionId::new).collect()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListParams {
    pub search: Option<String>,
    pub role_id: Option<i32>,
    pub active: Option<bool>,
    pub page_number: Option<i32>,
}

impl From<UserListParams> for UserListQuery {
    fn from(p: UserListParams) -> Self {
        Self {
            search: p.search,
            role_id: p.role_id.map(RoleId::new),
            active: p.active,
            page_number: p.page_number,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddUserRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub active: bool,
    pub role_id: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub id: i32,
    #[serde(flatten)]
    pub user: AddUserRequest,
}

impl From<AddUserRequest> for UserInput {
    fn from(u: AddUserRequest) -> Self {
        Self {
            name: u.name,
            active: u.active,
            role_id: u.role_id.map(RoleId::new),
        }
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct PermissionView {
    pub name: String,
    pub active: bool,
}

#[derive(Debug, Serialize)]
pub struct PermissionListResponse {
    pub data: Vec<PermissionView>,
}

impl From<Vec<Permission>> for PermissionListResponse {
    fn from(permissions: Vec<Permission>) -> Self {
        Self {
            data: permissions
                .into_iter()
                .map(|p| PermissionView {
                    name: p.name,
                    active: p.active,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RoleView {
    pub name: String,
    pub active: bool,
    pub permissions: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleListResponse {
    pub page_number: i32,
    pub total_matches: u64,
    pub data: Vec<RoleView>,
}

impl From<Page<RoleSummary>> for RoleListResponse {
    fn from(page: Page<RoleSummary>) -> Self {
        let page = page.map(|r| RoleView {
            name: r.name,
            active: r.active,
            permissions: r.permissions,
        });
        Self {
            page_number: page.page_number,
            total_matches: page.total_matches,
            data: page.items,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleDetailsResponse {
    pub id: RoleId,
    pub name: String,
    pub active: bool,
    pub permission_ids: Vec<PermissionId>,
}

impl From<RoleDetails> for RoleDetailsResponse {
    fn from(d: RoleDetails) -> Self {
        Self {
            id: d.role.id,
            name: d.role.name,
            active: d.role.active,
            permission_ids: d.permission_ids,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserView {
    pub name: String,
    pub role: String,
    pub active: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListResponse {
    pub page_number: i32,
    pub matches_count: u64,
    pub data: Vec<UserView>,
}

impl From<UserPage> for UserListResponse {
    fn from(page: UserPage) -> Self {
        let page = page.map(|u| UserView {
            name: u.name,
            role: u.role,
            active: u.active,
        });
        Self {
            page_number: page.page_number,
            matches_count: page.total_matches,
            data: page.items,
        }
    }
}

/// `{"message": "Added" | "Updated" | "Deleted", "id": n}`
#[derive(Debug, Serialize)]
pub struct MutationResponse {
    pub message: &'static str,
    pub id: i32,
}

pub fn mutation(message: &'static str, id: impl Into<i32>) -> axum::response::Response {
    (
        StatusCode::OK,
        Json(MutationResponse {
            message,
            id: id.into(),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_role_body_is_camel_case_and_flat() {
        let body: UpdateRoleRequest = serde_json::from_str(
            r#"{"id": 3, "name": "Ops", "active": true, "permissionIds": [1, 2]}"#,
        )
        .unwrap();
        assert_eq!(body.id, 3);
        let input = RoleInput::from(body.role);
        assert_eq!(input.name, "Ops");
        assert_eq!(
            input.permission_ids,
            Some(vec![PermissionId::new(1), PermissionId::new(2)])
        );
    }

    #[test]
    fn missing_fields_fall_through_to_validation() {
        let body: AddUserRequest = serde_json::from_str("{}").unwrap();
        let input = UserInput::from(body);
        assert_eq!(input.name, "");
        assert!(!input.active);
        assert_eq!(input.role_id, None);
    }

    #[test]
    fn user_list_renames_total_to_matches_count() {
        let page = UserPage {
            page_number: 2,
            total_matches: 11,
            items: vec![],
        };
        let json = serde_json::to_value(UserListResponse::from(page)).unwrap();
        assert_eq!(json, serde_json::json!({"pageNumber": 2, "matchesCount": 11, "data": []}));
    }
}
