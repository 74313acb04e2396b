use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use rolegate_core::RoleId;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/api/Roles/list", get(list_roles))
        .route(
            "/api/Roles",
            get(get_role)
                .post(add_role)
                .put(update_role)
                .delete(delete_role),
        )
}

pub async fn list_roles(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<dto::RoleListParams>,
) -> axum::response::Response {
    match services.roles.list(params.into()).await {
        Ok(page) => Json(dto::RoleListResponse::from(page)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_role(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<dto::GetRoleParams>,
) -> axum::response::Response {
    match services.roles.get(RoleId::new(params.id)).await {
        Ok(details) => Json(dto::RoleDetailsResponse::from(details)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn add_role(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::AddRoleRequest>,
) -> axum::response::Response {
    match services.roles.add(body.into()).await {
        Ok(id) => dto::mutation("Added", id),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn update_role(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::UpdateRoleRequest>,
) -> axum::response::Response {
    match services.roles.update(RoleId::new(body.id), body.role.into()).await {
        Ok(id) => dto::mutation("Updated", id),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// The body is the bare role id, e.g. `7`.
pub async fn delete_role(
    Extension(services): Extension<Arc<AppServices>>,
    Json(role_id): Json<i32>,
) -> axum::response::Response {
    match services.roles.delete(RoleId::new(role_id)).await {
        Ok(id) => dto::mutation("Deleted", id),
        Err(e) => errors::service_error_to_response(e),
    }
}
