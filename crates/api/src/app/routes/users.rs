use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use rolegate_core::UserId;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/api/Users/list", get(list_users))
        .route("/api/Users", post(add_user).put(update_user))
}

pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<dto::UserListParams>,
) -> axum::response::Response {
    match services.users.list(params.into()).await {
        Ok(page) => Json(dto::UserListResponse::from(page)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn add_user(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::AddUserRequest>,
) -> axum::response::Response {
    match services.users.add(body.into()).await {
        Ok(id) => dto::mutation("Added", id),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn update_user(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::UpdateUserRequest>,
) -> axum::response::Response {
    match services.users.update(UserId::new(body.id), body.user.into()).await {
        Ok(id) => dto::mutation("Updated", id),
        Err(e) => errors::service_error_to_response(e),
    }
}
