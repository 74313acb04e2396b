use std::sync::Arc;

use axum::{
    extract::Extension,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/api/Permission/list", get(list_permissions))
}

pub async fn list_permissions(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.permissions.list().await {
        Ok(permissions) => Json(dto::PermissionListResponse::from(permissions)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
