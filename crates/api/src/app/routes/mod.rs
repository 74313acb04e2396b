use axum::Router;

pub mod permissions;
pub mod roles;
pub mod system;
pub mod users;

/// Router for all `/api/*` endpoints.
pub fn router() -> Router {
    Router::new()
        .merge(permissions::router())
        .merge(roles::router())
        .merge(users::router())
}
