//! Directory administration services.
//!
//! Validation and orchestration for roles, users and permissions. Every
//! operation validates synchronously before it mutates anything, then hands
//! the write to a [`rolegate_infra::DirectoryStore`]. No HTTP, no SQL.

pub mod error;
pub mod permissions;
pub mod roles;
pub mod users;

pub use error::{ServiceError, ServiceResult, UNEXPECTED_MESSAGE};
pub use permissions::PermissionQuery;
pub use roles::{RoleInput, RoleListQuery, RoleService};
pub use users::{UserInput, UserListQuery, UserPage, UserService};
