//! `rolegate-core` — entity model for the role/permission directory.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod entity;
pub mod error;
pub mod filter;
pub mod id;
pub mod model;
pub mod paging;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use filter::{RoleFilter, UserFilter};
pub use id::{PermissionId, RoleId, UserId};
pub use model::{
    NewRole, NewUser, Permission, Role, RoleDetails, RoleSummary, User, UserSummary,
};
pub use paging::{Page, PageWindow, DEFAULT_PAGE_SIZE, INVALID_PAGE_NUMBER, PAGE_OUT_OF_RANGE};
pub use value_object::{EntityName, ValueObject, MAX_NAME_LEN};
