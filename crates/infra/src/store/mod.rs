//! Persistence gateway for the role/permission directory.
//!
//! `DirectoryStore` is the only way service logic touches storage. Two
//! backends implement it: an in-memory one for tests/dev and a Postgres one
//! for deployments. Both enforce the same uniqueness and referential
//! constraints so that lost validation races surface as errors.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryDirectoryStore;
pub use postgres::PostgresDirectoryStore;
pub use r#trait::{DirectoryStore, StoreError, StoreResult};

/// Permission catalogue seeded at schema creation (mirrors `0002_seed_permissions.sql`).
pub const SEED_PERMISSIONS: [(i32, &str, bool); 6] = [
    (1, "Commission", true),
    (2, "Endorsements", true),
    (3, "Risk Management", true),
    (4, "Administration", true),
    (5, "Utilities", true),
    (6, "Inactive", false),
];
