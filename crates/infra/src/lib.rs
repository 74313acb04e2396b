//! Infrastructure layer: persistence gateway and configuration.

pub mod config;
pub mod store;

pub use config::StoreConfig;
pub use store::{
    DirectoryStore, InMemoryDirectoryStore, PostgresDirectoryStore, StoreError, StoreResult,
};
