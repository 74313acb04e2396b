//! Store configuration loaded from the process environment.

use std::env;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Which backend to use and how to reach it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// `USE_PERSISTENT_STORES`: Postgres when true, in-memory otherwise.
    pub use_persistent: bool,
    /// `DATABASE_URL`: required when `use_persistent` is set.
    pub database_url: Option<String>,
    /// `DATABASE_MAX_CONNECTIONS`: pool size.
    pub max_connections: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            use_persistent: false,
            database_url: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl StoreConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (lets tests avoid mutating the
    /// process environment). Unparseable values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let use_persistent = lookup("USE_PERSISTENT_STORES")
            .and_then(|v| v.trim().parse::<bool>().ok())
            .unwrap_or(false);

        let database_url = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty());

        let max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);

        Self {
            use_persistent,
            database_url,
            max_connections,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_to_in_memory() {
        let cfg = StoreConfig::from_lookup(lookup(&[]));
        assert_eq!(cfg, StoreConfig::default());
    }

    #[test]
    fn reads_persistent_settings() {
        let cfg = StoreConfig::from_lookup(lookup(&[
            ("USE_PERSISTENT_STORES", "true"),
            ("DATABASE_URL", "postgres://localhost/rolegate"),
            ("DATABASE_MAX_CONNECTIONS", "12"),
        ]));
        assert!(cfg.use_persistent);
        assert_eq!(cfg.database_url.as_deref(), Some("postgres://localhost/rolegate"));
        assert_eq!(cfg.max_connections, 12);
    }

    #[test]
    fn bad_values_fall_back() {
        let cfg = StoreConfig::from_lookup(lookup(&[
            ("USE_PERSISTENT_STORES", "yes please"),
            ("DATABASE_URL", "  "),
            ("DATABASE_MAX_CONNECTIONS", "0"),
        ]));
        assert_eq!(cfg, StoreConfig::default());
    }
}
