//! Runtime configuration
//!
//! Read from environment variables (an optional `.env` file is honoured by
//! `main` before this is called). Every setting has a default so the service
//! starts with no configuration at all.

use std::path::PathBuf;
use std::str::FromStr;

use tracing::warn;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_SOURCE_PATH: &str = "corp.xml";
pub const DEFAULT_STATIC_DIR: &str = "static";
pub const DEFAULT_POOL_SIZE: u32 = 4;

/// Storage settings
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub max_connections: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_POOL_SIZE,
        }
    }
}

/// Top-level service configuration
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Listen address for the HTTP server
    pub bind_addr: String,
    /// Corp-code listing loaded at startup
    pub source_path: PathBuf,
    /// Directory holding the landing page
    pub static_dir: PathBuf,
    pub store: StoreConfig,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            source_path: PathBuf::from(DEFAULT_SOURCE_PATH),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            store: StoreConfig::default(),
        }
    }
}

impl RegistryConfig {
    /// Build the configuration from `CORP_REGISTRY_*` variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            bind_addr: lookup("CORP_REGISTRY_BIND_ADDR").unwrap_or(defaults.bind_addr),
            source_path: lookup("CORP_REGISTRY_SOURCE")
                .map(PathBuf::from)
                .unwrap_or(defaults.source_path),
            static_dir: lookup("CORP_REGISTRY_STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            store: StoreConfig {
                max_connections: parse_or_default(
                    "CORP_REGISTRY_POOL_SIZE",
                    lookup("CORP_REGISTRY_POOL_SIZE"),
                    defaults.store.max_connections,
                )
                .max(1),
            },
        }
    }
}

fn parse_or_default<T: FromStr + Copy + std::fmt::Display>(
    key: &str,
    raw: Option<String>,
    default: T,
) -> T {
    match raw {
        None => default,
        Some(value) => value.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %value, %default, "Invalid value, using default");
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = RegistryConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.source_path, PathBuf::from("corp.xml"));
        assert_eq!(config.static_dir, PathBuf::from("static"));
        assert_eq!(config.store.max_connections, DEFAULT_POOL_SIZE);
    }

    #[test]
    fn test_overrides() {
        let config = RegistryConfig::from_lookup(lookup_from(&[
            ("CORP_REGISTRY_BIND_ADDR", "127.0.0.1:9000"),
            ("CORP_REGISTRY_SOURCE", "/data/CORPCODE.xml"),
            ("CORP_REGISTRY_POOL_SIZE", "8"),
        ]));
        assert_eq!(config.bind_addr, "127.0.0.1:9000");
        assert_eq!(config.source_path, PathBuf::from("/data/CORPCODE.xml"));
        assert_eq!(config.store.max_connections, 8);
    }

    #[test]
    fn test_bad_pool_size_falls_back() {
        let config =
            RegistryConfig::from_lookup(lookup_from(&[("CORP_REGISTRY_POOL_SIZE", "lots")]));
        assert_eq!(config.store.max_connections, DEFAULT_POOL_SIZE);

        let config = RegistryConfig::from_lookup(lookup_from(&[("CORP_REGISTRY_POOL_SIZE", "0")]));
        assert_eq!(config.store.max_connections, 1);
    }
}
