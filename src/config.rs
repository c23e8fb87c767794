//! Server settings read from the environment (and `.env`), overridable on the
//! command line.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_ADDR: &str = "127.0.0.1:3001";
pub const DEFAULT_DATA_FILE: &str = "tasks.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum StoreKind {
    /// One JSON file holding the whole collection
    #[default]
    File,
    /// Process memory, lost on exit
    Memory,
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "file" => Ok(StoreKind::File),
            "memory" => Ok(StoreKind::Memory),
            other => Err(format!("unknown store '{other}' (expected file or memory)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub data_file: PathBuf,
    pub store: StoreKind,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 3001)),
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            store: StoreKind::File,
        }
    }
}

impl ServerConfig {
    /// Reads `TASKS_ADDR`, `TASKS_DATA_FILE` and `TASKS_STORE`, loading `.env`
    /// first. Unset variables keep their defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();
        if let Some(addr) = lookup("TASKS_ADDR") {
            config.addr = addr
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid TASKS_ADDR '{addr}': {e}"))?;
        }
        if let Some(path) = lookup("TASKS_DATA_FILE") {
            config.data_file = PathBuf::from(path);
        }
        if let Some(store) = lookup("TASKS_STORE") {
            config.store = store.parse().map_err(anyhow::Error::msg)?;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_unset() {
        let config = ServerConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.addr.to_string(), DEFAULT_ADDR);
    }

    #[test]
    fn test_reads_overrides() {
        let vars: HashMap<&str, &str> = [
            ("TASKS_ADDR", "0.0.0.0:8080"),
            ("TASKS_DATA_FILE", "/var/lib/planning/tasks.json"),
            ("TASKS_STORE", "Memory"),
        ]
        .into_iter()
        .collect();

        let config = ServerConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.data_file, PathBuf::from("/var/lib/planning/tasks.json"));
        assert_eq!(config.store, StoreKind::Memory);
    }

    #[test]
    fn test_rejects_bad_addr() {
        assert!(ServerConfig::from_lookup(|k| (k == "TASKS_ADDR").then(|| "nope".to_string())).is_err());
    }
}
