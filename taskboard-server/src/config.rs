//! Server configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Path value that selects a private in-memory database.
pub const IN_MEMORY_DATABASE: &str = ":memory:";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    pub database_path: PathBuf,
    pub max_payload_size: usize,
    pub busy_timeout_ms: u64,
    pub seed_devices: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:3001".to_string(),
            database_path: PathBuf::from("tasks.db"),
            max_payload_size: 65_536,
            busy_timeout_ms: 5_000,
            seed_devices: true,
        }
    }
}

impl ServerConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml_dep::from_str(&content)?;
        Ok(config)
    }

    /// Keeps the configured host and replaces the port.
    pub fn set_port(&mut self, port: u16) {
        let host = self
            .listen_addr
            .rsplit_once(':')
            .map(|(host, _)| host)
            .unwrap_or("127.0.0.1");
        self.listen_addr = format!("{}:{}", host, port);
    }

    pub fn uses_in_memory_database(&self) -> bool {
        self.database_path.as_os_str() == IN_MEMORY_DATABASE
    }
}
