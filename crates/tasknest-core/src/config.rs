use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, TasknestError};

/// Top-level configuration for the Tasknest server.
///
/// Loaded from a TOML file. Every section is optional; missing sections and
/// missing keys fall back to the defaults below, which reproduce a bare
/// `users.json` / `todos.json` pair in the working directory served on
/// port 3333.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TasknestConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TasknestConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: TasknestConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file that may not exist.
    ///
    /// A missing file is `Ok(None)`; an unreadable or unparseable one is an
    /// error.
    pub fn load_optional(path: &Path) -> Result<Option<Self>> {
        match Self::load(path) {
            Ok(config) => Ok(Some(config)),
            Err(TasknestError::Io(e)) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Full path of the user dataset file.
    pub fn users_path(&self) -> PathBuf {
        Path::new(&self.storage.data_dir).join(&self.storage.users_file)
    }

    /// Full path of the todo dataset file.
    pub fn todos_path(&self) -> PathBuf {
        Path::new(&self.storage.data_dir).join(&self.storage.todos_file)
    }

    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// TCP port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3333,
        }
    }
}

/// Location of the JSON dataset files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding both dataset files.
    pub data_dir: String,
    /// File name of the user array.
    pub users_file: String,
    /// File name of the todo array.
    pub todos_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: ".".to_string(),
            users_file: "users.json".to_string(),
            todos_file: "todos.json".to_string(),
        }
    }
}

/// Argon2id cost parameters. Fixed for the lifetime of a deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Memory cost in KiB.
    pub hash_memory_kib: u32,
    /// Number of passes.
    pub hash_iterations: u32,
    /// Degree of parallelism.
    pub hash_parallelism: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            hash_memory_kib: 19_456,
            hash_iterations: 2,
            hash_parallelism: 1,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
