//! CLI argument definitions for the Tasknest server.
//!
//! Priority resolution: CLI args > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

use tasknest_core::config::TasknestConfig;

/// Config file used when `--config` is not given.
const DEFAULT_CONFIG_FILE: &str = "tasknest.toml";

/// Tasknest - a small account and todo-list HTTP service.
#[derive(Parser, Debug, Default)]
#[command(name = "tasknest", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// API server port.
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,

    /// Directory holding users.json and todos.json.
    #[arg(short = 'd', long = "data-dir")]
    pub data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    pub fn resolve_config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// Overlay any flags given on the command line onto `config`.
    pub fn apply(&self, config: &mut TasknestConfig) {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(ref dir) = self.data_dir {
            config.storage.data_dir = dir.to_string_lossy().to_string();
        }
        if let Some(ref level) = self.log_level {
            config.logging.level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_path() {
        let args = CliArgs::default();
        assert_eq!(args.resolve_config_path(), PathBuf::from("tasknest.toml"));
    }

    #[test]
    fn test_parse_short_flags() {
        let args =
            CliArgs::try_parse_from(["tasknest", "-c", "x.toml", "-p", "8080", "-d", "/tmp/t"])
                .unwrap();
        assert_eq!(args.resolve_config_path(), PathBuf::from("x.toml"));
        assert_eq!(args.port, Some(8080));
        assert_eq!(args.data_dir, Some(PathBuf::from("/tmp/t")));
        assert_eq!(args.log_level, None);
    }

    #[test]
    fn test_flags_override_config() {
        let args =
            CliArgs::try_parse_from(["tasknest", "--port", "4000", "--log-level", "debug"]).unwrap();
        let mut config = TasknestConfig::default();
        args.apply(&mut config);
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.storage.data_dir, ".");
    }

    #[test]
    fn test_absent_flags_keep_config() {
        let mut config = TasknestConfig::default();
        config.server.port = 9999;
        CliArgs::default().apply(&mut config);
        assert_eq!(config.server.port, 9999);
    }

    #[test]
    fn test_rejects_invalid_port() {
        assert!(CliArgs::try_parse_from(["tasknest", "--port", "notaport"]).is_err());
    }
}
