//! Configuration file loading
//!
//! Varnex services read an optional `varnex.toml` from the platform config
//! directory. Every key can also be supplied via environment variable; the
//! per-service resolution (ENV over TOML over compiled default) lives in the
//! service crates.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Service configuration as stored in varnex.toml. All keys optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// HTTP listen port
    pub port: Option<u16>,
    /// Base URL of the VEP REST service
    pub vep_base_url: Option<String>,
    /// Base URL of the cancer hotspots service
    pub hotspots_base_url: Option<String>,
    /// Base URL of the mutation assessor service
    pub mutation_assessor_base_url: Option<String>,
    /// Directory of isoform override tables (one `<source>.tsv` per source)
    pub isoform_override_dir: Option<String>,
    /// Timeout for outbound HTTP calls, in seconds
    pub http_timeout_secs: Option<u64>,
}

/// Locate the configuration file for the platform.
///
/// Priority: `~/.config/varnex/varnex.toml` (or the platform equivalent),
/// then `/etc/varnex/varnex.toml` on Linux. Returns the user path even when
/// neither exists so callers can report where the file was expected.
pub fn config_file_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("varnex").join("varnex.toml"));

    if let Some(path) = &user_config {
        if path.exists() {
            return user_config;
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/varnex/varnex.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    user_config
}

/// Parse TOML config content
pub fn parse_toml_config(content: &str) -> Result<TomlConfig> {
    toml::from_str(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
}

/// Load a TOML config file from an explicit path
pub fn load_toml_config_from(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read TOML failed ({}): {}", path.display(), e)))?;
    parse_toml_config(&content)
}

/// Load the platform config file, or defaults when no file exists
pub fn load_toml_config() -> Result<TomlConfig> {
    match config_file_path() {
        Some(path) if path.exists() => {
            let config = load_toml_config_from(&path)?;
            tracing::info!("Loaded config file: {}", path.display());
            Ok(config)
        }
        _ => Ok(TomlConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() {
        let config = parse_toml_config(
            r#"
            port = 9999
            vep_base_url = "http://localhost:3000"
            hotspots_base_url = "http://localhost:3001"
            mutation_assessor_base_url = "http://localhost:3002"
            isoform_override_dir = "/opt/varnex/overrides"
            http_timeout_secs = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.port, Some(9999));
        assert_eq!(config.vep_base_url.as_deref(), Some("http://localhost:3000"));
        assert_eq!(config.isoform_override_dir.as_deref(), Some("/opt/varnex/overrides"));
        assert_eq!(config.http_timeout_secs, Some(10));
    }

    #[test]
    fn parse_empty_config() {
        let config = parse_toml_config("").unwrap();
        assert!(config.port.is_none());
        assert!(config.vep_base_url.is_none());
    }

    #[test]
    fn parse_invalid_config_is_an_error() {
        let result = parse_toml_config("port = \"not a number");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("varnex.toml");
        std::fs::write(&path, "port = 8123\n").unwrap();

        let config = load_toml_config_from(&path).unwrap();
        assert_eq!(config.port, Some(8123));
    }
}
