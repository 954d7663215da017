//! Configuration resolution for varnex-va
//!
//! Every key resolves ENV → TOML → compiled default. When a key is present
//! in both ENV and TOML the ENV value wins and the duplication is logged.

use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;
use varnex_common::config::TomlConfig;

pub const DEFAULT_PORT: u16 = 8888;
pub const DEFAULT_VEP_BASE_URL: &str = "https://grch37.rest.ensembl.org";
pub const DEFAULT_HOTSPOTS_BASE_URL: &str = "https://www.cancerhotspots.org";
pub const DEFAULT_MUTATION_ASSESSOR_BASE_URL: &str = "http://mutationassessor.org/r3";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub port: u16,
    pub vep_base_url: String,
    pub hotspots_base_url: String,
    pub mutation_assessor_base_url: String,
    /// When unset, the embedded override tables are used
    pub isoform_override_dir: Option<PathBuf>,
    pub http_timeout: Duration,
}

/// Resolve one key from ENV/TOML/default, warning when both sources are set
fn pick<T>(key: &str, env_value: Option<T>, toml_value: Option<T>, default: T) -> T {
    if env_value.is_some() && toml_value.is_some() {
        warn!(
            "{} set in both environment and TOML; using environment (highest priority)",
            key
        );
    }
    env_value.or(toml_value).unwrap_or(default)
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = env_string(name)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring unparseable {}={}", name, raw);
            None
        }
    }
}

/// Resolve the full service configuration from environment and TOML
pub fn resolve_service_config(toml: &TomlConfig) -> ServiceConfig {
    let override_dir_env = env_string("VARNEX_ISOFORM_OVERRIDE_DIR");
    if override_dir_env.is_some() && toml.isoform_override_dir.is_some() {
        warn!("isoform_override_dir set in both environment and TOML; using environment (highest priority)");
    }
    let isoform_override_dir = override_dir_env
        .or_else(|| toml.isoform_override_dir.clone())
        .map(PathBuf::from);

    ServiceConfig {
        port: pick(
            "port",
            env_parsed("VARNEX_PORT"),
            toml.port,
            DEFAULT_PORT,
        ),
        vep_base_url: pick(
            "vep_base_url",
            env_string("VARNEX_VEP_BASE_URL"),
            toml.vep_base_url.clone(),
            DEFAULT_VEP_BASE_URL.to_string(),
        ),
        hotspots_base_url: pick(
            "hotspots_base_url",
            env_string("VARNEX_HOTSPOTS_BASE_URL"),
            toml.hotspots_base_url.clone(),
            DEFAULT_HOTSPOTS_BASE_URL.to_string(),
        ),
        mutation_assessor_base_url: pick(
            "mutation_assessor_base_url",
            env_string("VARNEX_MUTATION_ASSESSOR_BASE_URL"),
            toml.mutation_assessor_base_url.clone(),
            DEFAULT_MUTATION_ASSESSOR_BASE_URL.to_string(),
        ),
        isoform_override_dir,
        http_timeout: Duration::from_secs(pick(
            "http_timeout_secs",
            env_parsed("VARNEX_HTTP_TIMEOUT_SECS"),
            toml.http_timeout_secs,
            DEFAULT_HTTP_TIMEOUT_SECS,
        )),
    }
}
