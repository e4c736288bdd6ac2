use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use content_ops_core::{CatalogProfile, OpsConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "content-ops-mcp")]
#[command(about = "Expose content-operations platform API calls as MCP tools over stdio", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to an optional YAML config file
    #[arg(long, env = "CONTENT_OPS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Root of the remote REST API
    #[arg(long, env = "CONTENT_OPS_BASE_URL")]
    pub base_url: Option<String>,

    /// Catalog profile: `governed` (per-operation auth) or `public`
    #[arg(long, env = "CONTENT_OPS_PROFILE")]
    pub profile: Option<CatalogProfile>,

    /// Per-request timeout in seconds (0 disables)
    #[arg(long, env = "CONTENT_OPS_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Maximum accepted response body size in bytes
    #[arg(long, env = "CONTENT_OPS_MAX_RESPONSE_BYTES")]
    pub max_response_bytes: Option<usize>,

    /// Log filter (e.g. `info`, `content_ops_core=debug`)
    #[arg(long, env = "CONTENT_OPS_LOG", default_value = "info")]
    pub log_level: String,

    #[arg(long, env = "CONTENT_OPS_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// On-disk config. Every field is optional; flags and env vars win over it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub profile: Option<CatalogProfile>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub max_response_bytes: Option<usize>,
}

pub fn load_file_config(path: &Path) -> anyhow::Result<FileConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    if raw.trim().is_empty() {
        return Ok(FileConfig::default());
    }
    let cfg: FileConfig =
        serde_yaml::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}

impl Cli {
    /// Merge defaults, the config file (if any), and flags/env into the library config.
    pub fn resolve(&self) -> anyhow::Result<OpsConfig> {
        let file = match &self.config {
            Some(path) => load_file_config(path)?,
            None => FileConfig::default(),
        };

        let mut cfg = OpsConfig::default();
        if let Some(v) = self.base_url.clone().or(file.base_url) {
            cfg.base_url = v;
        }
        if let Some(v) = self.profile.or(file.profile) {
            cfg.profile = v;
        }
        if let Some(v) = self.timeout_secs.or(file.timeout_secs) {
            cfg.timeout_secs = v;
        }
        cfg.max_response_bytes = self.max_response_bytes.or(file.max_response_bytes);

        cfg.parsed_base_url()?;
        Ok(cfg)
    }
}
