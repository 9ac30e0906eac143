//! # Deployment Configuration
//!
//! A deployment is one receiver. The YAML file names it, plus an optional
//! network label that is carried through for the operator's benefit:
//!
//! ```yaml
//! receiver: pkh:5e5e…
//! network: preprod
//! ```
//!
//! The file is taken from `--config`, else from `$ESC_CONFIG`. A
//! `--receiver` flag overrides whatever the file says.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use esc_core::Address;

/// Environment variable naming the deployment file.
pub const CONFIG_ENV: &str = "ESC_CONFIG";

/// Deployment parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeploymentConfig {
    /// Receiver the escrow validator is instantiated for.
    pub receiver: Address,
    /// Free-form network label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
}

impl DeploymentConfig {
    /// Parse from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).context("invalid deployment config")
    }

    /// Load from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        Self::from_yaml_str(&text).with_context(|| format!("in {}", path.display()))
    }
}

/// The config file to use: the flag, else `$ESC_CONFIG`.
pub fn config_path(flag: Option<&Path>) -> Option<PathBuf> {
    flag.map(Path::to_path_buf)
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
}

/// Resolve the receiver from a flag or the deployment file.
pub fn resolve_receiver(flag: Option<Address>, config: Option<&Path>) -> Result<Address> {
    if let Some(receiver) = flag {
        return Ok(receiver);
    }
    match config_path(config) {
        Some(path) => {
            let cfg = DeploymentConfig::load(&path)?;
            tracing::debug!(
                config = %path.display(),
                receiver = %cfg.receiver,
                network = cfg.network.as_deref().unwrap_or("-"),
                "loaded deployment config"
            );
            Ok(cfg.receiver)
        }
        None => bail!("no receiver: pass --receiver, --config, or set {CONFIG_ENV}"),
    }
}
