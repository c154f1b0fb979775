//! Configuration schema for gobi
//!
//! Configuration is stored at `~/.config/gobi/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Go toolchain settings
    pub go: GoConfig,

    /// Default build identity
    pub build: BuildConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,

    /// Where build-info partials are kept (defaults to the user state dir)
    pub state_dir: Option<PathBuf>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
            state_dir: None,
        }
    }
}

/// Go toolchain configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GoConfig {
    /// Go binary to execute
    pub binary: String,

    /// Module download cache, instead of asking `go env GOMODCACHE`
    pub cache_root: Option<PathBuf>,
}

impl Default for GoConfig {
    fn default() -> Self {
        Self {
            binary: "go".to_string(),
            cache_root: None,
        }
    }
}

/// Build identity defaults; command-line flags take precedence
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub name: Option<String>,
    pub number: Option<String>,
    pub project: Option<String>,
}
