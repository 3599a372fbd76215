//! Optional make-go configuration, read from the TOML file named by `MAKE_GO_CONFIG`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::args::DEFAULT_TEST_ARGS;

/// Environment variable holding the path of the config file.
pub const CONFIG_ENV: &str = "MAKE_GO_CONFIG";

/// make-go configuration (TOML).
///
/// Every field is optional in the file; missing fields keep the defaults,
/// which reproduce the stock Go workflow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MakeGoConfig {
    /// Toolchain binary used for every command.
    pub tool: String,

    /// File whose presence marks the project root.
    pub marker_file: String,

    /// Directories examined during the upward search, the start included.
    pub max_search_steps: usize,

    /// Arguments for `go test` when the invocation gives none.
    pub default_test_args: String,
}

impl Default for MakeGoConfig {
    fn default() -> Self {
        Self {
            tool: "go".to_string(),
            marker_file: "go.mod".to_string(),
            max_search_steps: 10,
            default_test_args: DEFAULT_TEST_ARGS.to_string(),
        }
    }
}

impl MakeGoConfig {
    pub fn validate(&self) -> Result<()> {
        if self.tool.trim().is_empty() {
            return Err(anyhow!("tool must be non-empty"));
        }
        if self.marker_file.trim().is_empty() {
            return Err(anyhow!("marker_file must be non-empty"));
        }
        if self.max_search_steps == 0 {
            return Err(anyhow!("max_search_steps must be > 0"));
        }
        if self.default_test_args.trim().is_empty() {
            return Err(anyhow!("default_test_args must be non-empty"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `MakeGoConfig::default()`.
pub fn load_config(path: &Path) -> Result<MakeGoConfig> {
    if !path.exists() {
        return Ok(MakeGoConfig::default());
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: MakeGoConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}

/// Load config from the path in `MAKE_GO_CONFIG`, or defaults when it is unset.
pub fn load_config_from_env() -> Result<MakeGoConfig> {
    match std::env::var_os(CONFIG_ENV) {
        Some(path) => load_config(Path::new(&path)),
        None => Ok(MakeGoConfig::default()),
    }
}
