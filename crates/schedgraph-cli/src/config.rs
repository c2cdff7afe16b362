//! `schedgraph.toml` loading.
//!
//! ```toml
//! [analysis]
//! scc_algorithm = "kosaraju"
//! dfs_fallback = true
//!
//! [output]
//! format = "json"
//! ```
//!
//! Every key is optional. Without `--config`, a missing `schedgraph.toml` in
//! the working directory means defaults; an explicit `--config` path must
//! exist.

use std::path::Path;

use anyhow::{Context, Result};
use schedgraph_core::{AnalysisOptions, SccAlgorithm};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::output::OutputMode;

/// File looked up in the working directory when `--config` is absent.
pub const CONFIG_FILE_NAME: &str = "schedgraph.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub scc_algorithm: SccAlgorithm,
    #[serde(default = "default_true")]
    pub dfs_fallback: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            scc_algorithm: SccAlgorithm::default(),
            dfs_fallback: default_true(),
        }
    }
}

impl AnalysisConfig {
    pub const fn options(&self) -> AnalysisOptions {
        AnalysisOptions {
            scc_algorithm: self.scc_algorithm,
            dfs_fallback: self.dfs_fallback,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: Option<OutputMode>,
}

/// Load the explicit config at `explicit`, or `schedgraph.toml` under `cwd`
/// if it exists.
pub fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<Config> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let implicit = cwd.join(CONFIG_FILE_NAME);
            if !implicit.exists() {
                return Ok(Config::default());
            }
            implicit
        }
    };

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config = toml::from_str::<Config>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    debug!(path = %path.display(), ?config, "config loaded");
    Ok(config)
}

const fn default_true() -> bool {
    true
}
