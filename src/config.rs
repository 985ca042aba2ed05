//! `appgraph.toml` loading

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use appgraph_gexf::GexfWriter;
use serde::{Deserialize, Serialize};

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "appgraph.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            output: OutputConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default = "default_true")]
    pub pretty: bool,
    #[serde(default = "default_true")]
    pub visualization: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            format: default_format(),
            pretty: default_true(),
            visualization: default_true(),
        }
    }
}

impl OutputConfig {
    /// The writer for the configured format. GEXF is the only format, so an
    /// unrecognised name falls back to it.
    pub fn writer(&self) -> GexfWriter {
        if !self.format.eq_ignore_ascii_case("gexf") {
            tracing::warn!(format = %self.format, "unknown output format, writing GEXF");
        }
        GexfWriter::new()
            .pretty(self.pretty)
            .visualization(self.visualization)
    }
}

fn default_true() -> bool {
    true
}

fn default_output_path() -> PathBuf {
    PathBuf::from("build/generated/appgraph")
}

fn default_format() -> String {
    "gexf".to_string()
}

/// Load `explicit`, or `appgraph.toml` in `cwd` when present, or defaults.
///
/// An explicitly named file must exist.
pub fn load(explicit: Option<&Path>, cwd: &Path) -> Result<Config> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let path = cwd.join(DEFAULT_CONFIG_FILE);
            if !path.exists() {
                return Ok(Config::default());
            }
            path
        }
    };

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config = toml::from_str::<Config>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded configuration");
    Ok(config)
}
