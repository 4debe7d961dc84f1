use crate::analysis::AnalysisParams;
use crate::error::{AnalysisError, AnalysisResult};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How results are reported on stdout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Both,
}

impl OutputFormat {
    pub fn includes_text(self) -> bool {
        matches!(self, Self::Text | Self::Both)
    }

    pub fn includes_json(self) -> bool {
        matches!(self, Self::Json | Self::Both)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Full report, frames included as base64.
    pub json_out: Option<PathBuf>,
    /// One image file per visualization stage.
    pub frames_dir: Option<PathBuf>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RuntimeConfig {
    pub input: PathBuf,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub params: AnalysisParams,
    #[serde(default = "default_insight_timeout_ms")]
    pub insight_timeout_ms: u64,
}

fn default_insight_timeout_ms() -> u64 {
    30_000
}

impl RuntimeConfig {
    pub fn insight_timeout(&self) -> Duration {
        Duration::from_millis(self.insight_timeout_ms)
    }
}

/// Read and validate a [`RuntimeConfig`]. Relative `input` paths resolve
/// against the config file's directory.
pub fn load_config(path: &Path) -> AnalysisResult<RuntimeConfig> {
    let contents = fs::read_to_string(path)
        .map_err(|e| AnalysisError::io(format!("Failed to read config {}: {e}", path.display())))?;
    let mut config: RuntimeConfig = serde_json::from_str(&contents).map_err(|e| {
        AnalysisError::config(format!("Failed to parse config {}: {e}", path.display()))
    })?;
    if config.input.is_relative() {
        if let Some(dir) = path.parent() {
            config.input = dir.join(&config.input);
        }
    }
    config.params.validate()?;
    Ok(config)
}
