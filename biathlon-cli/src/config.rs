//! Run settings loading and resolution
//!
//! Settings come from an optional TOML file and from the command line; a flag
//! given on the command line always wins over the file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Default race configuration file name
pub const DEFAULT_CONFIG: &str = "config.json";

/// Default event log file name
pub const DEFAULT_EVENTS: &str = "events";

/// Run settings (loaded from settings.toml)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunSettings {
    #[serde(default)]
    pub input: InputSettings,
    #[serde(default)]
    pub output: OutputSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InputSettings {
    /// Race configuration (JSON)
    pub config: Option<PathBuf>,
    /// Event log
    pub events: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputSettings {
    /// Report destination (stdout when absent)
    pub path: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    /// Include the per-event narrative in text reports
    pub narrative: Option<bool>,
    /// Abort on the first rejected event line
    pub strict: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Txt,
    Json,
}

/// Fully resolved parameters for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPlan {
    pub config: PathBuf,
    pub events: PathBuf,
    pub output: Option<PathBuf>,
    pub format: OutputFormat,
    pub narrative: bool,
    pub strict: bool,
}

/// Command-line overrides, all optional
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config: Option<PathBuf>,
    pub events: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub no_narrative: bool,
    pub strict: bool,
}

impl RunSettings {
    /// Merge command-line overrides over these settings
    pub fn resolve(self, overrides: Overrides) -> RunPlan {
        RunPlan {
            config: overrides
                .config
                .or(self.input.config)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG)),
            events: overrides
                .events
                .or(self.input.events)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_EVENTS)),
            output: overrides.output.or(self.output.path),
            format: overrides.format.or(self.output.format).unwrap_or_default(),
            narrative: !overrides.no_narrative && self.output.narrative.unwrap_or(true),
            strict: overrides.strict || self.output.strict.unwrap_or(false),
        }
    }
}

/// Load run settings from a TOML file
pub fn load_settings(path: &Path) -> Result<RunSettings> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file: {:?}", path))?;

    let settings: RunSettings = toml::from_str(&content)
        .with_context(|| format!("Failed to parse settings file: {:?}", path))?;

    Ok(settings)
}
