//! Race configuration
//!
//! Static race parameters, read once before the event log and shared by
//! reference with the interpreter and the results aggregator.

use crate::time::{parse_clock, parse_window};
use crate::types::{ClockTime, Duration, RaceError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Configuration for a single race
///
/// Deserialized from the JSON race description:
///
/// ```json
/// {
///     "laps": 2,
///     "lapLength": 3500,
///     "penaltyLength": 150,
///     "firingLines": 1,
///     "start": "10:00:00.000",
///     "startDelta": "00:00:30"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RaceConfigFile")]
pub struct RaceConfig {
    /// Number of main laps (always at least 1)
    pub laps: u32,
    /// Length of one main lap in meters
    pub lap_length: u32,
    /// Length of one penalty loop in meters
    pub penalty_length: u32,
    /// Number of firing lines per lap
    pub firing_lines: u32,
    /// Scheduled start of the race
    pub scheduled_start: ClockTime,
    /// Maximum allowed delay between drawn and actual start
    pub start_window: Duration,
}

/// On-disk shape of the race configuration
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RaceConfigFile {
    laps: u32,
    #[serde(alias = "lapLen")]
    lap_length: u32,
    #[serde(alias = "penaltyLen")]
    penalty_length: u32,
    firing_lines: u32,
    start: String,
    start_delta: String,
}

impl TryFrom<RaceConfigFile> for RaceConfig {
    type Error = RaceError;

    fn try_from(file: RaceConfigFile) -> Result<Self> {
        if file.laps == 0 {
            return Err(RaceError::Config("laps must be at least 1".to_string()));
        }

        let scheduled_start = parse_clock(&file.start)
            .map_err(|_| RaceError::Config(format!("invalid start time {:?}", file.start)))?;
        let start_window = parse_window(&file.start_delta)
            .map_err(|_| RaceError::Config(format!("invalid startDelta {:?}", file.start_delta)))?;

        Ok(Self {
            laps: file.laps,
            lap_length: file.lap_length,
            penalty_length: file.penalty_length,
            firing_lines: file.firing_lines,
            scheduled_start,
            start_window,
        })
    }
}

impl RaceConfig {
    /// Parse a race configuration from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| RaceError::Config(e.to_string()))
    }

    /// Load a race configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        log::info!("Loading race configuration: {:?}", path);

        let content = fs::read_to_string(path).map_err(|e| {
            RaceError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;
        let config = Self::from_json(&content)?;

        log::debug!(
            "Race: {} lap(s) of {}m, penalty loop {}m, {} firing line(s), start {}, window {}s",
            config.laps,
            config.lap_length,
            config.penalty_length,
            config.firing_lines,
            config.scheduled_start,
            config.start_window.num_seconds()
        );
        Ok(config)
    }

    /// Maximum number of targets a competitor can hit over `laps` laps
    ///
    /// Saturates at `u32::MAX` for absurdly large configurations.
    pub fn target_capacity(&self, laps: usize) -> u32 {
        u32::try_from(laps)
            .unwrap_or(u32::MAX)
            .saturating_mul(crate::types::TARGETS_PER_LINE)
            .saturating_mul(self.firing_lines)
    }
}
