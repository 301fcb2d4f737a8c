//! Competitor records and the store that owns them
//!
//! A [`CompetitorRecord`] is created on registration and only ever mutated
//! afterwards. The [`CompetitorStore`] keeps records in registration order so
//! that reporting is deterministic.

use crate::time::{serialize_duration, serialize_opt_duration};
use crate::types::{ClockTime, Duration, RaceError, Result};
use serde::Serialize;
use std::collections::HashMap;

/// A completed main lap
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LapRecord {
    /// Time taken for the lap
    #[serde(serialize_with = "serialize_duration")]
    pub elapsed: Duration,
    /// Clock time the lap ended
    pub ended_at: ClockTime,
    /// Average speed over the lap (m/s)
    pub speed: f64,
}

/// A visit to the penalty loops
///
/// Open while the competitor is still inside (`exited_at` is `None`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PenaltyRecord {
    pub entered_at: ClockTime,
    pub exited_at: Option<ClockTime>,
    #[serde(serialize_with = "serialize_opt_duration")]
    pub elapsed: Option<Duration>,
    pub speed: Option<f64>,
}

impl PenaltyRecord {
    /// Open a new penalty record
    pub fn open(entered_at: ClockTime) -> Self {
        Self {
            entered_at,
            exited_at: None,
            elapsed: None,
            speed: None,
        }
    }

    /// True until the competitor leaves the loops
    pub fn is_open(&self) -> bool {
        self.exited_at.is_none()
    }
}

/// Everything known about one competitor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompetitorRecord {
    pub id: String,
    /// Start time assigned by draw
    pub drawn_start: Option<ClockTime>,
    /// Time the competitor actually started
    pub actual_start: Option<ClockTime>,
    pub disqualified: bool,
    /// Set when the competitor cannot continue
    pub abandoned: bool,
    /// Reason given when abandoning
    pub abandon_reason: Option<String>,
    pub laps: Vec<LapRecord>,
    pub penalty_loops: Vec<PenaltyRecord>,
    /// Targets actually hit
    pub targets_hit: u32,
    /// Maximum number of hits possible so far
    pub target_capacity: u32,
    /// Misses still outstanding from the latest firing range
    pub pending_misses: u32,
    /// Total race time from the drawn start to the finish
    #[serde(serialize_with = "serialize_opt_duration")]
    pub finish_time: Option<Duration>,
}

impl CompetitorRecord {
    /// Create a freshly registered competitor
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            drawn_start: None,
            actual_start: None,
            disqualified: false,
            abandoned: false,
            abandon_reason: None,
            laps: Vec::new(),
            penalty_loops: Vec::new(),
            targets_hit: 0,
            target_capacity: 0,
            pending_misses: 0,
            finish_time: None,
        }
    }

    /// True if the competitor has crossed the start line
    pub fn has_started(&self) -> bool {
        self.actual_start.is_some()
    }

    /// True once the final lap has been completed in good standing
    pub fn has_finished(&self) -> bool {
        self.finish_time.is_some()
    }

    /// The penalty loop the competitor is currently in, if any
    pub fn open_penalty(&mut self) -> Option<&mut PenaltyRecord> {
        self.penalty_loops.last_mut().filter(|p| p.is_open())
    }

    /// Clock time the next lap is measured from
    ///
    /// The first lap runs from the drawn start time, later laps from the end
    /// of the previous lap.
    pub fn lap_base(&self) -> Option<ClockTime> {
        match self.laps.last() {
            Some(lap) => Some(lap.ended_at),
            None => self.drawn_start,
        }
    }
}

/// Owns every competitor record for a run
#[derive(Debug, Default)]
pub struct CompetitorStore {
    records: HashMap<String, CompetitorRecord>,
    /// Ids in registration order
    order: Vec<String>,
}

impl CompetitorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new competitor
    pub fn register(&mut self, id: &str) -> Result<&mut CompetitorRecord> {
        if self.records.contains_key(id) {
            return Err(RaceError::AlreadyRegistered(id.to_string()));
        }
        self.order.push(id.to_string());
        Ok(self
            .records
            .entry(id.to_string())
            .or_insert_with(|| CompetitorRecord::new(id)))
    }

    pub fn get(&self, id: &str) -> Result<&CompetitorRecord> {
        self.records
            .get(id)
            .ok_or_else(|| RaceError::UnknownCompetitor(id.to_string()))
    }

    pub fn get_mut(&mut self, id: &str) -> Result<&mut CompetitorRecord> {
        self.records
            .get_mut(id)
            .ok_or_else(|| RaceError::UnknownCompetitor(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterate over records in registration order
    pub fn iter(&self) -> impl Iterator<Item = &CompetitorRecord> + '_ {
        self.order.iter().filter_map(|id| self.records.get(id))
    }
}
