//! Core types for the biathlon race engine
//!
//! This module defines the fundamental types shared by every stage of the
//! engine: the clock/duration aliases, the error taxonomy and the result type.

use chrono::{NaiveTime, TimeDelta};

/// Wall-clock instant within a race day (no date component)
pub type ClockTime = NaiveTime;

/// Signed elapsed time between two clock instants
pub type Duration = TimeDelta;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, RaceError>;

/// Number of targets on a single firing line
pub const TARGETS_PER_LINE: u32 = 5;

/// Errors that can occur while configuring the race or interpreting the log
///
/// Configuration and I/O errors are fatal for a run. Every other variant is
/// scoped to a single event line: the interpreter reports it and moves on
/// (or aborts, in strict mode).
#[derive(Debug, thiserror::Error)]
pub enum RaceError {
    #[error("Invalid race configuration: {0}")]
    Config(String),

    #[error("Malformed event line {line:?}: {reason}")]
    Parse { line: String, reason: String },

    #[error("Invalid clock time: {0:?}")]
    InvalidClock(String),

    #[error("Unknown competitor: {0}")]
    UnknownCompetitor(String),

    #[error("Competitor({0}) is already registered")]
    AlreadyRegistered(String),

    #[error("Competitor({0}) has not started")]
    NotStarted(String),

    #[error("Competitor({0}) has already completed every lap")]
    LapLimitReached(String),

    #[error("Competitor({0}) has already finished")]
    AlreadyFinished(String),

    #[error("Competitor({0}) is already in a penalty loop")]
    PenaltyLoopAlreadyOpen(String),

    #[error("Competitor({0}) is not in a penalty loop")]
    NoOpenPenaltyLoop(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RaceError {
    /// Build a parse error for the given raw line
    pub fn parse(line: &str, reason: impl Into<String>) -> Self {
        RaceError::Parse {
            line: line.to_string(),
            reason: reason.into(),
        }
    }

    /// True if this error invalidates the whole run rather than a single line
    pub fn is_fatal(&self) -> bool {
        matches!(self, RaceError::Config(_) | RaceError::Io(_))
    }
}
