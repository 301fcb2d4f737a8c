//! Results aggregation and rendering
//!
//! Turns the competitor records into the final standings table. Standings are
//! ordered by total race time, ascending, with competitors who have no finish
//! time keyed as a zero duration. Those competitors therefore appear *before*
//! every finisher, in registration order. This mirrors how results have
//! always been reported and is kept until product intent says otherwise.

use crate::competitor::{CompetitorRecord, CompetitorStore, LapRecord, PenaltyRecord};
use crate::config::RaceConfig;
use crate::time::{format_duration, format_speed};
use crate::types::Duration;
use serde::{Serialize, Serializer};
use std::fmt;
use std::io::{self, Write};

/// Placeholder for a lap or penalty entry with no data
const EMPTY_ENTRY: &str = "{,}";

/// Final status of a competitor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Disqualified at the start, or never started
    NotStarted,
    /// Started but did not complete every lap
    NotFinished,
    /// Completed every lap in the given total time
    Finished(Duration),
}

impl Status {
    /// Derive the reporting status of a record
    pub fn of(record: &CompetitorRecord) -> Self {
        if record.disqualified || !record.has_started() {
            Status::NotStarted
        } else if record.abandoned {
            Status::NotFinished
        } else {
            match record.finish_time {
                Some(total) => Status::Finished(total),
                None => Status::NotFinished,
            }
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::NotStarted => write!(f, "NotStarted"),
            Status::NotFinished => write!(f, "NotFinished"),
            Status::Finished(total) => write!(f, "{}", format_duration(*total)),
        }
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

/// One row of the results table
#[derive(Debug, Clone, Serialize)]
pub struct Standing<'a> {
    pub status: Status,
    pub record: &'a CompetitorRecord,
}

/// Order every competitor for reporting
///
/// The sort is stable, so re-running it over unchanged records always yields
/// the same order.
pub fn standings(store: &CompetitorStore) -> Vec<Standing<'_>> {
    let mut rows: Vec<Standing<'_>> = store
        .iter()
        .map(|record| Standing {
            status: Status::of(record),
            record,
        })
        .collect();

    rows.sort_by_key(|row| row.record.finish_time.unwrap_or_else(Duration::zero));
    rows
}

fn lap_entry(lap: &LapRecord) -> String {
    format!("{{{}, {}}}", format_duration(lap.elapsed), format_speed(lap.speed))
}

fn penalty_entry(penalty: &PenaltyRecord) -> String {
    match (penalty.elapsed, penalty.speed) {
        (Some(elapsed), Some(speed)) => {
            format!("{{{}, {}}}", format_duration(elapsed), format_speed(speed))
        }
        _ => EMPTY_ENTRY.to_string(),
    }
}

/// Render the lap column, padded with placeholders up to the lap count
pub fn render_laps(laps: &[LapRecord], config: &RaceConfig) -> String {
    let total = config.laps as usize;
    let mut entries: Vec<String> = laps.iter().take(total).map(lap_entry).collect();
    entries.resize(total, EMPTY_ENTRY.to_string());

    let joined = entries.join(", ");
    if total > 1 {
        format!("[{}]", joined)
    } else {
        joined
    }
}

/// Render the penalty column
pub fn render_penalties(penalties: &[PenaltyRecord]) -> String {
    if penalties.is_empty() {
        return EMPTY_ENTRY.to_string();
    }

    let joined = penalties.iter().map(penalty_entry).collect::<Vec<_>>().join(", ");
    if penalties.len() > 1 {
        format!("[{}]", joined)
    } else {
        joined
    }
}

/// Render a single results line
///
/// Competitors that never (validly) started are reported with empty columns.
pub fn render_standing(standing: &Standing<'_>, config: &RaceConfig) -> String {
    let record = standing.record;
    match standing.status {
        Status::NotStarted => format!(
            "[{}] {} {} {} 0/0",
            standing.status, record.id, EMPTY_ENTRY, EMPTY_ENTRY
        ),
        _ => format!(
            "[{}] {} {} {} {}/{}",
            standing.status,
            record.id,
            render_laps(&record.laps, config),
            render_penalties(&record.penalty_loops),
            record.targets_hit,
            record.target_capacity
        ),
    }
}

/// Write the whole results table, one line per competitor
pub fn write_table<W: Write>(
    out: &mut W,
    standings: &[Standing<'_>],
    config: &RaceConfig,
) -> io::Result<()> {
    for standing in standings {
        writeln!(out, "{}", render_standing(standing, config))?;
    }
    Ok(())
}
