//! Event interpreter
//!
//! The interpreter is the per-competitor state machine. It consumes events
//! strictly in log order, updates exactly one [`CompetitorRecord`] per event
//! and reports what happened as an [`Outcome`]. Disqualification and finishing
//! are ordinary outcomes; errors are reserved for events that cannot be
//! applied (unknown competitor, impossible transition).
//!
//! # Example
//!
//! ```
//! use biathlon_engine::{Interpreter, RaceConfig};
//!
//! let config = RaceConfig::from_json(r#"{"laps": 1, "lapLength": 3000, "penaltyLength": 150,
//!     "firingLines": 1, "start": "10:00:00.000", "startDelta": "00:00:30"}"#).unwrap();
//!
//! let log = "[09:00:00.000] 1 7\n[09:01:00.000] 2 7 10:00:00.000\n";
//! let mut narrative = Vec::new();
//! let mut interpreter = Interpreter::new(&config);
//! let stats = interpreter.run(log.as_bytes(), &mut narrative).unwrap();
//!
//! assert_eq!(stats.events, 2);
//! assert!(interpreter.store().contains("7"));
//! ```

use crate::competitor::{CompetitorRecord, CompetitorStore, LapRecord, PenaltyRecord};
use crate::config::RaceConfig;
use crate::event::{EventKind, RaceEvent};
use crate::narrative::narrate;
use crate::time::{self, duration};
use crate::types::{ClockTime, Duration, RaceError, Result, TARGETS_PER_LINE};
use serde::Serialize;
use std::io::{BufRead, Write};

/// The state transition produced by one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Registered,
    DrawAssigned { start: ClockTime },
    OnStartLine,
    /// Started within the allowed window
    Started,
    /// Started outside the allowed window (or without a drawn start time)
    Disqualified,
    OnFiringRange { range: String },
    TargetHit { target: String },
    LeftFiringRange,
    EnteredPenaltyLoop,
    LeftPenaltyLoop,
    /// A main lap was completed; `finished` is set on the final lap
    LapEnded { finished: bool },
    CannotContinue { reason: String },
}

/// Counters describing a completed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// Lines read from the log
    pub lines: usize,
    /// Events applied to a competitor
    pub events: usize,
    /// Blank lines and unknown event kinds
    pub ignored: usize,
    /// Lines rejected because they were malformed or not applicable
    pub skipped: usize,
}

/// Per-competitor race state machine
pub struct Interpreter<'a> {
    config: &'a RaceConfig,
    store: CompetitorStore,
    /// Abort on the first rejected line instead of skipping it
    strict: bool,
}

impl<'a> Interpreter<'a> {
    /// Create an interpreter with an empty competitor store
    pub fn new(config: &'a RaceConfig) -> Self {
        Self {
            config,
            store: CompetitorStore::new(),
            strict: false,
        }
    }

    /// Builder method: abort on the first malformed or inapplicable line
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Records accumulated so far
    pub fn store(&self) -> &CompetitorStore {
        &self.store
    }

    /// Consume the interpreter and hand over its records
    pub fn into_store(self) -> CompetitorStore {
        self.store
    }

    /// Interpret a whole event log, writing one narrative line per event
    ///
    /// Per-line errors are logged and skipped unless the interpreter is
    /// strict. A line that is not valid UTF-8 is a per-line parse error. Only
    /// failures of the reader itself abort the run unconditionally.
    pub fn run<R: BufRead, W: Write>(&mut self, reader: R, out: &mut W) -> Result<RunStats> {
        let mut stats = RunStats::default();

        for (index, raw) in reader.split(b'\n').enumerate() {
            let mut raw = raw?;
            let line_no = index + 1;
            stats.lines += 1;

            if raw.last() == Some(&b'\r') {
                raw.pop();
            }
            let line = match std::str::from_utf8(&raw) {
                Ok(line) => line,
                Err(_) => {
                    let lossy = String::from_utf8_lossy(&raw);
                    self.reject(line_no, RaceError::parse(&lossy, "line is not valid UTF-8"))?;
                    stats.skipped += 1;
                    continue;
                }
            };

            let event = match RaceEvent::parse_line(line) {
                Ok(Some(event)) => event,
                Ok(None) => {
                    stats.ignored += 1;
                    continue;
                }
                Err(e) => {
                    self.reject(line_no, e)?;
                    stats.skipped += 1;
                    continue;
                }
            };

            match self.apply(&event) {
                Ok(outcome) => {
                    for text in narrate(event.time, &event.competitor, &outcome) {
                        writeln!(out, "{}", text)?;
                    }
                    stats.events += 1;
                }
                Err(e) => {
                    self.reject(line_no, e)?;
                    stats.skipped += 1;
                }
            }
        }

        log::info!(
            "Processed {} line(s): {} event(s), {} ignored, {} skipped",
            stats.lines,
            stats.events,
            stats.ignored,
            stats.skipped
        );
        Ok(stats)
    }

    fn reject(&self, line_no: usize, error: RaceError) -> Result<()> {
        if self.strict || error.is_fatal() {
            return Err(error);
        }
        log::warn!("Skipping line {}: {}", line_no, error);
        Ok(())
    }

    /// Apply one event to the competitor it refers to
    pub fn apply(&mut self, event: &RaceEvent) -> Result<Outcome> {
        log::debug!("Applying event {}", event);

        let id = event.competitor.as_str();
        let t = event.time;

        match &event.kind {
            EventKind::Registered => {
                self.store.register(id)?;
                Ok(Outcome::Registered)
            }
            EventKind::DrawAssigned { start } => {
                self.store.get_mut(id)?.drawn_start = Some(*start);
                Ok(Outcome::DrawAssigned { start: *start })
            }
            EventKind::OnStartLine => Ok(Outcome::OnStartLine),
            EventKind::Started => {
                let window = self.config.start_window;
                let record = self.store.get_mut(id)?;
                record.actual_start = Some(t);

                let in_window = record
                    .drawn_start
                    .map(|drawn| t >= drawn && duration(drawn, t) <= window)
                    .unwrap_or(false);
                if !in_window {
                    log::debug!("Competitor({}) started outside the window", id);
                    record.disqualified = true;
                }

                if record.disqualified {
                    Ok(Outcome::Disqualified)
                } else {
                    Ok(Outcome::Started)
                }
            }
            EventKind::EnteredFiringRange { range } => {
                let record = self.store.get_mut(id)?;
                record.target_capacity += TARGETS_PER_LINE;
                record.pending_misses = TARGETS_PER_LINE;
                Ok(Outcome::OnFiringRange {
                    range: range.clone(),
                })
            }
            EventKind::TargetHit { target } => {
                let record = self.store.get_mut(id)?;
                record.targets_hit += 1;
                record.pending_misses = record.pending_misses.saturating_sub(1);
                Ok(Outcome::TargetHit {
                    target: target.clone(),
                })
            }
            EventKind::LeftFiringRange => Ok(Outcome::LeftFiringRange),
            EventKind::EnteredPenaltyLoop => {
                let record = self.store.get_mut(id)?;
                if record.open_penalty().is_some() {
                    return Err(RaceError::PenaltyLoopAlreadyOpen(id.to_string()));
                }
                record.penalty_loops.push(PenaltyRecord::open(t));
                Ok(Outcome::EnteredPenaltyLoop)
            }
            EventKind::LeftPenaltyLoop => {
                let penalty_length = self.config.penalty_length;
                let record = self.store.get_mut(id)?;
                let misses = record.pending_misses;
                let penalty = record
                    .open_penalty()
                    .ok_or_else(|| RaceError::NoOpenPenaltyLoop(id.to_string()))?;

                let elapsed = duration(penalty.entered_at, t);
                let distance = f64::from(penalty_length) * f64::from(misses);
                penalty.exited_at = Some(t);
                penalty.elapsed = Some(elapsed);
                penalty.speed = Some(speed_or_zero(id, distance, elapsed));
                Ok(Outcome::LeftPenaltyLoop)
            }
            EventKind::LapCompleted => self.complete_lap(id, t),
            EventKind::CannotContinue { reason } => {
                let record = self.store.get_mut(id)?;
                if record.has_finished() {
                    return Err(RaceError::AlreadyFinished(id.to_string()));
                }
                record.abandoned = true;
                record.abandon_reason = Some(reason.clone());
                Ok(Outcome::CannotContinue {
                    reason: reason.clone(),
                })
            }
        }
    }

    fn complete_lap(&mut self, id: &str, t: ClockTime) -> Result<Outcome> {
        let config = self.config;
        let record: &mut CompetitorRecord = self.store.get_mut(id)?;

        if !record.has_started() {
            return Err(RaceError::NotStarted(id.to_string()));
        }
        if record.laps.len() >= config.laps as usize {
            return Err(RaceError::LapLimitReached(id.to_string()));
        }

        let base = record
            .lap_base()
            .or(record.actual_start)
            .ok_or_else(|| RaceError::NotStarted(id.to_string()))?;
        let elapsed = duration(base, t);
        record.laps.push(LapRecord {
            elapsed,
            ended_at: t,
            speed: speed_or_zero(id, f64::from(config.lap_length), elapsed),
        });
        record.target_capacity = config.target_capacity(record.laps.len());

        let last_lap = record.laps.len() == config.laps as usize;
        let drawn_start = record.drawn_start;
        let finished = match drawn_start {
            Some(drawn) if last_lap && !record.disqualified && !record.abandoned => {
                let total = duration(drawn, t);
                log::debug!("Competitor({}) finished in {}", id, time::format_duration(total));
                record.finish_time = Some(total);
                true
            }
            _ => false,
        };
        Ok(Outcome::LapEnded { finished })
    }
}

fn speed_or_zero(id: &str, distance: f64, elapsed: Duration) -> f64 {
    time::speed(distance, elapsed).unwrap_or_else(|| {
        log::warn!(
            "Competitor({}): non-positive elapsed time {}, speed recorded as 0",
            id,
            time::format_duration(elapsed)
        );
        0.0
    })
}
