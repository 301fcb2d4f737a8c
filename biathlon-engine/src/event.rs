//! Event log line parsing
//!
//! Each line of the event log has the shape
//!
//! ```text
//! [HH:MM:SS.mmm] <kind> <competitorId> [extra...]
//! ```
//!
//! where `<kind>` is a numeric event code between 1 and 11. Lines are split on
//! whitespace; the brackets around the timestamp are stripped before the clock
//! reading is parsed.

use crate::time::parse_clock;
use crate::types::{ClockTime, RaceError, Result};
use std::fmt;

/// What happened to a competitor, with any kind-specific payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// Code 1: the competitor registered for the race
    Registered,
    /// Code 2: the start time was assigned by draw
    DrawAssigned { start: ClockTime },
    /// Code 3: the competitor is on the start line
    OnStartLine,
    /// Code 4: the competitor crossed the start line
    Started,
    /// Code 5: the competitor arrived at a firing range
    EnteredFiringRange { range: String },
    /// Code 6: a target was hit
    TargetHit { target: String },
    /// Code 7: the competitor left the firing range
    LeftFiringRange,
    /// Code 8: the competitor entered the penalty loops
    EnteredPenaltyLoop,
    /// Code 9: the competitor left the penalty loops
    LeftPenaltyLoop,
    /// Code 10: a main lap was completed
    LapCompleted,
    /// Code 11: the competitor cannot continue
    CannotContinue { reason: String },
}

impl EventKind {
    /// Numeric event code as it appears in the log
    pub fn code(&self) -> u8 {
        match self {
            EventKind::Registered => 1,
            EventKind::DrawAssigned { .. } => 2,
            EventKind::OnStartLine => 3,
            EventKind::Started => 4,
            EventKind::EnteredFiringRange { .. } => 5,
            EventKind::TargetHit { .. } => 6,
            EventKind::LeftFiringRange => 7,
            EventKind::EnteredPenaltyLoop => 8,
            EventKind::LeftPenaltyLoop => 9,
            EventKind::LapCompleted => 10,
            EventKind::CannotContinue { .. } => 11,
        }
    }

    /// Build the event kind for `code` from its extra fields
    ///
    /// Returns `Ok(None)` for codes outside the known range.
    fn from_code(code: i64, extra: &[&str], line: &str) -> Result<Option<Self>> {
        let first = || {
            extra
                .first()
                .map(|s| s.to_string())
                .ok_or_else(|| RaceError::parse(line, format!("event {} requires a parameter", code)))
        };

        let kind = match code {
            1 => EventKind::Registered,
            2 => {
                let raw = first()?;
                let start = parse_clock(&raw)
                    .map_err(|_| RaceError::parse(line, format!("invalid draw time {:?}", raw)))?;
                EventKind::DrawAssigned { start }
            }
            3 => EventKind::OnStartLine,
            4 => EventKind::Started,
            5 => EventKind::EnteredFiringRange { range: first()? },
            6 => EventKind::TargetHit { target: first()? },
            7 => EventKind::LeftFiringRange,
            8 => EventKind::EnteredPenaltyLoop,
            9 => EventKind::LeftPenaltyLoop,
            10 => EventKind::LapCompleted,
            11 => EventKind::CannotContinue {
                reason: extra.join(" "),
            },
            _ => return Ok(None),
        };
        Ok(Some(kind))
    }
}

/// A single timestamped event from the log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaceEvent {
    /// Time the event was recorded
    pub time: ClockTime,
    /// Competitor the event refers to
    pub competitor: String,
    /// Event kind and payload
    pub kind: EventKind,
}

impl RaceEvent {
    /// Parse one line of the event log
    ///
    /// Returns `Ok(None)` for blank lines and for unknown event codes, which
    /// are ignored. Malformed lines yield [`RaceError::Parse`].
    ///
    /// # Example
    /// ```
    /// use biathlon_engine::{EventKind, RaceEvent};
    ///
    /// let event = RaceEvent::parse_line("[09:05:59.867] 2 1 09:30:00.000").unwrap().unwrap();
    /// assert_eq!(event.competitor, "1");
    /// assert!(matches!(event.kind, EventKind::DrawAssigned { .. }));
    /// ```
    pub fn parse_line(line: &str) -> Result<Option<Self>> {
        let mut fields = line.split_whitespace();

        let Some(stamp) = fields.next() else {
            return Ok(None);
        };
        let stamp = stamp
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
            .ok_or_else(|| RaceError::parse(line, "timestamp must be enclosed in brackets"))?;
        let time = parse_clock(stamp)
            .map_err(|_| RaceError::parse(line, format!("invalid timestamp {:?}", stamp)))?;

        let code = fields
            .next()
            .ok_or_else(|| RaceError::parse(line, "missing event kind"))?;
        let code: i64 = match code.parse() {
            Ok(code) => code,
            // An integer too wide for i64 is still just an unknown kind
            Err(_) if is_integer(code) => {
                log::trace!("Ignoring unknown event kind {} in line {:?}", code, line);
                return Ok(None);
            }
            Err(_) => {
                return Err(RaceError::parse(line, format!("event kind {:?} is not a number", code)));
            }
        };

        let competitor = fields
            .next()
            .ok_or_else(|| RaceError::parse(line, "missing competitor id"))?
            .to_string();

        let extra: Vec<&str> = fields.collect();
        match EventKind::from_code(code, &extra, line)? {
            Some(kind) => Ok(Some(Self {
                time,
                competitor,
                kind,
            })),
            None => {
                log::trace!("Ignoring unknown event kind {} in line {:?}", code, line);
                Ok(None)
            }
        }
    }
}

fn is_integer(s: &str) -> bool {
    let digits = s.strip_prefix(['-', '+']).unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

impl fmt::Display for RaceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {}",
            crate::time::format_clock(self.time),
            self.kind.code(),
            self.competitor
        )
    }
}
