//! Human-readable restatement of interpreted events

use crate::interpreter::Outcome;
use crate::time::format_clock;
use crate::types::ClockTime;

/// Render the narrative line(s) for one interpreted event
///
/// Most outcomes produce a single line; completing the final lap produces a
/// second "has finished" line.
pub fn narrate(time: ClockTime, competitor: &str, outcome: &Outcome) -> Vec<String> {
    let stamp = format!("[{}]", format_clock(time));
    let id = competitor;

    let mut lines = vec![match outcome {
        Outcome::Registered => format!("{} The competitor({}) registered", stamp, id),
        Outcome::DrawAssigned { start } => format!(
            "{} The start time for the competitor({}) was set by a draw to {}",
            stamp,
            id,
            format_clock(*start)
        ),
        Outcome::OnStartLine => format!("{} The competitor({}) is on the start line", stamp, id),
        Outcome::Started => format!("{} The competitor({}) has started", stamp, id),
        Outcome::Disqualified => format!("{} The competitor({}) is disqualified", stamp, id),
        Outcome::OnFiringRange { range } => {
            format!("{} The competitor({}) is on the firing range({})", stamp, id, range)
        }
        Outcome::TargetHit { target } => {
            format!("{} The target({}) has been hit by competitor({})", stamp, target, id)
        }
        Outcome::LeftFiringRange => format!("{} The competitor({}) left the firing range", stamp, id),
        Outcome::EnteredPenaltyLoop => {
            format!("{} The competitor({}) entered the penalty laps", stamp, id)
        }
        Outcome::LeftPenaltyLoop => format!("{} The competitor({}) left the penalty laps", stamp, id),
        Outcome::LapEnded { .. } => format!("{} The competitor({}) ended the main lap", stamp, id),
        Outcome::CannotContinue { reason } => {
            format!("{} The competitor({}) can`t continue: {}", stamp, id, reason)
        }
    }];

    if let Outcome::LapEnded { finished: true } = outcome {
        lines.push(format!("{} The competitor({}) has finished", stamp, id));
    }
    lines
}
