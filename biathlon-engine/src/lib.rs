//! Biathlon Race Engine
//!
//! Reconstructs the outcome of a biathlon race from its event log: main laps,
//! penalty loops, shooting results, disqualification and finish status.
//!
//! # Architecture
//!
//! The engine is a sequential pipeline with no I/O policy of its own:
//! - [`RaceConfig`] holds the static race parameters
//! - [`RaceEvent::parse_line`] turns one log line into a typed event
//! - [`Interpreter`] applies events to per-competitor records in log order
//!   and narrates each one
//! - [`results::standings`] orders the records for the final table
//!
//! Locating files, choosing output formats and logger setup live in the
//! application layer (biathlon-cli).
//!
//! # Example Usage
//!
//! ```
//! use biathlon_engine::{results, Interpreter, RaceConfig};
//!
//! let config = RaceConfig::from_json(r#"{
//!     "laps": 1, "lapLength": 3000, "penaltyLength": 150, "firingLines": 1,
//!     "start": "10:00:00.000", "startDelta": "00:00:30"
//! }"#).unwrap();
//!
//! let log = "\
//! [09:00:00.000] 1 1
//! [09:10:00.000] 2 1 10:00:00.000
//! [10:00:01.000] 4 1
//! [10:15:00.000] 10 1
//! ";
//!
//! let mut out = Vec::new();
//! let mut interpreter = Interpreter::new(&config);
//! interpreter.run(log.as_bytes(), &mut out).unwrap();
//!
//! let store = interpreter.into_store();
//! let table = results::standings(&store);
//! assert_eq!(
//!     results::render_standing(&table[0], &config),
//!     "[00:15:00.000] 1 {00:15:00.000, 3.333} {,} 0/5"
//! );
//! ```

// Public modules
pub mod competitor;
pub mod config;
pub mod event;
pub mod interpreter;
pub mod narrative;
pub mod results;
pub mod time;
pub mod types;

// Re-export main types for convenience
pub use competitor::{CompetitorRecord, CompetitorStore, LapRecord, PenaltyRecord};
pub use config::RaceConfig;
pub use event::{EventKind, RaceEvent};
pub use interpreter::{Interpreter, Outcome, RunStats};
pub use results::{Standing, Status};
pub use types::{ClockTime, Duration, RaceError, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
