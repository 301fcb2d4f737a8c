//! Report generation
//!
//! Text reports reproduce the narrative followed by the results table. JSON
//! reports carry the same information in structured form.

use crate::config::OutputFormat;
use anyhow::{Context, Result};
use biathlon_engine::{RaceConfig, RunStats, Standing};
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct JsonReport<'a> {
    version: &'static str,
    stats: &'a RunStats,
    narrative: Vec<&'a str>,
    results: &'a [Standing<'a>],
}

/// Everything needed to render one run
pub struct Report<'a> {
    pub config: &'a RaceConfig,
    pub stats: &'a RunStats,
    /// Narrative text, one line per event
    pub narrative: &'a str,
    pub standings: &'a [Standing<'a>],
}

impl Report<'_> {
    /// Write the report in the requested format
    pub fn write<W: Write>(&self, out: &mut W, format: OutputFormat, with_narrative: bool) -> Result<()> {
        match format {
            OutputFormat::Txt => self.write_txt(out, with_narrative),
            OutputFormat::Json => self.write_json(out),
        }
    }

    fn write_txt<W: Write>(&self, out: &mut W, with_narrative: bool) -> Result<()> {
        if with_narrative {
            out.write_all(self.narrative.as_bytes())
                .context("Failed to write narrative")?;
            writeln!(out)?;
        }
        biathlon_engine::results::write_table(out, self.standings, self.config)
            .context("Failed to write results table")?;
        Ok(())
    }

    fn write_json<W: Write>(&self, out: &mut W) -> Result<()> {
        let report = JsonReport {
            version: biathlon_engine::VERSION,
            stats: self.stats,
            narrative: self.narrative.lines().collect(),
            results: self.standings,
        };
        serde_json::to_writer_pretty(&mut *out, &report).context("Failed to write JSON report")?;
        writeln!(out)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use biathlon_engine::{results, Interpreter};

    const CONFIG: &str = r#"{"laps": 1, "lapLength": 3000, "penaltyLength": 150, "firingLines": 1,
        "start": "10:00:00.000", "startDelta": "00:00:30"}"#;

    const LOG: &str = "\
[09:00:00.000] 1 1
[09:10:00.000] 2 1 10:00:00.000
[10:00:01.000] 4 1
[10:15:00.000] 10 1
";

    fn render(format: OutputFormat, with_narrative: bool) -> String {
        let config = RaceConfig::from_json(CONFIG).unwrap();
        let mut narrative = Vec::new();
        let mut interpreter = Interpreter::new(&config);
        let stats = interpreter.run(LOG.as_bytes(), &mut narrative).unwrap();
        let narrative = String::from_utf8(narrative).unwrap();
        let standings = results::standings(interpreter.store());

        let report = Report {
            config: &config,
            stats: &stats,
            narrative: &narrative,
            standings: &standings,
        };
        let mut out = Vec::new();
        report.write(&mut out, format, with_narrative).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_txt_report() {
        let text = render(OutputFormat::Txt, true);
        assert!(text.starts_with("[09:00:00.000] The competitor(1) registered\n"));
        assert!(text.ends_with(
            "[10:15:00.000] The competitor(1) has finished\n\n[00:15:00.000] 1 {00:15:00.000, 3.333} {,} 0/5\n"
        ));
    }

    #[test]
    fn test_txt_report_without_narrative() {
        let text = render(OutputFormat::Txt, false);
        assert_eq!(text, "[00:15:00.000] 1 {00:15:00.000, 3.333} {,} 0/5\n");
    }

    #[test]
    fn test_json_report() {
        let json: serde_json::Value = serde_json::from_str(&render(OutputFormat::Json, true)).unwrap();
        assert_eq!(json["stats"]["events"], 4);
        assert_eq!(json["narrative"].as_array().unwrap().len(), 5);
        assert_eq!(json["results"][0]["status"], "00:15:00.000");
        assert_eq!(json["results"][0]["record"]["id"], "1");
        assert_eq!(json["results"][0]["record"]["laps"][0]["elapsed"], "00:15:00.000");
    }
}
