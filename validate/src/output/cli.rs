//! Colored CLI output for replay events
//!
//! Formats phase transitions, issued intents, warnings and checkpoint
//! results with colored output for easy visual parsing.

use chrono::NaiveDateTime;
use std::io::{self, Write};

use warden_core::engine::{IntentSource, MovementIntent, TickReport, TickWarning};
use warden_core::phase::PhaseTransition;
use warden_core::world::FeedError;

use crate::verification::{CheckpointResult, VerificationResult};

/// Output verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum OutputLevel {
    /// Only show summary at end
    Quiet,
    /// Show transitions, issued intents and checkpoints (default)
    #[default]
    Normal,
    /// Also show every tick's verdict
    Verbose,
}

/// CLI output formatter with color support
#[derive(Debug)]
pub struct CliOutput {
    level: OutputLevel,
    start: Option<NaiveDateTime>,
    use_colors: bool,
    ticks: u32,
    intents_issued: u32,
    phase_changes: u32,
    warnings: u32,
    feed_errors: u32,
}

impl Default for CliOutput {
    fn default() -> Self {
        Self::new(OutputLevel::Normal)
    }
}

impl CliOutput {
    pub fn new(level: OutputLevel) -> Self {
        Self {
            level,
            start: None,
            use_colors: atty::is(atty::Stream::Stdout),
            ticks: 0,
            intents_issued: 0,
            phase_changes: 0,
            warnings: 0,
            feed_errors: 0,
        }
    }

    /// Set scenario start for relative timestamps
    pub fn set_start(&mut self, time: NaiveDateTime) {
        self.start = Some(time);
    }

    /// Format timestamp relative to scenario start
    pub fn format_time(&self, time: NaiveDateTime) -> String {
        if let Some(start) = self.start {
            let secs = (time - start).num_milliseconds() as f32 / 1000.0;
            let mins = (secs / 60.0).floor() as u32;
            format!("{:02}:{:05.2}", mins, secs % 60.0)
        } else {
            time.format("%H:%M:%S%.3f").to_string()
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // ANSI Color Codes
    // ═══════════════════════════════════════════════════════════════════════════

    fn paint(&self, code: &str, text: &str) -> String {
        if self.use_colors {
            format!("\x1b[{}m{}\x1b[0m", code, text)
        } else {
            text.to_string()
        }
    }

    fn green(&self, text: &str) -> String {
        self.paint("32", text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint("33", text)
    }

    fn red(&self, text: &str) -> String {
        self.paint("31", text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint("36", text)
    }

    fn magenta(&self, text: &str) -> String {
        self.paint("35", text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint("2", text)
    }

    fn bold(&self, text: &str) -> String {
        self.paint("1", text)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Event Output
    // ═══════════════════════════════════════════════════════════════════════════

    /// Everything worth printing about one tick
    pub fn tick(&mut self, report: &TickReport) {
        self.ticks += 1;

        if let Some(transition) = &report.transition {
            self.phase_transition(report.timestamp, transition);
        }
        for warning in &report.warnings {
            self.warning(report.timestamp, warning);
        }
        if report.issued {
            self.intent(report.timestamp, &report.intent, &report.source);
        } else if self.level >= OutputLevel::Verbose {
            let time_str = self.format_time(report.timestamp);
            let label = self.dim("TICK:");
            println!(
                "[{}] {} {} / {}",
                time_str, label, report.verdict, report.intent
            );
        }
    }

    pub fn phase_transition(&mut self, time: NaiveDateTime, transition: &PhaseTransition) {
        self.phase_changes += 1;
        if self.level < OutputLevel::Normal {
            return;
        }

        let time_str = self.format_time(time);
        let marker = self.cyan("~~~");
        let label = self.cyan("PHASE:");
        match transition {
            PhaseTransition::Entered(to) => {
                println!("[{}] {} {} → {}", time_str, marker, label, self.bold(&to.to_string()))
            }
            PhaseTransition::Changed { from, to } => println!(
                "[{}] {} {} {} → {}",
                time_str,
                marker,
                label,
                from,
                self.bold(&to.to_string())
            ),
            PhaseTransition::Exited(from) => {
                println!("[{}] {} {} {} → (inactive)", time_str, marker, label, from)
            }
        }
    }

    pub fn intent(&mut self, time: NaiveDateTime, intent: &MovementIntent, source: &IntentSource) {
        self.intents_issued += 1;
        if self.level < OutputLevel::Normal {
            return;
        }

        let time_str = self.format_time(time);
        let (arrow, label) = match intent {
            MovementIntent::None | MovementIntent::Stop => (self.yellow("<--"), self.yellow("HOLD:")),
            MovementIntent::MoveTo { .. } => (self.green("-->"), self.green("MOVE:")),
            MovementIntent::Follow { .. } => (self.magenta("-->"), self.magenta("FOLLOW:")),
        };
        let origin = self.dim(&format!("[{:?}]", source));
        println!("[{}] {} {} {} {}", time_str, arrow, label, intent, origin);
    }

    pub fn warning(&mut self, time: NaiveDateTime, warning: &TickWarning) {
        self.warnings += 1;
        if self.level < OutputLevel::Normal {
            return;
        }

        let time_str = self.format_time(time);
        let marker = self.red("!!!");
        println!("[{}] {} {}", time_str, marker, warning);
    }

    pub fn feed_error(&mut self, time: NaiveDateTime, error: &FeedError) {
        self.feed_errors += 1;
        if self.level < OutputLevel::Normal {
            return;
        }

        let time_str = self.format_time(time);
        let label = self.red("FEED:");
        println!("[{}] {} {} {}", time_str, self.red("xxx"), label, error);
    }

    pub fn checkpoint(&self, result: &CheckpointResult) {
        if self.level < OutputLevel::Normal && result.passed {
            return;
        }

        let status = if result.passed {
            self.green("PASS")
        } else {
            self.red("FAIL")
        };
        let description = result.description.as_deref().unwrap_or("");
        println!(
            "{} checkpoint #{} @ {}ms {}",
            status,
            result.checkpoint_idx + 1,
            result.at_ms,
            self.dim(description)
        );
        for failure in &result.failures {
            println!("     {}", self.red(failure));
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Summary Report
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn print_summary(&self, verification: &VerificationResult) {
        let line = "═".repeat(51);
        println!();
        println!("{}", line);
        println!("  SCENARIO REPLAY SUMMARY");
        println!("{}", line);
        println!("Ticks:           {}", self.ticks);
        println!("Intents Issued:  {}", self.intents_issued);
        println!(
            "Phase Changes:   {}",
            if self.phase_changes > 0 {
                self.cyan(&self.phase_changes.to_string())
            } else {
                "0".to_string()
            }
        );
        println!("Warnings:        {}", self.warnings);
        println!("Feed Errors:     {}", self.feed_errors);

        let (passed, total) = (verification.checkpoints_passed, verification.checkpoints_total);
        let status = if verification.passed() {
            self.green(&format!("PASSED ({}/{})", passed, total))
        } else {
            self.red(&format!("FAILED ({}/{})", passed, total))
        };
        println!("Verification:    {}", status);
        for failed in verification.results.iter().filter(|r| !r.passed) {
            println!(
                "  {} #{} @ {}ms",
                self.red("failed"),
                failed.checkpoint_idx + 1,
                failed.at_ms
            );
        }
        println!("{}", line);
    }

    /// Flush stdout
    pub fn flush(&self) {
        let _ = io::stdout().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_time(hour: u32, min: u32, sec: u32, ms: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_milli_opt(hour, min, sec, ms)
            .unwrap()
    }

    #[test]
    fn test_format_time_relative() {
        let mut output = CliOutput::new(OutputLevel::Normal);
        output.set_start(make_time(12, 0, 0, 0));

        assert_eq!(output.format_time(make_time(12, 0, 15, 230)), "00:15.23");
        assert_eq!(output.format_time(make_time(12, 2, 45, 500)), "02:45.50");
    }

    #[test]
    fn test_quiet_still_counts() {
        let mut output = CliOutput::new(OutputLevel::Quiet);
        output.set_start(make_time(12, 0, 0, 0));

        output.intent(make_time(12, 0, 1, 0), &MovementIntent::Stop, &IntentSource::Idle);
        output.feed_error(make_time(12, 0, 2, 0), &FeedError::Disconnected);

        assert_eq!(output.intents_issued, 1);
        assert_eq!(output.feed_errors, 1);
    }
}
