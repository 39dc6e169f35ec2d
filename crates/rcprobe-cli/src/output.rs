//! Output formatting and progress reporting

use console::{style, Style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use rcprobe::{PollOutcome, ScenarioReport};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Output format for scenario results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text on stderr
    #[default]
    Text,
    /// JSON report on stdout
    Json,
}

/// Progress reporter for a scenario run
#[derive(Debug)]
pub struct ProgressReporter {
    term: Term,
    spinner: Option<ProgressBar>,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl ProgressReporter {
    /// Create a new progress reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            spinner: None,
            use_color,
            quiet,
        }
    }

    /// Start a spinner for a step of unknown length
    pub fn start_spinner(&mut self, message: &str) {
        if self.quiet || !self.term.is_term() {
            return;
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg} ({elapsed})")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        self.spinner = Some(pb);
    }

    /// Stop and clear the spinner
    pub fn finish(&mut self) {
        if let Some(pb) = self.spinner.take() {
            pb.finish_and_clear();
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("✓").green().bold().to_string()
        } else {
            "PASS".to_string()
        };

        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print a failure message
    pub fn failure(&self, message: &str) {
        // Always print failures, even in quiet mode
        let prefix = if self.use_color {
            style("✗").red().bold().to_string()
        } else {
            "FAIL".to_string()
        };

        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("ℹ").blue().bold().to_string()
        } else {
            "INFO".to_string()
        };

        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print a section header
    pub fn header(&self, title: &str) {
        if self.quiet {
            return;
        }

        let styled = if self.use_color {
            style(title).bold().underlined().to_string()
        } else {
            format!("=== {title} ===")
        };

        let _ = self.term.write_line("");
        let _ = self.term.write_line(&styled);
    }

    /// Print the outcome of a passing scenario
    pub fn report(&self, report: &ScenarioReport) {
        if self.quiet {
            return;
        }

        self.success(&format!(
            "{} read '{}' then '{}'",
            report.element, report.initial_text, report.final_text
        ));
        self.info(&format!("presence: {}", describe_poll(&report.presence)));
        match &report.settle_outcome {
            Some(outcome) => self.info(&format!("settle ({}): {}", report.settle, describe_poll(outcome))),
            None => self.info(&format!("settle ({})", report.settle)),
        }

        let secs = report.duration.as_secs_f64();
        let line = if self.use_color {
            format!("{} in {secs:.2}s", Style::new().green().bold().apply_to("PASSED"))
        } else {
            format!("PASSED in {secs:.2}s")
        };
        let _ = self.term.write_line("");
        let _ = self.term.write_line(&line);
    }
}

/// One-line summary of a poll
#[must_use]
pub fn describe_poll(outcome: &PollOutcome) -> String {
    let verdict = if outcome.is_found() { "found" } else { "timed out" };
    format!(
        "{verdict} after {} attempt(s) in {:.2}s",
        outcome.attempts(),
        outcome.elapsed().as_secs_f64()
    )
}
