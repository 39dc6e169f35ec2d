//! Scenario runner

use crate::commands::ProbeArgs;
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::{OutputFormat, ProgressReporter};
use rcprobe::{ButtonScenario, HttpCommandProcessor, ProbeConfig, RcDriver, ScenarioReport};
use serde::Serialize;

/// Resolve the effective configuration: defaults, then the YAML file, then
/// environment and flags (clap has already folded the environment into `args`)
pub fn load_probe_config(args: &ProbeArgs) -> CliResult<ProbeConfig> {
    let base = match &args.config {
        Some(path) => ProbeConfig::from_file(path)?,
        None => ProbeConfig::default(),
    };
    let config = args.apply(base);
    config.validate()?;
    Ok(config)
}

/// Machine-readable result of one run
#[derive(Debug, Serialize)]
pub struct RunOutcome<'a> {
    /// Whether the scenario passed
    pub passed: bool,
    /// Report of a passing run
    #[serde(flatten)]
    pub report: Option<&'a ScenarioReport>,
    /// Failure description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<'a> RunOutcome<'a> {
    /// Outcome of a passing run
    #[must_use]
    pub const fn passed(report: &'a ScenarioReport) -> Self {
        Self {
            passed: true,
            report: Some(report),
            error: None,
        }
    }

    /// Outcome of a failed run
    #[must_use]
    pub fn failed(error: impl ToString) -> Self {
        Self {
            passed: false,
            report: None,
            error: Some(error.to_string()),
        }
    }

    /// Render as pretty JSON
    pub fn to_json(&self) -> CliResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| rcprobe::ProbeError::from(e).into())
    }
}

/// Runs the button scenario against a remote-control server
#[derive(Debug)]
pub struct ScenarioRunner {
    reporter: ProgressReporter,
    format: OutputFormat,
}

impl ScenarioRunner {
    /// Create a runner
    #[must_use]
    pub fn new(config: &CliConfig, format: OutputFormat) -> Self {
        let reporter =
            ProgressReporter::new(config.color.should_color(), config.verbosity.is_quiet());
        Self { reporter, format }
    }

    /// Start a session, run the scenario and stop the session
    ///
    /// # Errors
    ///
    /// Returns the first probe failure: transport, remote command, timeout or
    /// label mismatch
    pub async fn run(&mut self, probe: &ProbeConfig) -> CliResult<ScenarioReport> {
        let processor = HttpCommandProcessor::from_config(&probe.remote);
        let mut driver = RcDriver::from_config(processor, probe);
        let scenario: &ButtonScenario = &probe.scenario;
        let url = probe.remote.base_url.as_str();

        self.reporter.header("Button scenario");
        self.reporter.info(&format!(
            "{} via {} ({})",
            url,
            probe.remote.driver_url(),
            probe.remote.browser
        ));
        self.reporter.start_spinner(&format!(
            "waiting for {} to read '{}'",
            scenario.element, scenario.expected_text
        ));

        let result = scenario.run_session(&mut driver, url).await;
        self.reporter.finish();

        match result {
            Ok(report) => {
                self.emit(&RunOutcome::passed(&report))?;
                if self.format == OutputFormat::Text {
                    self.reporter.report(&report);
                }
                Ok(report)
            }
            Err(err) => {
                tracing::debug!(error = ?err, "scenario failed");
                self.emit(&RunOutcome::failed(&err))?;
                self.reporter.failure(&err.to_string());
                Err(err.into())
            }
        }
    }

    fn emit(&self, outcome: &RunOutcome<'_>) -> CliResult<()> {
        if self.format == OutputFormat::Json {
            println!("{}", outcome.to_json()?);
        }
        Ok(())
    }
}
