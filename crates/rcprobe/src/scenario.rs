//! The button-toggle scenario.
//!
//! Open the application, wait for the button, check its label, click it,
//! let the page settle and check the label changed.

use crate::driver::RcDriver;
use crate::locator::Locator;
use crate::processor::CommandProcessor;
use crate::result::{ProbeError, ProbeResult};
use crate::wait::PollOutcome;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;

/// Widget id the demo application assigns to its button
pub const DEMO_BUTTON_ID: &str = "myButton";
/// Button label before the click
pub const LABEL_BEFORE: &str = "Before";
/// Button label after the click
pub const LABEL_AFTER: &str = "After";

/// How the scenario lets the page catch up after clicking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettleMode {
    /// Sleep the driver's fixed settle delay
    FixedDelay,
    /// Poll the label until it reads the expected text
    #[default]
    UntilText,
}

impl std::fmt::Display for SettleMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FixedDelay => f.write_str("fixed-delay"),
            Self::UntilText => f.write_str("until-text"),
        }
    }
}

/// Click a button and expect its label to change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonScenario {
    /// The button
    pub element: Locator,
    /// Label expected before clicking
    pub initial_text: String,
    /// Label expected after clicking
    pub expected_text: String,
    /// Settling strategy
    pub settle: SettleMode,
}

impl Default for ButtonScenario {
    fn default() -> Self {
        Self {
            element: Locator::id(DEMO_BUTTON_ID),
            initial_text: LABEL_BEFORE.to_string(),
            expected_text: LABEL_AFTER.to_string(),
            settle: SettleMode::default(),
        }
    }
}

/// What a passing run observed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    /// Element query
    pub element: String,
    /// Page opened
    pub url: String,
    /// Label read before clicking
    pub initial_text: String,
    /// Label read after settling
    pub final_text: String,
    /// Presence poll
    pub presence: PollOutcome,
    /// Settling strategy used
    pub settle: SettleMode,
    /// Label poll, for [`SettleMode::UntilText`]
    pub settle_outcome: Option<PollOutcome>,
    /// Wall-clock start
    pub started_at: DateTime<Utc>,
    /// Total run time
    pub duration: Duration,
}

impl ButtonScenario {
    /// Scenario for the demo application's button
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Target a different element
    #[must_use]
    pub fn with_element(mut self, element: impl Into<Locator>) -> Self {
        self.element = element.into();
        self
    }

    /// Expect different labels
    #[must_use]
    pub fn with_texts(mut self, initial: impl Into<String>, expected: impl Into<String>) -> Self {
        self.initial_text = initial.into();
        self.expected_text = expected.into();
        self
    }

    /// Choose the settling strategy
    #[must_use]
    pub const fn with_settle(mut self, settle: SettleMode) -> Self {
        self.settle = settle;
        self
    }

    /// Run against an already started session
    pub async fn run<P: CommandProcessor>(
        &self,
        driver: &RcDriver<P>,
        url: &str,
    ) -> ProbeResult<ScenarioReport> {
        let started_at = Utc::now();
        let start = Instant::now();
        let element = &self.element;

        driver.open(url).await?;

        let presence = driver
            .wait_for_element_present(element)
            .await?
            .into_result(format!("element {element}"))?;

        let initial_text = driver.get_text(element).await?;
        check_text(element, "before click", &self.initial_text, &initial_text)?;

        let settle_outcome = match self.settle {
            SettleMode::FixedDelay => {
                driver.click_and_wait(element).await?;
                None
            }
            SettleMode::UntilText => Some(
                driver
                    .click_and_wait_for_text(element, &self.expected_text)
                    .await?,
            ),
        };

        let final_text = driver.get_text(element).await?;
        check_text(element, "after click", &self.expected_text, &final_text)?;

        let duration = start.elapsed();
        tracing::info!(element = %element, ?duration, "button scenario passed");
        Ok(ScenarioReport {
            element: element.query(),
            url: url.to_string(),
            initial_text,
            final_text,
            presence,
            settle: self.settle,
            settle_outcome,
            started_at,
            duration,
        })
    }

    /// Start a session, run, and stop the session whatever the outcome
    pub async fn run_session<P: CommandProcessor>(
        &self,
        driver: &mut RcDriver<P>,
        url: &str,
    ) -> ProbeResult<ScenarioReport> {
        driver.start().await?;
        let result = self.run(driver, url).await;
        let stopped = driver.stop().await;

        match (result, stopped) {
            (Ok(report), Ok(())) => Ok(report),
            (Ok(_), Err(err)) => Err(err),
            (Err(err), stopped) => {
                if let Err(stop_err) = stopped {
                    tracing::warn!(error = %stop_err, "failed to stop session after scenario failure");
                }
                Err(err)
            }
        }
    }
}

fn check_text(element: &Locator, when: &str, expected: &str, actual: &str) -> ProbeResult<()> {
    if actual == expected {
        return Ok(());
    }
    Err(ProbeError::assertion(format!(
        "{element} {when}: expected '{expected}', got '{actual}'"
    )))
}
