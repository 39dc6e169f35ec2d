//! RcDriver - element helpers over a remote-control session
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │  RcDriver<P: CommandProcessor>                                │
//! ├───────────────────────────────────────────────────────────────┤
//! │  locators      bare name ──► id=<name>                        │
//! │  actions       click, get_text, open                          │
//! │  waits         wait_for_element_present, wait_for_text        │
//! │  settling      click_and_wait (fixed delay)                   │
//! │                click_and_wait_for_text (poll post-condition)  │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! Remote failures from actions propagate. Failures during a presence or
//! text poll are handled by the driver's [`RetryPolicy`].

use crate::config::ProbeConfig;
use crate::locator::Locator;
use crate::processor::CommandProcessor;
use crate::protocol::{DEFAULT_CLICK_COMMAND, GET_TEXT, IS_ELEMENT_PRESENT, OPEN};
use crate::result::ProbeResult;
use crate::retry::RetryPolicy;
use crate::wait::{self, PollOutcome, DEFAULT_SETTLE_DELAY};
use std::time::Duration;

/// Driver for one remote browser session
#[derive(Debug)]
pub struct RcDriver<P: CommandProcessor> {
    processor: P,
    click_command: String,
    policy: RetryPolicy,
    settle_delay: Duration,
}

impl<P: CommandProcessor> RcDriver<P> {
    /// Wrap a processor with default timing (1s interval, 60 attempts, 1s settle)
    #[must_use]
    pub fn new(processor: P) -> Self {
        Self {
            processor,
            click_command: DEFAULT_CLICK_COMMAND.to_string(),
            policy: RetryPolicy::default(),
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }

    /// Wrap a processor with timing and click command from configuration
    #[must_use]
    pub fn from_config(processor: P, config: &ProbeConfig) -> Self {
        Self::new(processor)
            .with_click_command(config.click_command.clone())
            .with_policy(config.wait.retry_policy())
            .with_settle_delay(config.wait.settle_delay())
    }

    /// Set the command issued for clicks
    #[must_use]
    pub fn with_click_command(mut self, command: impl Into<String>) -> Self {
        self.click_command = command.into();
        self
    }

    /// Set the retry policy used by waits
    #[must_use]
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the fixed settle delay used by [`Self::click_and_wait`]
    #[must_use]
    pub const fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// The underlying processor
    #[must_use]
    pub const fn processor(&self) -> &P {
        &self.processor
    }

    /// Unwrap the processor
    #[must_use]
    pub fn into_processor(self) -> P {
        self.processor
    }

    /// Retry policy used by waits
    #[must_use]
    pub const fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Fixed settle delay
    #[must_use]
    pub const fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    /// Command issued for clicks
    #[must_use]
    pub fn click_command(&self) -> &str {
        &self.click_command
    }

    /// Open the browser session
    pub async fn start(&mut self) -> ProbeResult<()> {
        self.processor.start().await
    }

    /// Close the browser session
    pub async fn stop(&mut self) -> ProbeResult<()> {
        self.processor.stop().await
    }

    /// Navigate to a URL
    pub async fn open(&self, url: &str) -> ProbeResult<()> {
        tracing::info!(url, "opening page");
        self.processor.do_command(OPEN, &[url]).await?;
        Ok(())
    }

    /// Ask once whether the element exists
    pub async fn is_element_present(&self, locator: impl Into<Locator>) -> ProbeResult<bool> {
        let query = locator.into().query();
        self.processor
            .get_boolean(IS_ELEMENT_PRESENT, &[query.as_str()])
            .await
    }

    /// Poll until the element exists or the retry budget is spent.
    ///
    /// Retryable errors from the presence query count as "not yet". A spent
    /// budget is reported as [`PollOutcome::TimedOut`], not as an error.
    pub async fn wait_for_element_present(
        &self,
        locator: impl Into<Locator>,
    ) -> ProbeResult<PollOutcome> {
        let query = locator.into().query();
        let what = format!("element {query}");
        let processor = &self.processor;
        wait::poll_until(&self.policy, &what, || {
            let query = query.clone();
            async move {
                processor
                    .get_boolean(IS_ELEMENT_PRESENT, &[query.as_str()])
                    .await
            }
        })
        .await
    }

    /// Click the element with the configured click command
    pub async fn click(&self, locator: impl Into<Locator>) -> ProbeResult<()> {
        let query = locator.into().query();
        tracing::info!(locator = %query, command = %self.click_command, "click");
        self.processor
            .do_command(&self.click_command, &[query.as_str()])
            .await?;
        Ok(())
    }

    /// Read the element's text
    pub async fn get_text(&self, locator: impl Into<Locator>) -> ProbeResult<String> {
        let query = locator.into().query();
        let text = self.processor.get_string(GET_TEXT, &[query.as_str()]).await?;
        tracing::debug!(locator = %query, text = %text, "read text");
        Ok(text)
    }

    /// Click, then pause for the fixed settle delay
    pub async fn click_and_wait(&self, locator: impl Into<Locator>) -> ProbeResult<()> {
        self.click(locator).await?;
        wait::settle(self.settle_delay).await;
        Ok(())
    }

    /// Poll until the element's text equals `expected`
    pub async fn wait_for_text(
        &self,
        locator: impl Into<Locator>,
        expected: &str,
    ) -> ProbeResult<PollOutcome> {
        let query = locator.into().query();
        let what = format!("text '{expected}' in {query}");
        let processor = &self.processor;
        wait::poll_until(&self.policy, &what, || {
            let query = query.clone();
            async move {
                let text = processor.get_string(GET_TEXT, &[query.as_str()]).await?;
                Ok(text == expected)
            }
        })
        .await
    }

    /// Click, then poll until the element's text equals `expected`
    pub async fn click_and_wait_for_text(
        &self,
        locator: impl Into<Locator>,
        expected: &str,
    ) -> ProbeResult<PollOutcome> {
        let locator = locator.into();
        self.click(&locator).await?;
        self.wait_for_text(locator, expected).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::processor::{MockProcessor, RecordedCommand};
    use crate::result::ProbeError;
    use tokio::time::Instant;

    async fn started(mock: MockProcessor) -> RcDriver<MockProcessor> {
        let mut driver = RcDriver::new(mock);
        driver.start().await.unwrap();
        driver
    }

    mod action_tests {
        use super::*;

        #[tokio::test]
        async fn test_click_uses_id_prefix_and_custom_command() {
            let driver = started(MockProcessor::button_demo()).await;
            driver.click("myButton").await.unwrap();
            let last = driver.processor().history().pop().unwrap();
            assert_eq!(
                last,
                RecordedCommand {
                    command: "qxClickAt".into(),
                    args: vec!["id=myButton".into()],
                }
            );
        }

        #[tokio::test]
        async fn test_get_text_uses_id_prefix() {
            let driver = started(MockProcessor::button_demo()).await;
            assert_eq!(driver.get_text("myButton").await.unwrap(), "Before");
            let last = driver.processor().history().pop().unwrap();
            assert_eq!(last.command, "getText");
            assert_eq!(last.args, vec!["id=myButton".to_string()]);
        }

        #[tokio::test]
        async fn test_click_failure_propagates() {
            let driver = started(MockProcessor::new()).await;
            let err = driver.click("missing").await.unwrap_err();
            assert!(matches!(err, ProbeError::Command { .. }));
        }

        #[tokio::test]
        async fn test_get_text_failure_propagates() {
            let driver = started(MockProcessor::new()).await;
            assert!(driver.get_text("missing").await.is_err());
        }

        #[tokio::test]
        async fn test_configured_click_command() {
            let mock = MockProcessor::button_demo().with_click_command("click");
            let mut driver = RcDriver::new(mock).with_click_command("click");
            driver.start().await.unwrap();
            driver.click("myButton").await.unwrap();
            assert!(driver.processor().was_called("click"));
            assert!(!driver.processor().was_called("qxClickAt"));
        }

        #[tokio::test]
        async fn test_open_records_url() {
            let driver = started(MockProcessor::button_demo()).await;
            driver.open("http://127.0.0.1:10080/rap").await.unwrap();
            assert_eq!(
                driver.processor().current_url().as_deref(),
                Some("http://127.0.0.1:10080/rap")
            );
        }
    }

    mod wait_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_present_immediately() {
            let driver = started(MockProcessor::button_demo()).await;
            let outcome = driver.wait_for_element_present("myButton").await.unwrap();
            assert!(outcome.is_found());
            assert_eq!(outcome.attempts(), 1);
            assert!(outcome.elapsed() < Duration::from_secs(1));
        }

        #[tokio::test(start_paused = true)]
        async fn test_transient_errors_absorbed_until_present() {
            let mock = MockProcessor::button_demo().fails_until("id=myButton", 3);
            let driver = started(mock).await;
            let outcome = driver.wait_for_element_present("myButton").await.unwrap();
            assert!(outcome.is_found());
            assert_eq!(outcome.attempts(), 4);
        }

        #[tokio::test(start_paused = true)]
        async fn test_never_present_returns_after_sixty_attempts() {
            let driver = started(MockProcessor::new()).await;
            let start = Instant::now();
            let outcome = driver.wait_for_element_present("ghost").await.unwrap();
            assert!(!outcome.is_found());
            assert_eq!(outcome.attempts(), 60);
            assert!(start.elapsed() < Duration::from_secs(61));

            let presence_queries = driver
                .processor()
                .history()
                .iter()
                .filter(|c| c.command == "isElementPresent")
                .inspect(|c| assert_eq!(c.args, vec!["id=ghost".to_string()]))
                .count();
            assert_eq!(presence_queries, 60);
        }

        #[tokio::test(start_paused = true)]
        async fn test_always_erroring_query_is_not_propagated() {
            let mock = MockProcessor::button_demo().fails_until("id=myButton", usize::MAX);
            let driver = started(mock).await;
            let outcome = driver.wait_for_element_present("myButton").await.unwrap();
            match outcome {
                PollOutcome::TimedOut {
                    attempts,
                    last_error,
                    ..
                } => {
                    assert_eq!(attempts, 60);
                    assert!(last_error.unwrap().contains("not found"));
                }
                PollOutcome::Found { .. } => panic!("element should never appear"),
            }
        }

        #[tokio::test(start_paused = true)]
        async fn test_wait_without_session_fails_fast() {
            let driver = RcDriver::new(MockProcessor::button_demo());
            let err = driver.wait_for_element_present("myButton").await.unwrap_err();
            assert!(matches!(err, ProbeError::NoSession { .. }));
        }

        #[tokio::test(start_paused = true)]
        async fn test_custom_policy() {
            let driver = started(MockProcessor::new())
                .await
                .with_policy(RetryPolicy::default().with_max_attempts(3));
            let outcome = driver.wait_for_element_present("ghost").await.unwrap();
            assert_eq!(outcome.attempts(), 3);
        }
    }

    mod settle_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_click_and_wait_pauses_settle_delay() {
            let driver = started(MockProcessor::button_demo()).await;
            let start = Instant::now();
            driver.click_and_wait("myButton").await.unwrap();
            assert!(start.elapsed() >= Duration::from_secs(1));
            assert!(driver.processor().was_called("qxClickAt"));
        }

        #[tokio::test(start_paused = true)]
        async fn test_custom_settle_delay() {
            let driver = started(MockProcessor::button_demo())
                .await
                .with_settle_delay(Duration::from_millis(2_500));
            let start = Instant::now();
            driver.click_and_wait("myButton").await.unwrap();
            assert!(start.elapsed() >= Duration::from_millis(2_500));
        }

        #[tokio::test(start_paused = true)]
        async fn test_click_and_wait_then_text_changes() {
            let driver = started(MockProcessor::button_demo()).await;
            assert_eq!(driver.get_text("myButton").await.unwrap(), "Before");
            driver.click_and_wait("myButton").await.unwrap();
            assert_eq!(driver.get_text("myButton").await.unwrap(), "After");
        }

        #[tokio::test(start_paused = true)]
        async fn test_click_and_wait_for_text_rides_out_lag() {
            let mock = MockProcessor::button_demo().with_read_lag("id=myButton", 3);
            let driver = started(mock).await;
            let outcome = driver
                .click_and_wait_for_text("myButton", "After")
                .await
                .unwrap();
            assert!(outcome.is_found());
            assert_eq!(outcome.attempts(), 4);
        }

        #[tokio::test(start_paused = true)]
        async fn test_wait_for_text_times_out_on_wrong_text() {
            let driver = started(MockProcessor::button_demo())
                .await
                .with_policy(RetryPolicy::default().with_max_attempts(5));
            let outcome = driver.wait_for_text("myButton", "Never").await.unwrap();
            assert!(!outcome.is_found());
            assert_eq!(outcome.attempts(), 5);
        }
    }

    #[test]
    fn test_from_config() {
        let mut config = ProbeConfig::default();
        config.click_command = "click".into();
        config.wait.settle_ms = 250;
        config.wait.max_attempts = 7;
        let driver = RcDriver::from_config(MockProcessor::new(), &config);
        assert_eq!(driver.click_command(), "click");
        assert_eq!(driver.settle_delay(), Duration::from_millis(250));
        assert_eq!(driver.policy().budget, crate::retry::Budget::Attempts(7));
    }
}
