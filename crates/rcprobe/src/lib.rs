//! rcprobe: remote-control browser test driver
//!
//! Drives a page through a remote-control test server and synchronizes with
//! asynchronous rendering through explicit, policy-driven waits.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    RCPROBE Architecture                         │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌──────────────────┐      │
//! │   │ Scenario / │    │ RcDriver   │    │ CommandProcessor │      │
//! │   │ test code  │───►│ locators,  │───►│ HTTP ─► RC server│      │
//! │   │            │    │ waits      │    │ Mock ─► memory   │      │
//! │   └────────────┘    └────────────┘    └──────────────────┘      │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use rcprobe::prelude::*;
//!
//! # async fn demo() -> ProbeResult<()> {
//! let processor = HttpCommandProcessor::new("localhost", 4444, "*firefox", "http://127.0.0.1:10080/rap");
//! let mut driver = RcDriver::new(processor);
//! driver.start().await?;
//! driver.open("http://127.0.0.1:10080/rap").await?;
//! driver.wait_for_element_present("myButton").await?.into_result("myButton")?;
//! assert_eq!(driver.get_text("myButton").await?, "Before");
//! driver.click_and_wait_for_text("myButton", "After").await?;
//! driver.stop().await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::large_stack_arrays, clippy::large_stack_frames))]

/// Session and timing configuration
pub mod config;
/// Element helpers over a remote session
pub mod driver;
/// Element locators
pub mod locator;
/// Command processors (HTTP client and in-memory mock)
pub mod processor;
/// Remote-control wire format
pub mod protocol;
mod result;
/// Retry policies
pub mod retry;
/// The button-toggle scenario
pub mod scenario;
/// Polling waits
pub mod wait;

pub use config::{ProbeConfig, RemoteConfig, WaitConfig};
pub use driver::RcDriver;
pub use locator::Locator;
#[cfg(feature = "http")]
pub use processor::HttpCommandProcessor;
pub use processor::{CommandProcessor, MockProcessor, RecordedCommand};
pub use result::{ProbeError, ProbeResult};
pub use retry::{Budget, RetryPolicy};
pub use scenario::{ButtonScenario, ScenarioReport, SettleMode};
pub use wait::{poll_until, PollOutcome};

/// Common imports
pub mod prelude {
    pub use super::config::*;
    pub use super::driver::*;
    pub use super::locator::*;
    pub use super::processor::*;
    pub use super::result::*;
    pub use super::retry::*;
    pub use super::scenario::*;
    pub use super::wait::*;
}
