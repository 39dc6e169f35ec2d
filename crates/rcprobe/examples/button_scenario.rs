//! Button Scenario Example
//!
//! Runs the one-button scenario against an in-memory page:
//! - Wait for `myButton` to render
//! - Check it reads "Before"
//! - Click it and wait until it reads "After"
//!
//! # Running
//!
//! ```bash
//! cargo run --example button_scenario -p rcprobe
//! ```
//!
//! Point the same scenario at a live remote-control server with
//! `rcprobe run` from the `rcprobe-cli` crate.

use rcprobe::prelude::*;
use std::time::Duration;

const URL: &str = "http://127.0.0.1:10080/rap";

#[tokio::main]
async fn main() -> ProbeResult<()> {
    println!("=== rcprobe Button Scenario Example ===\n");

    // Demo 1: page that renders at once
    demo_immediate().await?;

    // Demo 2: page that renders late and updates lazily
    demo_slow_page().await?;

    // Demo 3: fixed delay versus a lagging page
    demo_fixed_delay().await;

    println!("\n=== Button Scenario Example Complete ===");
    Ok(())
}

async fn demo_immediate() -> ProbeResult<()> {
    println!("--- Demo 1: Immediate Page ---\n");

    let mut driver = RcDriver::new(MockProcessor::button_demo()).with_policy(RetryPolicy::fast());
    let report = ButtonScenario::new().run_session(&mut driver, URL).await?;

    println!("  element:  {}", report.element);
    println!("  before:   {}", report.initial_text);
    println!("  after:    {}", report.final_text);
    println!("  presence: {} attempt(s)", report.presence.attempts());
    println!("  commands: {:?}", driver.processor().command_names());
    println!();
    Ok(())
}

async fn demo_slow_page() -> ProbeResult<()> {
    println!("--- Demo 2: Slow Page ---\n");

    let page = MockProcessor::button_demo()
        .appears_after("id=myButton", 4)
        .with_read_lag("id=myButton", 2);
    let policy = RetryPolicy::fast().with_interval(Duration::from_millis(25));
    let mut driver = RcDriver::new(page).with_policy(policy);

    let report = ButtonScenario::new().run_session(&mut driver, URL).await?;
    println!("  presence: {} attempt(s)", report.presence.attempts());
    if let Some(settle) = &report.settle_outcome {
        println!("  label poll: {} attempt(s)", settle.attempts());
    }
    println!("  took {:?}", report.duration);
    println!();
    Ok(())
}

async fn demo_fixed_delay() {
    println!("--- Demo 3: Fixed Delay ---\n");

    let page = MockProcessor::button_demo().with_read_lag("id=myButton", 1);
    let mut driver = RcDriver::new(page)
        .with_policy(RetryPolicy::fast())
        .with_settle_delay(Duration::from_millis(50));

    let result = ButtonScenario::new()
        .with_settle(SettleMode::FixedDelay)
        .run_session(&mut driver, URL)
        .await;

    match result {
        Ok(report) => println!("  passed: {}", report.final_text),
        Err(err) => println!("  failed as expected: {err}"),
    }
    println!();
}
