//! Poll Policies Example
//!
//! Demonstrates the polling wait and its retry policies:
//! - Attempt budgets (the default: 60 probes, 1s apart)
//! - Deadline budgets
//! - Which probe errors are retried
//! - Explicit found / timed-out outcomes
//!
//! # Running
//!
//! ```bash
//! cargo run --example poll_policies -p rcprobe
//! ```

use rcprobe::prelude::*;
use std::time::Duration;

#[tokio::main]
async fn main() -> ProbeResult<()> {
    println!("=== rcprobe Poll Policies Example ===\n");

    // Demo 1: policy shapes
    demo_policies();

    // Demo 2: a probe that succeeds on the fourth try
    demo_found().await?;

    // Demo 3: a probe that never succeeds
    demo_timed_out().await?;

    // Demo 4: error classification
    demo_errors().await;

    println!("\n=== Poll Policies Example Complete ===");
    Ok(())
}

fn demo_policies() {
    println!("--- Demo 1: Policies ---\n");

    let default = RetryPolicy::default();
    println!("Default:  every {:?}, budget {}", default.interval, default.budget);
    println!("  longest wait: {:?}", default.max_sleep());

    let deadline = RetryPolicy::default()
        .with_interval(Duration::from_millis(250))
        .with_deadline(Duration::from_secs(5));
    println!("Deadline: every {:?}, budget {}", deadline.interval, deadline.budget);

    let fast = RetryPolicy::fast();
    println!("Fast:     every {:?}, budget {}", fast.interval, fast.budget);
    println!();
}

async fn demo_found() -> ProbeResult<()> {
    println!("--- Demo 2: Found ---\n");

    let policy = RetryPolicy::fast();
    let mut tries = 0;
    let outcome = poll_until(&policy, "fourth try", || {
        tries += 1;
        let hit = tries == 4;
        async move { Ok(hit) }
    })
    .await?;

    println!("  outcome: found={} after {} attempt(s)", outcome.is_found(), outcome.attempts());
    println!();
    Ok(())
}

async fn demo_timed_out() -> ProbeResult<()> {
    println!("--- Demo 3: Timed Out ---\n");

    let policy = RetryPolicy::fast().with_max_attempts(5);
    let outcome = poll_until(&policy, "never", || async { Ok(false) }).await?;
    println!("  outcome: found={} after {} attempt(s)", outcome.is_found(), outcome.attempts());

    // Callers that need the element turn a timeout into an error
    if let Err(err) = outcome.into_result("element id=missing") {
        println!("  as error: {err}");
    }
    println!();
    Ok(())
}

async fn demo_errors() {
    println!("--- Demo 4: Error Classification ---\n");

    let policy = RetryPolicy::fast().with_max_attempts(3);

    // Transport failures are retried until the budget runs out
    let outcome = poll_until(&policy, "flaky server", || async {
        Err(ProbeError::transport("connection refused"))
    })
    .await;
    if let Ok(PollOutcome::TimedOut { last_error, .. }) = &outcome {
        println!("  transport: timed out, last error {last_error:?}");
    }

    // Garbled replies from a half-loaded page are retried too
    let outcome = poll_until(&policy, "half-loaded page", || async {
        Err(ProbeError::protocol("empty reply to isElementPresent"))
    })
    .await;
    if let Ok(PollOutcome::TimedOut { attempts, .. }) = &outcome {
        println!("  protocol:  timed out after {attempts} attempt(s)");
    }

    // A missing session stops the wait at once
    let outcome = poll_until(&policy, "no session", || async {
        Err(ProbeError::NoSession {
            message: "isElementPresent issued before start".into(),
        })
    })
    .await;
    if let Err(err) = outcome {
        println!("  session:   aborted: {err}");
    }
    println!();
}
