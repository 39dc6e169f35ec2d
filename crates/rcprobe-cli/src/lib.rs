//! rcprobe CLI library
//!
//! Command-line front end for the rcprobe remote-control driver: serve the
//! one-button demo application, run the button scenario against a
//! remote-control server, and print the effective configuration.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)] // Error types are self-documenting

mod commands;
mod config;
pub mod demo_app;
mod error;
mod output;
mod runner;

pub use commands::{
    Cli, ColorArg, Commands, ConfigArgs, ProbeArgs, RunArgs, ServeArgs, SettleArg,
};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use demo_app::{DemoApp, DemoConfig};
pub use error::{CliError, CliResult};
pub use output::{describe_poll, OutputFormat, ProgressReporter};
pub use runner::{load_probe_config, RunOutcome, ScenarioRunner};
