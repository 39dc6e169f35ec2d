//! rcprobe CLI: drive the one-button demo through a remote-control server
//!
//! ## Usage
//!
//! ```bash
//! rcprobe serve                         # Serve the demo on :10080
//! rcprobe run                           # Run the scenario via localhost:4444
//! rcprobe run --host rc.local --json    # Remote server, JSON report
//! rcprobe config -c rcprobe.yaml        # Show the effective configuration
//! ```

use clap::Parser;
use rcprobe_cli::{
    load_probe_config, Cli, CliConfig, CliError, CliResult, ColorChoice, Commands, ConfigArgs,
    DemoApp, DemoConfig, OutputFormat, RunArgs, ScenarioRunner, ServeArgs, Verbosity,
};
use std::process::ExitCode;
use std::time::Duration;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    // Build configuration from CLI args
    let config = build_config(&cli);
    init_tracing(&config);

    match cli.command {
        Commands::Serve(args) => run_serve(&args),
        Commands::Run(args) => run_scenario(&config, &args),
        Commands::Config(args) => run_config(&args),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = Verbosity::from_flags(cli.quiet, cli.verbose);
    let color: ColorChoice = cli.color.into();
    CliConfig::new().with_verbosity(verbosity).with_color(color)
}

fn init_tracing(config: &CliConfig) {
    // Logs go to stderr so `run --json` keeps stdout clean
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.verbosity.log_filter())),
        )
        .with_target(false)
        .with_ansi(config.color.should_color())
        .with_writer(std::io::stderr)
        .try_init();
}

fn runtime() -> CliResult<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new()
        .map_err(|e| CliError::scenario(format!("Failed to create runtime: {e}")))
}

fn run_serve(args: &ServeArgs) -> CliResult<()> {
    let app = DemoApp::new(DemoConfig {
        bind: args.bind.clone(),
        port: args.port,
        click_delay: Duration::from_millis(args.click_delay_ms),
    });
    runtime()?.block_on(app.run())
}

fn run_scenario(config: &CliConfig, args: &RunArgs) -> CliResult<()> {
    let probe = load_probe_config(&args.probe)?;
    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let mut runner = ScenarioRunner::new(config, format);
    runtime()?.block_on(runner.run(&probe))?;
    Ok(())
}

fn run_config(args: &ConfigArgs) -> CliResult<()> {
    let probe = load_probe_config(&args.probe)?;
    print!("{}", probe.to_yaml()?);
    Ok(())
}
