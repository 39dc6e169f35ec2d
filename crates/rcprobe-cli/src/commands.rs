//! CLI command definitions using clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use rcprobe::{ProbeConfig, SettleMode};
use std::path::PathBuf;

/// rcprobe: drive the one-button demo through a remote-control test server
#[derive(Parser, Debug)]
#[command(name = "rcprobe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the one-button demo application
    Serve(ServeArgs),

    /// Run the button scenario against a remote-control server
    Run(RunArgs),

    /// Print the effective configuration as YAML
    Config(ConfigArgs),
}

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1", env = "RCPROBE_DEMO_BIND")]
    pub bind: String,

    /// HTTP port to listen on
    #[arg(short, long, default_value = "10080", env = "RCPROBE_DEMO_PORT")]
    pub port: u16,

    /// Delay before the click endpoint answers, in milliseconds
    #[arg(long, default_value = "0")]
    pub click_delay_ms: u64,
}

/// Session and timing overrides shared by `run` and `config`
#[derive(Args, Debug, Default, Clone)]
pub struct ProbeArgs {
    /// YAML configuration file
    #[arg(short, long, env = "RCPROBE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Remote-control server host
    #[arg(long, env = "RCPROBE_HOST")]
    pub host: Option<String>,

    /// Remote-control server port
    #[arg(long, env = "RCPROBE_PORT")]
    pub port: Option<u16>,

    /// Browser start command, e.g. "*firefox /usr/bin/firefox"
    #[arg(long, env = "RCPROBE_BROWSER")]
    pub browser: Option<String>,

    /// URL of the application under test
    #[arg(long, env = "RCPROBE_URL")]
    pub url: Option<String>,

    /// Limit on one command exchange with the server, in milliseconds
    #[arg(long, env = "RCPROBE_COMMAND_TIMEOUT_MS")]
    pub command_timeout_ms: Option<u64>,

    /// Button id or locator
    #[arg(long)]
    pub element: Option<String>,

    /// Label expected before clicking
    #[arg(long)]
    pub before: Option<String>,

    /// Label expected after clicking
    #[arg(long)]
    pub after: Option<String>,

    /// Pause between poll attempts, in milliseconds
    #[arg(long)]
    pub poll_interval_ms: Option<u64>,

    /// Attempts before a poll gives up
    #[arg(long)]
    pub max_attempts: Option<usize>,

    /// Wall-clock poll budget in milliseconds (replaces --max-attempts)
    #[arg(long)]
    pub deadline_ms: Option<u64>,

    /// Fixed pause after clicking, in milliseconds
    #[arg(long)]
    pub settle_ms: Option<u64>,

    /// How to let the page settle after clicking
    #[arg(long)]
    pub settle: Option<SettleArg>,

    /// Command name issued for clicks
    #[arg(long)]
    pub click_command: Option<String>,
}

impl ProbeArgs {
    /// Apply overrides on top of `config`
    #[must_use]
    pub fn apply(&self, mut config: ProbeConfig) -> ProbeConfig {
        if let Some(host) = &self.host {
            config.remote.host.clone_from(host);
        }
        if let Some(port) = self.port {
            config.remote.port = port;
        }
        if let Some(browser) = &self.browser {
            config.remote.browser.clone_from(browser);
        }
        if let Some(url) = &self.url {
            config.remote.base_url.clone_from(url);
        }
        if let Some(ms) = self.command_timeout_ms {
            config.remote.command_timeout_ms = ms;
        }
        if let Some(element) = &self.element {
            config.scenario.element = rcprobe::Locator::parse(element);
        }
        if let Some(before) = &self.before {
            config.scenario.initial_text.clone_from(before);
        }
        if let Some(after) = &self.after {
            config.scenario.expected_text.clone_from(after);
        }
        if let Some(ms) = self.poll_interval_ms {
            config.wait.poll_interval_ms = ms;
        }
        if let Some(attempts) = self.max_attempts {
            config.wait.max_attempts = attempts;
        }
        if let Some(ms) = self.deadline_ms {
            config.wait.deadline_ms = Some(ms);
        }
        if let Some(ms) = self.settle_ms {
            config.wait.settle_ms = ms;
        }
        if let Some(settle) = self.settle {
            config.scenario.settle = settle.into();
        }
        if let Some(command) = &self.click_command {
            config.click_command.clone_from(command);
        }
        config
    }
}

/// Arguments for the run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Session and timing
    #[command(flatten)]
    pub probe: ProbeArgs,

    /// Print the scenario report as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Session and timing
    #[command(flatten)]
    pub probe: ProbeArgs,
}

/// Settling strategy argument
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleArg {
    /// Sleep the fixed settle delay
    FixedDelay,
    /// Poll until the label reads the expected text
    UntilText,
}

impl From<SettleArg> for SettleMode {
    fn from(arg: SettleArg) -> Self {
        match arg {
            SettleArg::FixedDelay => Self::FixedDelay,
            SettleArg::UntilText => Self::UntilText,
        }
    }
}

/// Color argument
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    mod cli_tests {
        use super::*;

        #[test]
        fn test_cli_is_well_formed() {
            use clap::CommandFactory;
            Cli::command().debug_assert();
        }

        #[test]
        fn test_parse_serve_defaults() {
            let cli = Cli::parse_from(["rcprobe", "serve"]);
            let Commands::Serve(args) = cli.command else {
                panic!("expected serve");
            };
            assert_eq!(args.port, 10080);
            assert_eq!(args.click_delay_ms, 0);
        }

        #[test]
        fn test_parse_run_flags() {
            let cli = Cli::parse_from([
                "rcprobe",
                "-vv",
                "run",
                "--host",
                "rc.local",
                "--port",
                "5555",
                "--settle",
                "fixed-delay",
                "--json",
            ]);
            assert_eq!(cli.verbose, 2);
            let Commands::Run(args) = cli.command else {
                panic!("expected run");
            };
            assert!(args.json);
            assert_eq!(args.probe.host.as_deref(), Some("rc.local"));
            assert_eq!(args.probe.port, Some(5555));
            assert_eq!(args.probe.settle, Some(SettleArg::FixedDelay));
        }

        #[test]
        fn test_global_flags_after_subcommand() {
            let cli = Cli::parse_from(["rcprobe", "config", "-q", "--color", "never"]);
            assert!(cli.quiet);
            assert_eq!(cli.color, ColorArg::Never);
        }
    }

    mod probe_args_tests {
        use super::*;
        use rcprobe::Locator;

        #[test]
        fn test_no_overrides_keeps_config() {
            let config = ProbeArgs::default().apply(ProbeConfig::default());
            assert_eq!(config, ProbeConfig::default());
        }

        #[test]
        fn test_overrides_apply() {
            let args = ProbeArgs {
                host: Some("rc.local".into()),
                port: Some(5555),
                browser: Some("*chrome".into()),
                url: Some("http://app/rap".into()),
                command_timeout_ms: Some(5_000),
                element: Some("toggle".into()),
                before: Some("Off".into()),
                after: Some("On".into()),
                poll_interval_ms: Some(250),
                max_attempts: Some(8),
                deadline_ms: Some(4_000),
                settle_ms: Some(50),
                settle: Some(SettleArg::FixedDelay),
                click_command: Some("click".into()),
                ..ProbeArgs::default()
            };
            let config = args.apply(ProbeConfig::default());
            assert_eq!(config.remote.host, "rc.local");
            assert_eq!(config.remote.port, 5555);
            assert_eq!(config.remote.browser, "*chrome");
            assert_eq!(config.remote.base_url, "http://app/rap");
            assert_eq!(config.remote.command_timeout_ms, 5_000);
            assert_eq!(config.scenario.element, Locator::id("toggle"));
            assert_eq!(config.scenario.initial_text, "Off");
            assert_eq!(config.scenario.expected_text, "On");
            assert_eq!(config.wait.poll_interval_ms, 250);
            assert_eq!(config.wait.max_attempts, 8);
            assert_eq!(config.wait.deadline_ms, Some(4_000));
            assert_eq!(config.wait.settle_ms, 50);
            assert_eq!(config.scenario.settle, SettleMode::FixedDelay);
            assert_eq!(config.click_command, "click");
        }

        #[test]
        fn test_raw_locator_kept() {
            let args = ProbeArgs {
                element: Some("xpath=//button".into()),
                ..ProbeArgs::default()
            };
            let config = args.apply(ProbeConfig::default());
            assert_eq!(config.scenario.element.query(), "xpath=//button");
        }

        #[test]
        fn test_widget_locator_kept() {
            let args = ProbeArgs {
                element: Some("qx=customButton".into()),
                ..ProbeArgs::default()
            };
            let config = args.apply(ProbeConfig::default());
            assert_eq!(config.scenario.element.query(), "qx=customButton");
        }
    }
}
