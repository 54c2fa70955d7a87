use std::path::Path;

mod map;
mod terminal;
mod validate;

use anyhow::Context;
use clap::ArgAction;
use kinmap::Config;
use map::Map;
use validate::Validate;

/// Load the config file if one was given, otherwise use defaults.
fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    path.map_or_else(
        || Ok(Config::default()),
        |path| {
            Config::load(path)
                .with_context(|| format!("failed to load config from '{}'", path.display()))
        },
    )
}

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command.run()
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Map a list of codes against a reference file
    Map(Map),

    /// Check a reference file's structure without mapping anything
    Validate(Validate),
}

impl Command {
    fn run(self) -> anyhow::Result<()> {
        match self {
            Self::Map(cmd) => cmd.run(),
            Self::Validate(cmd) => cmd.run(),
        }
    }
}
