use anyhow::Context;
use clap::Parser;
use netatmo_core::{ConfigFile, NetatmoClient, report};
use tracing_subscriber::EnvFilter;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "netatmo",
    version,
    about = "Print the latest Netatmo weather station readings",
    long_about = "Reads credentials from ./config.toml or ~/.config/netatmo/config.toml, \
                  prints a one-line status header followed by per-module readings for \
                  every station on the account."
)]
pub struct Cli {
    /// Log debug output to stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Logs go to stderr so stdout stays usable by status bars.
    pub fn init_logging(&self) {
        let filter = if self.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
        };

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let mut config_file = ConfigFile::load().context("Cannot load config file")?;
        let client = NetatmoClient::new();

        let stdout = std::io::stdout();
        let mut out = stdout.lock();

        report::run(&mut config_file, &client, &mut out).await
    }
}
