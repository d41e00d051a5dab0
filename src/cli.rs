//! Command-line interface.

use std::sync::Arc;

use anyhow::Result;
use chrono::Duration;
use clap::{Parser, ValueEnum};
use tracing::warn;

use crate::config::Config;
use crate::constants;
use crate::extract::HttpDocumentSource;
use crate::format::{ConsoleFormatter, Formatter, RenderOptions};
use crate::league::Loader;
use crate::newsletter::Newsletter;

/// Generate a newsletter of recent and upcoming USTA NorCal tennis matches
/// for a club organization.
#[derive(Debug, Parser)]
#[command(name = "matchday", version)]
#[command(after_help = "\
Examples:
  matchday                      Use the default organization, console output
  matchday --org 300            Specify a different organization
  matchday --teams 123,456      Track additional teams by ID
  matchday --past 7 --future 14 Show 7 days back and 14 days ahead
")]
pub struct Cli {
    /// USTA NorCal organization ID
    #[arg(long, default_value_t = constants::DEFAULT_ORGANIZATION_ID)]
    org: u32,

    /// Comma-separated list of additional team IDs to track
    #[arg(long, value_delimiter = ',')]
    teams: Vec<u32>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Console)]
    format: OutputFormat,

    /// Number of days back to include past match results
    #[arg(long, default_value_t = constants::DEFAULT_WINDOW_DAYS)]
    past: i64,

    /// Number of days ahead to include upcoming matches
    #[arg(long, default_value_t = constants::DEFAULT_WINDOW_DAYS)]
    future: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Aligned text tables on stdout
    Console,
}

impl Cli {
    /// Runs the newsletter generation end to end.
    pub async fn execute(self) -> Result<()> {
        let config = Config {
            organization_id: self.org,
            roster: self.teams.clone(),
            past_window: Duration::days(self.past),
            future_window: Duration::days(self.future),
            ..Config::default()
        };

        let source = Arc::new(HttpDocumentSource::new(&config.base_url)?);
        let loader = Loader::new(source, &config);

        let cancel = loader.cancellation_token();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupt received, cancelling load");
                cancel.cancel();
            }
        });

        let mut newsletter = Newsletter::new(config.organization_id, config.roster.clone());
        let generated = newsletter.generate(&loader).await;

        // A partial load still leaves a usable graph; render whatever arrived
        // before reporting the error.
        let formatter: Box<dyn Formatter> = match self.format {
            OutputFormat::Console => Box::new(ConsoleFormatter),
        };
        let options =
            RenderOptions { past: config.past_window, future: config.future_window };
        print!("{}", formatter.render(&newsletter, &options));

        generated.map_err(Into::into)
    }
}
