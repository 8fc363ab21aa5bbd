//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::cli::server::{serve, ServerConfig};
use crate::config::ScraperConfig;
use crate::engine::ScrapeEngine;
use crate::error::{Error, Result};
use serde::Serialize;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Scrape {
                url,
                page_size,
                deadline_secs,
                no_probe,
                strict,
            } => {
                let mut config = self.load_config()?;
                config.pagination.probe_last_page &= !*no_probe;
                config.extract.strict |= *strict;
                self.scrape(config, url, *page_size, deadline_secs.map(Duration::from_secs))
                    .await
            }
            Commands::Serve {
                port,
                deadline_secs,
            } => {
                let config = ServerConfig {
                    scraper: self.load_config()?,
                    deadline: deadline_secs.map(Duration::from_secs),
                };
                serve(config, *port).await
            }
            Commands::Config => {
                print!("{}", self.load_config()?.to_yaml()?);
                Ok(())
            }
        }
    }

    /// Load the configuration file, or the defaults when none was given
    fn load_config(&self) -> Result<ScraperConfig> {
        match &self.cli.config {
            Some(path) => ScraperConfig::from_file(path),
            None => Ok(ScraperConfig::default()),
        }
    }

    async fn scrape(
        &self,
        config: ScraperConfig,
        url: &str,
        page_size: Option<u32>,
        deadline: Option<Duration>,
    ) -> Result<()> {
        let engine = ScrapeEngine::new(config);
        let cancel = CancellationToken::new();

        // Ctrl-C stops the run but still prints what was collected
        let interrupt = {
            let token = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    token.cancel();
                }
            })
        };

        let result = engine.scrape_url(url, page_size, deadline, &cancel).await;
        interrupt.abort();
        let result = result?;

        self.print(&result)?;

        if result.status.is_error() {
            return Err(Error::Other(format!("Scrape failed: {:?}", result.status)));
        }
        if !result.status.is_complete() {
            tracing::warn!("Scrape stopped early: {:?}", result.status);
        }
        Ok(())
    }

    fn print<T: Serialize>(&self, value: &T) -> Result<()> {
        let output = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        println!("{output}");
        Ok(())
    }
}
