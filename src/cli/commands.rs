//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Block-aware review scraper
#[derive(Parser, Debug)]
#[command(name = "review-scrape")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Scraper configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scrape every review of a business
    Scrape {
        /// Business review page URL
        url: String,

        /// Page size hint, sent when the site has a page size parameter
        #[arg(long)]
        page_size: Option<u32>,

        /// Give up after this many seconds, keeping what was collected
        #[arg(long)]
        deadline_secs: Option<u64>,

        /// Skip learning the last page up front from the site's clamping
        #[arg(long)]
        no_probe: bool,

        /// Fail on the first unparseable review instead of skipping it
        #[arg(long)]
        strict: bool,
    },

    /// Start HTTP server mode
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "5000")]
        port: u16,

        /// Per-request scrape deadline in seconds
        #[arg(long)]
        deadline_secs: Option<u64>,
    },

    /// Print the effective configuration as YAML
    Config,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON
    Json,
    /// Indented JSON
    Pretty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scrape_command() {
        let cli = Cli::parse_from([
            "review-scrape",
            "scrape",
            "https://www.lendingtree.com/reviews/business/ondeck/51886298",
            "--deadline-secs",
            "30",
            "--no-probe",
            "-f",
            "pretty",
        ]);

        assert_eq!(cli.format, OutputFormat::Pretty);
        match cli.command {
            Commands::Scrape {
                url,
                page_size,
                deadline_secs,
                no_probe,
                strict,
            } => {
                assert!(url.ends_with("/51886298"));
                assert_eq!(page_size, None);
                assert_eq!(deadline_secs, Some(30));
                assert!(no_probe);
                assert!(!strict);
            }
            other => panic!("Expected Scrape, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_serve_defaults() {
        let cli = Cli::parse_from(["review-scrape", "-c", "scraper.yaml", "serve"]);
        assert_eq!(cli.config, Some(PathBuf::from("scraper.yaml")));
        assert!(matches!(
            cli.command,
            Commands::Serve {
                port: 5000,
                deadline_secs: None
            }
        ));
    }
}
