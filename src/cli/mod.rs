//! CLI command definitions and parsing
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "txtsift",
    version,
    about = "Filter health-domain sentences out of extracted document text",
    long_about = "txtsift runs text through four filtering stages (noise removal, domain \
                  relevance, completeness analysis and complete-thought validation) and keeps \
                  only self-contained sentences that are relevant to the health domain."
)]
pub struct Cli {
    /// Global config file path (defaults to ~/.config/txtsift/config.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Filter a text file, or every .txt file in a directory
    Process {
        /// Input file or directory
        input: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Comma-separated stages to run, in order (e.g. "noise,relevance")
        #[arg(short, long)]
        stages: Option<String>,

        /// Threshold preset or config profile (strict, lenient, fast, accurate)
        #[arg(short, long)]
        preset: Option<String>,

        /// Output format
        #[arg(
            short,
            long,
            value_parser = ["text", "txt", "json", "markdown", "md", "csv", "html", "htm"]
        )]
        format: Option<String>,

        /// Minimum domain relevance score
        #[arg(long, value_name = "X")]
        health_threshold: Option<f32>,

        /// Minimum completeness score
        #[arg(long, value_name = "X")]
        completeness_threshold: Option<f32>,

        /// Minimum composite quality score
        #[arg(long, value_name = "X")]
        quality_threshold: Option<f32>,

        /// Omit per-stage statistics from markdown and HTML output
        #[arg(long)]
        no_statistics: bool,
    },

    /// List the filtering stages
    Stages,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Validate configuration file
    Validate {
        /// Path to config file (defaults to standard location)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Initialize default configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
