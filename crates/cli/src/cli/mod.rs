//! Command-line interface definition

pub mod commands;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use sigflow_dialog_core::analysis::DEFAULT_PAGE_LIMIT;
use sigflow_infra_common::logging::{LoggingConfig, log_welcome, parse_log_level, setup_logging};

use crate::config::AppConfig;

/// Correlate TCAP dialogues in decoded GSM MAP / CAP traces
#[derive(Debug, Parser)]
#[command(name = "sigflow", version, about, long_about = None)]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true, env = "SIGFLOW_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Trace inputs shared by every query command
#[derive(Debug, Clone, Args)]
pub struct TraceArgs {
    /// Decoded or tshark `-T json` exports; each is stored under its file stem
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Trace to query, defaults to the last file given
    #[arg(short, long)]
    pub trace: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Per-OTID dialogue transcripts
    Flows {
        #[command(flatten)]
        input: TraceArgs,
    },

    /// Invokes without a response or answered with an error
    Unanswered {
        /// Also report errors that match no pending invoke
        #[arg(long)]
        orphan_errors: bool,

        #[command(flatten)]
        input: TraceArgs,
    },

    /// Protocol and operation distributions
    Stats {
        #[command(flatten)]
        input: TraceArgs,
    },

    /// Case-insensitive free-text search
    Search {
        query: String,

        #[command(flatten)]
        input: TraceArgs,
    },

    /// Filtered, paged packet listing
    Packets {
        /// Keep packets containing this protocol
        #[arg(long)]
        proto: Option<String>,

        /// Keep packets matching this text
        #[arg(long)]
        search: Option<String>,

        #[arg(long, default_value_t = 0)]
        offset: usize,

        #[arg(long, default_value_t = DEFAULT_PAGE_LIMIT)]
        limit: usize,

        #[command(flatten)]
        input: TraceArgs,
    },

    /// Full detail of one frame
    Packet {
        frame: u64,

        #[command(flatten)]
        input: TraceArgs,
    },

    /// Print the effective configuration as TOML
    Config,
}

impl Cli {
    /// Resolve configuration, install logging and run the command, printing its output
    pub async fn execute(self) -> anyhow::Result<()> {
        let config = self.resolve_config()?;
        init_logging(&config)?;
        log_welcome("sigflow", env!("CARGO_PKG_VERSION"));

        let output = commands::run(self.command, &config).await?;
        println!("{}", output);
        Ok(())
    }

    /// File and environment configuration with command-line overrides applied
    pub fn resolve_config(&self) -> anyhow::Result<AppConfig> {
        let config = AppConfig::load(self.config.as_deref())?;
        Ok(self.apply_overrides(config))
    }

    fn apply_overrides(&self, mut config: AppConfig) -> AppConfig {
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if self.json_logs {
            config.json_logs = true;
        }
        config
    }
}

fn init_logging(config: &AppConfig) -> anyhow::Result<()> {
    let level = parse_log_level(&config.log_level)?;
    let mut logging = LoggingConfig::new(level, "sigflow");
    if config.json_logs {
        logging = logging.with_json();
    }
    setup_logging(logging).context("failed to initialise logging")
}
