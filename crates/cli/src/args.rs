//! Command-line surface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use registrar::DomainName;

/// Manage Infomaniak domains and nameservers via the Infomaniak API.
#[derive(Debug, Parser)]
#[command(name = "informaniak", version, about = "Manage Infomaniak domains")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Flags accepted before or after any subcommand.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// Config file (default $HOME/.informaniak.yaml, then ./.informaniak.yaml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Infomaniak API token
    #[arg(long, global = true, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Infomaniak account ID
    #[arg(long, global = true, value_name = "ID")]
    pub account_id: Option<String>,

    /// API base URL
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Log filter, e.g. `debug` or `infomaniak_api=trace` (overrides RUST_LOG)
    #[arg(long, global = true, value_name = "FILTER")]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Human)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Human,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage domains
    #[command(subcommand)]
    Domains(DomainsCommand),
}

#[derive(Debug, Subcommand)]
pub enum DomainsCommand {
    /// List all domains for an account
    List,

    /// Show details for a domain
    Show {
        domain: DomainName,
    },

    /// Update nameservers for a domain
    UpdateNs {
        domain: DomainName,

        /// Comma-separated list of nameservers, in order
        #[arg(long, value_delimiter = ',', num_args = 1.., required = true)]
        nameservers: Vec<String>,

        /// Verify nameserver availability before applying
        #[arg(long)]
        verify: bool,
    },
}
