//! informaniak CLI entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Parse arguments** with `clap`.
//! 2. **Wire observability**: a `tracing-subscriber` on stderr, plus an
//!    OpenTelemetry OTLP exporter when `OTEL_EXPORTER_OTLP_ENDPOINT` is set.
//! 3. **Resolve settings** from flags, the YAML config file and `INFOMANIAK_*`
//!    environment variables (see [`settings`]).
//! 4. **Construct the client** and hand it to the command handlers as a
//!    [`registrar::DomainRegistrar`].
//!
//! Any failure is printed to stderr with its full cause chain and the process
//! exits with status 1.

mod args;
mod commands;
mod output;
mod settings;
mod telemetry;

use std::process::ExitCode;

use clap::Parser;
use infomaniak_api::{ClientConfig, InfomaniakClient};
use registrar::RequestContext;
use tracing::Instrument;

use crate::args::{Cli, Command};
use crate::output::OutputFormat;
use crate::settings::{Settings, Sources};
use crate::telemetry::InvocationId;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let _telemetry = match telemetry::init(cli.global.log_level.as_deref(), cli.global.log_format)
    {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let invocation_id = InvocationId::new();
    let span = tracing::info_span!(
        "informaniak",
        invocation_id = %invocation_id,
        version = env!("CARGO_PKG_VERSION")
    );

    match run(cli).instrument(span).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = format!("{e:#}"), "command failed");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = Settings::resolve(&cli.global, &Sources::from_process())?;
    tracing::debug!(config_file = ?settings.config_file(), ?settings, "settings resolved");

    let mut config = ClientConfig::new(settings.token()?).with_timeout(settings.timeout());
    if let Some(base_url) = settings.base_url() {
        config = config.with_base_url(base_url);
    }
    let client = InfomaniakClient::new(config)?;

    let ctx = RequestContext::background().with_timeout(settings.timeout());
    let format = OutputFormat::from_json_flag(cli.global.json);
    let mut stdout = std::io::stdout().lock();

    match &cli.command {
        Command::Domains(command) => {
            commands::run_domains(command, &settings, &client, &ctx, format, &mut stdout).await
        }
    }
}
