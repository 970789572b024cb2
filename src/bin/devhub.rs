//! Command-line host for the DevHub service registry.
//!
//! Usage:
//!
//! ```text
//! devhub [--settings <path>] <command>
//! ```
//!
//! Commands:
//!
//! - `list`: print every registered service with its status
//! - `overview`: print service counts per status
//! - `check <id>`: connect one service with credentials from the
//!   environment (`GITHUB_TOKEN`, `STRIPE_API_KEY`, ...) and print the
//!   outcome and tool catalog
//! - `sync-cline`: connect every service whose environment credentials are
//!   present and export the connected ones to the Cline settings file
//!
//! Every command activates the registry, runs, then deactivates it.

use camino::Utf8PathBuf;
use devhub::host::{DevHub, HostError};
use devhub::service_registry::{
    adapters::EnvCredentialSource,
    domain::{ServiceDomainError, ServiceId},
    services::{ClineSyncError, ConnectOutcome, ServiceRegistryError},
};
use devhub::settings::{DevHubSettings, SettingsError};
use devhub::telemetry;
use std::env;
use std::io::{self, Write};
use thiserror::Error;
use tokio::runtime::Builder;
use tracing::debug;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
enum CliError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Host(#[from] HostError),
    #[error(transparent)]
    Domain(#[from] ServiceDomainError),
    #[error(transparent)]
    Registry(#[from] ServiceRegistryError),
    #[error(transparent)]
    Sync(#[from] ClineSyncError),
    #[error("runtime init failed: {0}")]
    RuntimeInit(#[source] io::Error),
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    List,
    Overview,
    Check(String),
    SyncCline,
}

#[derive(Debug, PartialEq, Eq)]
struct Invocation {
    settings_path: Option<Utf8PathBuf>,
    command: Command,
}

const USAGE: &str = "usage: devhub [--settings <path>] <list|overview|check <id>|sync-cline>";

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Invocation, CliError> {
    let mut settings_path = None;
    let mut positional = Vec::new();
    while let Some(arg) = args.next() {
        if arg == "--settings" {
            let path = args
                .next()
                .ok_or_else(|| CliError::InvalidArgs("--settings requires a path".to_owned()))?;
            settings_path = Some(Utf8PathBuf::from(path));
        } else {
            positional.push(arg);
        }
    }

    let mut words = positional.into_iter();
    let command = match (words.next().as_deref(), words.next()) {
        (Some("list"), None) => Command::List,
        (Some("overview"), None) => Command::Overview,
        (Some("check"), Some(id)) => Command::Check(id),
        (Some("sync-cline"), None) => Command::SyncCline,
        _ => return Err(CliError::InvalidArgs(USAGE.to_owned())),
    };
    if words.next().is_some() {
        return Err(CliError::InvalidArgs(USAGE.to_owned()));
    }
    Ok(Invocation {
        settings_path,
        command,
    })
}

fn load_settings(path: Option<&Utf8PathBuf>) -> Result<DevHubSettings, CliError> {
    let base = path
        .map(|file| DevHubSettings::load(file))
        .transpose()?
        .unwrap_or_default();
    Ok(base.with_env())
}

fn main() -> Result<(), BoxError> {
    if !telemetry::init() {
        debug!("tracing subscriber already installed");
    }
    let invocation = parse_args(env::args().skip(1))?;
    let settings = load_settings(invocation.settings_path.as_ref())?;
    let runtime = Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::RuntimeInit)?;
    runtime.block_on(run(settings, invocation.command))?;
    Ok(())
}

async fn run(settings: DevHubSettings, command: Command) -> Result<(), CliError> {
    let host = DevHub::activate(settings).await?;
    let result = execute(&host, &command).await;
    host.deactivate().await;
    result
}

async fn execute(host: &DevHub, command: &Command) -> Result<(), CliError> {
    let registry = host.registry();
    let mut out = io::stdout().lock();
    match command {
        Command::List => {
            for service in registry.list_services() {
                writeln!(
                    out,
                    "{:<20} {:<22} {:<12} {}",
                    service.id().as_str(),
                    service.name().as_str(),
                    service.status().as_str(),
                    service.last_error().unwrap_or("")
                )?;
            }
        }
        Command::Overview => {
            let overview = registry.overview();
            writeln!(out, "total:        {}", overview.total)?;
            writeln!(out, "connected:    {}", overview.connected)?;
            writeln!(out, "connecting:   {}", overview.connecting)?;
            writeln!(out, "disconnected: {}", overview.disconnected)?;
            writeln!(out, "error:        {}", overview.error)?;
        }
        Command::Check(raw_id) => {
            let service_id = ServiceId::new(raw_id.as_str())?;
            let outcome = registry
                .connect_with(&service_id, &EnvCredentialSource::new())
                .await;
            writeln!(out, "{service_id}: {}", describe(&outcome))?;
            if outcome.is_connected() {
                for tool in registry.list_tools(&service_id)? {
                    writeln!(out, "  {:<28} {}", tool.name(), tool.description())?;
                }
            }
        }
        Command::SyncCline => {
            let sync = host.cline_sync()?;
            let outcomes = registry.connect_all(&EnvCredentialSource::new()).await;
            for (service_id, outcome) in outcomes
                .iter()
                .filter(|(_, outcome)| *outcome != ConnectOutcome::Declined)
            {
                writeln!(out, "{service_id}: {}", describe(outcome))?;
            }
            let exported = sync.sync_all_connected().await?;
            writeln!(out, "exported {exported} service(s) to {}", sync_target(host))?;
            for name in sync.exported_entries().await? {
                writeln!(out, "  {name}")?;
            }
        }
    }
    Ok(())
}

fn describe(outcome: &ConnectOutcome) -> String {
    match outcome {
        ConnectOutcome::Connected => "connected".to_owned(),
        ConnectOutcome::AlreadyConnected => "already connected".to_owned(),
        ConnectOutcome::Declined => "no credentials found".to_owned(),
        ConnectOutcome::Failed { message } => format!("failed: {message}"),
        ConnectOutcome::Busy => "busy".to_owned(),
        ConnectOutcome::UnknownService => "unknown service".to_owned(),
    }
}

fn sync_target(host: &DevHub) -> String {
    host.settings()
        .resolved_cline_settings()
        .map_or_else(|| "Cline settings".to_owned(), |file| file.path().to_string())
}
