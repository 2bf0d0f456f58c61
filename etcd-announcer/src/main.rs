//! Announce a service in etcd.
//!
//! `etcd-announcer -service riak -msg foo` writes the key `/service/riak`
//! with content `foo`.
//!
//! `etcd-announcer -path /service/riak -service riak-1 -type net -if eth0`
//! announces the IP address of interface `eth0` in the key
//! `/service/riak/riak-1`.
//!
//! Every announcement carries a TTL (30 seconds by default) and is refreshed
//! every TTL/2 seconds, so the key disappears once the announcer stops.

mod announcer;
mod cli;
mod config;
mod error;
mod net;
mod scheduler;
mod store;

use std::process::ExitCode;
use std::sync::Arc;
use anyhow::{Context, Result};
use clap::error::ErrorKind;
use tokio_util::sync::CancellationToken;
use crate::announcer::Announcer;
use crate::cli::{Cli, USAGE};
use crate::config::{AnnounceConfig, AnnounceMode, FileConfig};
use crate::error::AnnounceError;
use crate::net::resolver::{InterfaceSource, SystemInterfaces};
use crate::store::etcd::EtcdClient;
use crate::store::KeyValueStore;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse_normalized(std::env::args_os()) {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            eprint!("{}", e);
            eprintln!("{}", USAGE);
            return ExitCode::FAILURE;
        }
    };

    // stdout carries only the announce confirmations
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(cli.log_directive())),
        )
        .init();

    let (code, message) = exit_status(run(cli).await);
    if let Some(message) = message {
        eprintln!("{}", message);
    }
    ExitCode::from(code)
}

/// Exit code for the outcome of `run`, plus the text to print on failure.
/// Validation failures are followed by the usage text.
fn exit_status(result: Result<()>) -> (u8, Option<String>) {
    match result {
        Ok(()) => (0, None),
        Err(e) => {
            let message = match e.downcast_ref::<AnnounceError>() {
                Some(err) if err.is_usage() => format!("{}\n{}", err, USAGE),
                _ => format!("An error occurred: {:#}", e),
            };
            (1, Some(message))
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let file = match &cli.config {
        Some(path) => {
            let file = FileConfig::load(path)?;
            tracing::info!("Loaded config from {}", path.display());
            file
        }
        None => FileConfig::default(),
    };

    let config = AnnounceConfig::from_sources(&cli, file.announce)?;
    startup_diagnostics(&config);

    // A write never outlives the tick that issued it
    let store = EtcdClient::new(&config.etcd_addr, config.tick_interval())?;

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Shutdown signal received");
                signal_cancel.cancel();
            }
            Err(e) => tracing::error!("Failed to listen for ctrl-c: {}", e),
        }
    });

    bootstrap(&config, store, SystemInterfaces, cancel).await?;

    tracing::info!("Stopped announcing {}", config.key());
    Ok(())
}

/// Announce once in the foreground, then keep re-announcing in the background
/// until an announce fails or `cancel` fires. An announce still in flight at
/// cancellation is waited for, and its failure is returned.
async fn bootstrap<S, I>(
    config: &AnnounceConfig,
    store: S,
    interfaces: I,
    cancel: CancellationToken,
) -> Result<()>
where
    S: KeyValueStore + 'static,
    I: InterfaceSource + 'static,
{
    let announcer = Arc::new(Announcer::new(config, store, interfaces));

    // A broken setup fails here, before anything runs in the background
    announcer.announce_once().await?;

    let scheduler_announcer = announcer.clone();
    let scheduler_handle = tokio::spawn(scheduler::run(
        config.tick_interval(),
        move || {
            let announcer = scheduler_announcer.clone();
            async move { announcer.announce_once().await.map(|_| ()) }
        },
        cancel,
    ));

    scheduler_handle.await.context("Scheduler task panicked")??;
    Ok(())
}

fn startup_diagnostics(config: &AnnounceConfig) {
    tracing::info!("etcd-announcer v{} starting", env!("CARGO_PKG_VERSION"));

    match hostname::get() {
        Ok(h) => tracing::info!("Hostname: {}", h.to_string_lossy()),
        Err(e) => tracing::warn!(error = %e, "Could not determine hostname"),
    }

    match &config.mode {
        AnnounceMode::Message(msg) => tracing::info!("Announcing message {:?} as {}", msg, config.key()),
        AnnounceMode::Network { interface } => {
            tracing::info!("Announcing address of {} as {}", interface, config.key())
        }
    }
    tracing::info!("etcd peer {} with TTL {}s", config.etcd_addr, config.ttl);
}
