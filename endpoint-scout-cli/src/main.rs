//! endpoint-scout entry point
//!
//! Finds every network endpoint a storefront domain resolves to across a
//! battery of public DNS providers and prints diagnostic traceroute commands
//! for them.

mod cli;
mod commands;
mod config;
mod logging;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod test_mocks;

use std::io;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use endpoint_scout_toolbox::{EndpointService, ProviderRegistry};

use cli::{Cli, Commands};
use config::AppConfig;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logging comes first so a bad config file is reported through it.
    let loaded = AppConfig::load(cli.config.as_deref());
    let log_dir = cli.log_dir.clone().unwrap_or_else(|| {
        loaded
            .as_ref()
            .map_or_else(|_| AppConfig::default().log_dir, |c| c.log_dir.clone())
    });
    logging::init(&log_dir, cli.quiet);

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::FAILURE;
        }
    };

    let service = match build_service(&cli, &config) {
        Ok(service) => service,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::FAILURE;
        }
    };

    tokio::select! {
        result = run(cli.command, &service) => match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                tracing::error!("{e:#}");
                ExitCode::FAILURE
            }
        },
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Caught the interrupt signal.  Exiting.");
            ExitCode::SUCCESS
        }
    }
}

/// Validate the registry and apply command-line overrides.
fn build_service(cli: &Cli, config: &AppConfig) -> Result<EndpointService> {
    let registry: ProviderRegistry = config.registry()?;

    let mut options = config.discovery_options();
    if let Some(concurrency) = cli.concurrency {
        options.concurrency = concurrency.max(1);
    }
    if let Some(secs) = cli.timeout {
        options.probe_timeout = Duration::from_secs(secs.max(1));
    }

    tracing::debug!(
        "Loaded {} provider(s) with {} server(s); concurrency {}, probe timeout {:?}",
        registry.providers().len(),
        registry.server_count(),
        options.concurrency,
        options.probe_timeout
    );

    Ok(EndpointService::new(registry, options))
}

async fn run(command: Commands, service: &EndpointService) -> Result<()> {
    let mut out = io::stdout();
    match command {
        Commands::FindEndpoints { target, verbose } => {
            commands::find_endpoints(service, &target, verbose, &mut out).await
        }
        Commands::ShowTraceroutes { target, os } => {
            commands::show_traceroutes(service, &target, os, &mut out).await
        }
        Commands::ListProviders { json } => commands::list_providers(service, json, &mut out),
    }
}
