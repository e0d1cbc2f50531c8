//! Subcommand implementations. Results go to `out`; progress goes to the log.

use std::io::Write;
use std::net::IpAddr;

use anyhow::{bail, Context, Result};
use endpoint_scout_toolbox::{
    DiscoveryReport, EndpointService, OsFamily, ProbeOutcome, ProviderProbe,
};
use serde::Serialize;

use crate::cli::DomainArgs;

/// JSON shape of `find-endpoints --json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FindEndpointsOutput {
    default_resolver: Vec<IpAddr>,
    report: DiscoveryReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    probes: Option<Vec<ProviderProbe>>,
}

fn require_domain<'a>(target: &'a DomainArgs, hint: &str) -> Result<&'a str> {
    match target.domain.as_deref().map(str::trim) {
        Some(domain) if !domain.is_empty() => Ok(domain),
        _ => bail!("{hint}"),
    }
}

/// Default-resolver check, then the full sweep.
pub async fn find_endpoints(
    service: &EndpointService,
    target: &DomainArgs,
    verbose: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let domain = require_domain(
        target,
        "You must specify a domain to resolve for endpoints with --domain.",
    )?;

    tracing::info!("Attempting to resolve '{domain}'");
    let local = service
        .check_default(domain)
        .await
        .context("Default resolver check failed")?;

    let (report, probes) = service.discover_detailed(domain).await?;
    if report.is_empty() {
        tracing::warn!("No resolver answered for {domain}; there is no endpoint data");
    }

    if target.json {
        let output = FindEndpointsOutput {
            default_resolver: local,
            report,
            probes: verbose.then_some(probes),
        };
        serde_json::to_writer_pretty(&mut *out, &output)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "Default resolver: {} -> {}", report.domain, join(&local))?;
    if verbose {
        for probe in &probes {
            writeln!(out, "{}", describe_probe(probe))?;
        }
    }
    writeln!(
        out,
        "{} resolves to at least {} distinct IP addresses across {} lookups:",
        report.domain,
        report.distinct_endpoints(),
        report.resolution_count
    )?;
    for endpoint in &report.endpoints {
        writeln!(out, " {endpoint}")?;
    }
    Ok(())
}

/// Sweep, then one trace command per endpoint.
pub async fn show_traceroutes(
    service: &EndpointService,
    target: &DomainArgs,
    os: Option<OsFamily>,
    out: &mut dyn Write,
) -> Result<()> {
    let domain = require_domain(
        target,
        "You must specify a domain to test routes using --domain.",
    )?;

    let report = service.discover(domain).await?;
    let plan = EndpointService::plan_routes(&report.endpoints, os.unwrap_or_else(OsFamily::current));
    if plan.is_empty() {
        tracing::warn!("No endpoints discovered for {domain}; nothing to trace");
    }

    if target.json {
        serde_json::to_writer_pretty(&mut *out, &plan)?;
        writeln!(out)?;
    } else {
        for step in &plan.steps {
            writeln!(out, " {}", step.command)?;
        }
    }
    Ok(())
}

pub fn list_providers(service: &EndpointService, json: bool, out: &mut dyn Write) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, service.registry())?;
        writeln!(out)?;
        return Ok(());
    }

    for provider in service.providers() {
        let servers: Vec<String> = provider.servers.iter().map(ToString::to_string).collect();
        writeln!(out, "{}: {}", provider.name, servers.join(", "))?;
    }
    Ok(())
}

fn join(addresses: &[IpAddr]) -> String {
    addresses
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn describe_probe(probe: &ProviderProbe) -> String {
    let result = &probe.result;
    let status = match &result.outcome {
        ProbeOutcome::Resolved { addresses } if addresses.is_empty() => "no records".to_string(),
        ProbeOutcome::Resolved { addresses } => {
            let addresses: Vec<IpAddr> = addresses.iter().copied().collect();
            join(&addresses)
        }
        ProbeOutcome::Timeout => "timed out".to_string(),
        ProbeOutcome::Failed { error } => format!("failed: {error}"),
    };
    format!(
        "  [{}] {} ({}ms): {status}",
        probe.provider, result.server, result.response_time_ms
    )
}
