//! Endpoint aggregation across every server of every provider.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::stream::{self, StreamExt};
use tokio::time::timeout;

use crate::traits::ResolverProbe;
use crate::types::{DiscoveryReport, ProbeOutcome, ProbeResult, ProviderProbe};

use super::probe::DEFAULT_PROBE_TIMEOUT;
use super::registry::ProviderRegistry;

/// Probes in flight at once when not configured.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Tuning for a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveryOptions {
    /// Maximum probes in flight. `1` gives a strictly sequential sweep.
    pub concurrency: usize,
    /// Upper bound on a single probe; a probe exceeding it counts as timed out.
    pub probe_timeout: Duration,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }
}

/// Fans a [`ResolverProbe`] out over a [`ProviderRegistry`].
#[derive(Clone)]
pub struct EndpointDiscovery {
    registry: Arc<ProviderRegistry>,
    probe: Arc<dyn ResolverProbe>,
    options: DiscoveryOptions,
}

impl EndpointDiscovery {
    pub fn new(
        registry: Arc<ProviderRegistry>,
        probe: Arc<dyn ResolverProbe>,
        options: DiscoveryOptions,
    ) -> Self {
        Self {
            registry,
            probe,
            options,
        }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn options(&self) -> DiscoveryOptions {
        self.options
    }

    /// Sweep every configured server once and merge the answers.
    ///
    /// Cannot fail: if every probe fails the report is empty with a zero
    /// resolution count.
    pub async fn discover(&self, hostname: &str) -> DiscoveryReport {
        self.discover_detailed(hostname).await.0
    }

    /// Like [`discover`](Self::discover), also returning each probe result in
    /// registry order.
    pub async fn discover_detailed(&self, hostname: &str) -> (DiscoveryReport, Vec<ProviderProbe>) {
        let start_time = Instant::now();
        let concurrency = self.options.concurrency.max(1);

        log::info!(
            "Resolving '{hostname}' via {} server(s) from {} provider(s)",
            self.registry.server_count(),
            self.registry.providers().len()
        );

        // Targets are started in registry order; `buffered` yields results in
        // the same order regardless of completion order.
        let mut current: Option<&str> = None;
        let targets = self.registry.targets().inspect(move |(provider, _)| {
            if current != Some(*provider) {
                log::info!("Testing {provider}");
                current = Some(*provider);
            }
        });

        let results: Vec<ProviderProbe> = stream::iter(targets)
            .map(|(provider, server)| self.probe_one(hostname, provider, server))
            .buffered(concurrency)
            .collect()
            .await;

        let mut report = aggregate(hostname, &results);

        // u128 -> u64: elapsed millis for a sweep will never exceed u64::MAX
        #[allow(clippy::cast_possible_truncation)]
        let total_time_ms = start_time.elapsed().as_millis() as u64;
        report.total_time_ms = total_time_ms;

        log::info!(
            "{hostname} resolves to at least {} distinct IP addresses across {} lookups ({} failed, {}ms)",
            report.distinct_endpoints(),
            report.resolution_count,
            report.failed_probes,
            report.total_time_ms
        );

        (report, results)
    }

    async fn probe_one(&self, hostname: &str, provider: &str, server: IpAddr) -> ProviderProbe {
        let query_start = Instant::now();
        let result = match timeout(self.options.probe_timeout, self.probe.probe(hostname, server)).await
        {
            Ok(result) => result,
            Err(_) => {
                // u128 -> u64: bounded by the probe timeout
                #[allow(clippy::cast_possible_truncation)]
                let response_time_ms = query_start.elapsed().as_millis() as u64;
                ProbeResult {
                    server,
                    outcome: ProbeOutcome::Timeout,
                    response_time_ms,
                }
            }
        };

        log::debug!("{}", describe_probe(provider, hostname, &result));

        ProviderProbe {
            provider: provider.to_string(),
            result,
        }
    }
}

/// One line per probe: provider, server, outcome and elapsed time.
fn describe_probe(provider: &str, hostname: &str, result: &ProbeResult) -> String {
    let server = result.server;
    let elapsed = result.response_time_ms;
    match &result.outcome {
        ProbeOutcome::Resolved { addresses } => format!(
            "[{provider}] {hostname} via {server}: {} address(es) in {elapsed}ms",
            addresses.len()
        ),
        ProbeOutcome::Timeout => {
            format!("[{provider}] {hostname} via {server}: timed out after {elapsed}ms")
        }
        ProbeOutcome::Failed { error } => {
            format!("[{provider}] {hostname} via {server}: failed after {elapsed}ms: {error}")
        }
    }
}

/// Fold probe results into a report.
///
/// Set union and counting are both order-independent, so any permutation of
/// `results` yields the same endpoints and counts.
pub(crate) fn aggregate(domain: &str, results: &[ProviderProbe]) -> DiscoveryReport {
    let mut report = DiscoveryReport {
        domain: domain.to_string(),
        ..DiscoveryReport::default()
    };

    for ProviderProbe { provider, result } in results {
        match &result.outcome {
            ProbeOutcome::Resolved { addresses } => {
                // One per answering server, however many addresses it returned.
                report.resolution_count += 1;
                for address in addresses {
                    log::debug!("{domain} resolves to {address} via {}", result.server);
                    report.endpoints.insert(*address);
                }
            }
            ProbeOutcome::Timeout | ProbeOutcome::Failed { .. } => {
                report.failed_probes += 1;
                log::warn!(
                    "Unable to resolve using {provider} server {} due to: {}",
                    result.server,
                    result.error().unwrap_or_default()
                );
            }
        }
    }

    report
}
