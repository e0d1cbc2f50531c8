//! Service façade exposing all discovery operations.

mod default_check;
mod discovery;
mod probe;
mod registry;
mod resolver;
mod route_plan;

use std::collections::BTreeSet;
use std::net::IpAddr;
use std::sync::Arc;

use crate::error::{ToolboxError, ToolboxResult};
use crate::traits::{AmbientResolver, ResolverProbe};
use crate::types::{DiscoveryReport, OsFamily, Provider, ProviderProbe, RoutePlan};

pub use default_check::SystemResolver;
pub use discovery::{DiscoveryOptions, EndpointDiscovery, DEFAULT_CONCURRENCY};
pub use probe::{HickoryProbe, DEFAULT_PROBE_TIMEOUT};
pub use registry::ProviderRegistry;
pub use route_plan::{plan_routes, TraceTemplate};

/// Validate and normalise a hostname input.
///
/// Trims whitespace, converts internationalised domain names (IDN) to ASCII
/// via IDNA 2008, and rejects empty or overlong inputs. IP literals and
/// `localhost` names are rejected too: the resolver answers those itself, so
/// no server would ever be asked.
pub fn validate_domain(domain: &str) -> ToolboxResult<String> {
    let domain = domain.trim();
    if domain.is_empty() {
        return Err(ToolboxError::ValidationError(
            "Domain name is required".to_string(),
        ));
    }
    if domain.parse::<IpAddr>().is_ok() {
        return Err(ToolboxError::ValidationError(format!(
            "Expected a hostname, got the IP address {domain}"
        )));
    }
    // IDNA processing: converts Unicode labels to Punycode and validates.
    let ascii_domain = idna::domain_to_ascii_strict(domain)
        .map_err(|_| ToolboxError::ValidationError(format!("Invalid domain name: {domain}")))?;
    if ascii_domain.len() > 253 {
        return Err(ToolboxError::ValidationError(format!(
            "Domain name exceeds maximum length of 253 characters (got {})",
            ascii_domain.len()
        )));
    }
    let bare = ascii_domain.trim_end_matches('.');
    if bare == "localhost" || bare.ends_with(".localhost") {
        return Err(ToolboxError::ValidationError(format!(
            "{ascii_domain} is a loopback name"
        )));
    }
    Ok(ascii_domain)
}

/// Entry point for endpoint discovery and route planning.
///
/// ```rust,no_run
/// use endpoint_scout_toolbox::{DiscoveryOptions, EndpointService, ProviderRegistry};
/// # async fn demo() -> endpoint_scout_toolbox::ToolboxResult<()> {
/// let service = EndpointService::new(ProviderRegistry::bundled()?, DiscoveryOptions::default());
/// service.check_default("example.com").await?;
/// let report = service.discover("example.com").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct EndpointService {
    discovery: EndpointDiscovery,
    ambient: Arc<dyn AmbientResolver>,
}

impl EndpointService {
    /// Service backed by hickory-resolver and the system DNS configuration.
    pub fn new(registry: ProviderRegistry, options: DiscoveryOptions) -> Self {
        Self::with_resolvers(
            Arc::new(registry),
            Arc::new(HickoryProbe::new(options.probe_timeout)),
            Arc::new(SystemResolver),
            options,
        )
    }

    /// Service with explicit resolver implementations.
    pub fn with_resolvers(
        registry: Arc<ProviderRegistry>,
        probe: Arc<dyn ResolverProbe>,
        ambient: Arc<dyn AmbientResolver>,
        options: DiscoveryOptions,
    ) -> Self {
        Self {
            discovery: EndpointDiscovery::new(registry, probe, options),
            ambient,
        }
    }

    /// Configured providers, in registry order.
    pub fn providers(&self) -> &[Provider] {
        self.discovery.registry().providers()
    }

    pub fn registry(&self) -> &ProviderRegistry {
        self.discovery.registry()
    }

    /// Resolve `domain` through the host's own resolver.
    ///
    /// Fails when the host cannot resolve the domain at all.
    pub async fn check_default(&self, domain: &str) -> ToolboxResult<Vec<IpAddr>> {
        let domain = validate_domain(domain)?;
        default_check::check_default(self.ambient.as_ref(), &domain).await
    }

    /// Sweep every provider's servers for `domain`.
    ///
    /// Only input validation can fail; probe failures degrade the report.
    pub async fn discover(&self, domain: &str) -> ToolboxResult<DiscoveryReport> {
        let domain = validate_domain(domain)?;
        Ok(self.discovery.discover(&domain).await)
    }

    /// Sweep and also return per-server results in registry order.
    pub async fn discover_detailed(
        &self,
        domain: &str,
    ) -> ToolboxResult<(DiscoveryReport, Vec<ProviderProbe>)> {
        let domain = validate_domain(domain)?;
        Ok(self.discovery.discover_detailed(&domain).await)
    }

    /// Trace commands for a set of endpoints.
    pub fn plan_routes(endpoints: &BTreeSet<IpAddr>, os_family: OsFamily) -> RoutePlan {
        route_plan::plan_routes(endpoints, os_family)
    }
}
