//! Multi-provider DNS endpoint discovery.
//!
//! Resolves a hostname through a battery of public resolvers, merges every
//! answer into one deduplicated endpoint set, and derives traceroute commands
//! for each endpoint. Network access sits behind the [`ResolverProbe`] and
//! [`AmbientResolver`] traits.

mod error;
mod services;
mod traits;
mod types;

#[cfg(test)]
mod test_utils;

pub use error::{ToolboxError, ToolboxResult};
pub use services::{
    plan_routes, validate_domain, DiscoveryOptions, EndpointDiscovery, EndpointService,
    HickoryProbe, ProviderRegistry, SystemResolver, TraceTemplate, DEFAULT_CONCURRENCY,
    DEFAULT_PROBE_TIMEOUT,
};
pub use traits::{AmbientResolver, ResolverProbe};
pub use types::{
    DiscoveryReport, OsFamily, ProbeOutcome, ProbeResult, Provider, ProviderProbe, RoutePlan,
    RouteStep,
};
