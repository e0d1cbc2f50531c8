//! Network seams. Production code uses the hickory-backed implementations in
//! [`crate::services`]; tests substitute in-memory mocks.

use std::net::IpAddr;

use async_trait::async_trait;

use crate::error::ToolboxResult;
use crate::types::ProbeResult;

/// Query one hostname against one explicit resolver server.
#[async_trait]
pub trait ResolverProbe: Send + Sync {
    /// Never fails: every error is reported through the returned
    /// [`ProbeResult`] so one bad server cannot abort a sweep.
    async fn probe(&self, hostname: &str, server: IpAddr) -> ProbeResult;
}

/// Resolve a hostname with the host's own resolver configuration.
#[async_trait]
pub trait AmbientResolver: Send + Sync {
    /// Returns at least one address, or an error describing why the host
    /// cannot resolve the name through its normal network path.
    async fn resolve(&self, hostname: &str) -> ToolboxResult<Vec<IpAddr>>;
}
