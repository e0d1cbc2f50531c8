//! Sanity check through the host's own resolver configuration.

use std::net::IpAddr;

use async_trait::async_trait;

use crate::error::{ToolboxError, ToolboxResult};
use crate::traits::AmbientResolver;

use super::resolver::{DEFAULT_RESOLVER, SYSTEM_DNS_LABEL};

/// [`AmbientResolver`] using the system DNS configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

#[async_trait]
impl AmbientResolver for SystemResolver {
    async fn resolve(&self, hostname: &str) -> ToolboxResult<Vec<IpAddr>> {
        let lookup = DEFAULT_RESOLVER.lookup_ip(hostname).await.map_err(|e| {
            ToolboxError::NetworkError(format!(
                "Failed to use local resolver ({}) due to: {e}",
                *SYSTEM_DNS_LABEL
            ))
        })?;
        Ok(lookup.iter().collect())
    }
}

/// Resolve `hostname` with the ambient resolver.
///
/// An empty answer is treated like a failure: the host cannot reach the
/// domain through its normal network path, so a sweep would tell us nothing.
pub(crate) async fn check_default(
    resolver: &dyn AmbientResolver,
    hostname: &str,
) -> ToolboxResult<Vec<IpAddr>> {
    let addresses = resolver.resolve(hostname).await?;
    if addresses.is_empty() {
        return Err(ToolboxError::NetworkError(format!(
            "Local resolver returned no addresses for {hostname}"
        )));
    }
    for address in &addresses {
        log::info!("Your computer resolves {hostname} to {address}");
    }
    Ok(addresses)
}
