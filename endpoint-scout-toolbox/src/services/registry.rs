//! Provider registry: the ordered battery of public resolvers to sweep.

use std::collections::HashSet;
use std::fmt;
use std::net::IpAddr;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ToolboxError, ToolboxResult};
use crate::types::Provider;

/// Embedded default registry (provider → server addresses).
const PUBLIC_DNS_SERVERS: &str = include_str!("public_dns_servers.json");

/// Immutable, validated mapping of provider name to resolver servers.
///
/// Registry order is the order providers appear in the source mapping, and it
/// fixes the order in which servers are queried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRegistry {
    providers: Vec<Provider>,
}

impl ProviderRegistry {
    /// Build a registry, rejecting an empty list and blank or repeated names.
    pub fn new(providers: Vec<Provider>) -> ToolboxResult<Self> {
        if providers.is_empty() {
            return Err(ToolboxError::ConfigError(
                "Provider registry is empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for provider in &providers {
            if provider.name.trim().is_empty() {
                return Err(ToolboxError::ConfigError(
                    "Provider name must not be blank".to_string(),
                ));
            }
            if !seen.insert(provider.name.as_str()) {
                return Err(ToolboxError::ConfigError(format!(
                    "Duplicate provider: {}",
                    provider.name
                )));
            }
        }

        Ok(Self { providers })
    }

    /// Registry shipped with the crate.
    pub fn bundled() -> ToolboxResult<Self> {
        Self::from_json(PUBLIC_DNS_SERVERS)
    }

    /// Parse a JSON object of `provider name → [server address, ...]`.
    pub fn from_json(json: &str) -> ToolboxResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| ToolboxError::ConfigError(format!("Invalid provider registry: {e}")))
    }

    /// All providers, in registry order.
    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    /// Number of servers across all providers.
    pub fn server_count(&self) -> usize {
        self.providers.iter().map(|p| p.servers.len()).sum()
    }

    /// Flattened `(provider, server)` pairs in registry order.
    pub fn targets(&self) -> impl Iterator<Item = (&str, IpAddr)> {
        self.providers
            .iter()
            .flat_map(|p| p.servers.iter().map(move |s| (p.name.as_str(), *s)))
    }
}

impl Serialize for ProviderRegistry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.providers.len()))?;
        for provider in &self.providers {
            map.serialize_entry(&provider.name, &provider.servers)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ProviderRegistry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RegistryVisitor;

        impl<'de> Visitor<'de> for RegistryVisitor {
            type Value = Vec<Provider>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of provider name to resolver addresses")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut providers = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, servers)) = map.next_entry::<String, Vec<IpAddr>>()? {
                    providers.push(Provider { name, servers });
                }
                Ok(providers)
            }
        }

        // Visit entries one by one so source order survives.
        let providers = deserializer.deserialize_map(RegistryVisitor)?;
        Self::new(providers).map_err(de::Error::custom)
    }
}
