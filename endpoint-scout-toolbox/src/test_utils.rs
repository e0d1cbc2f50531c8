//! 测试辅助模块
//!
//! Scripted resolver mocks and registry factories.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{ToolboxError, ToolboxResult};
use crate::services::ProviderRegistry;
use crate::traits::{AmbientResolver, ResolverProbe};
use crate::types::{ProbeOutcome, ProbeResult, Provider};

pub fn ip(s: &str) -> IpAddr {
    s.parse().unwrap()
}

/// Registry from `(provider, [servers])` pairs, kept in the given order.
pub fn registry(entries: &[(&str, &[&str])]) -> ProviderRegistry {
    let providers = entries
        .iter()
        .map(|(name, servers)| Provider {
            name: (*name).to_string(),
            servers: servers.iter().map(|s| ip(s)).collect(),
        })
        .collect();
    ProviderRegistry::new(providers).unwrap()
}

// ===== MockProbe =====

/// Answers from a per-server script; unscripted servers fail.
#[derive(Default)]
pub struct MockProbe {
    answers: HashMap<IpAddr, ProbeOutcome>,
    delays: HashMap<IpAddr, Duration>,
    calls: Mutex<Vec<(String, IpAddr)>>,
}

impl MockProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, server: &str, addresses: &[&str]) -> Self {
        self.answers.insert(
            ip(server),
            ProbeOutcome::Resolved {
                addresses: addresses.iter().map(|a| ip(a)).collect(),
            },
        );
        self
    }

    pub fn fail(mut self, server: &str, error: &str) -> Self {
        self.answers.insert(
            ip(server),
            ProbeOutcome::Failed {
                error: error.to_string(),
            },
        );
        self
    }

    pub fn time_out(mut self, server: &str) -> Self {
        self.answers.insert(ip(server), ProbeOutcome::Timeout);
        self
    }

    /// Hold the answer back for `delay` before returning it.
    pub fn delay(mut self, server: &str, delay: Duration) -> Self {
        self.delays.insert(ip(server), delay);
        self
    }

    /// `(hostname, server)` for every probe, in call order.
    pub fn calls(&self) -> Vec<(String, IpAddr)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn queried_servers(&self) -> Vec<IpAddr> {
        self.calls().into_iter().map(|(_, server)| server).collect()
    }
}

#[async_trait]
impl ResolverProbe for MockProbe {
    async fn probe(&self, hostname: &str, server: IpAddr) -> ProbeResult {
        self.calls
            .lock()
            .unwrap()
            .push((hostname.to_string(), server));

        if let Some(delay) = self.delays.get(&server) {
            tokio::time::sleep(*delay).await;
        }

        let outcome = self
            .answers
            .get(&server)
            .cloned()
            .unwrap_or_else(|| ProbeOutcome::Failed {
                error: "connection refused".to_string(),
            });

        ProbeResult {
            server,
            outcome,
            response_time_ms: 1,
        }
    }
}

// ===== MockAmbientResolver =====

pub struct MockAmbientResolver {
    answer: Option<Vec<IpAddr>>,
    calls: AtomicUsize,
}

impl MockAmbientResolver {
    pub fn resolving(addresses: &[&str]) -> Self {
        Self {
            answer: Some(addresses.iter().map(|a| ip(a)).collect()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            answer: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AmbientResolver for MockAmbientResolver {
    async fn resolve(&self, _hostname: &str) -> ToolboxResult<Vec<IpAddr>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer
            .clone()
            .ok_or_else(|| ToolboxError::NetworkError("no nameservers reachable".to_string()))
    }
}
