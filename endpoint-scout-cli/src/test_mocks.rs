//! Test-only resolver doubles that count how often they are called.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use endpoint_scout_toolbox::{
    AmbientResolver, DiscoveryOptions, EndpointService, ProbeOutcome, ProbeResult,
    ProviderRegistry, ResolverProbe, ToolboxError, ToolboxResult,
};

/// Probe answering from a fixed table; unknown servers fail.
#[derive(Default)]
pub struct CountingProbe {
    answers: HashMap<IpAddr, Vec<IpAddr>>,
    calls: AtomicUsize,
}

impl CountingProbe {
    pub fn with_answer(mut self, server: &str, addresses: &[&str]) -> Self {
        self.answers.insert(
            server.parse().unwrap(),
            addresses.iter().map(|a| a.parse().unwrap()).collect(),
        );
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResolverProbe for CountingProbe {
    async fn probe(&self, _hostname: &str, server: IpAddr) -> ProbeResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let outcome = match self.answers.get(&server) {
            Some(addresses) => ProbeOutcome::Resolved {
                addresses: addresses.iter().copied().collect(),
            },
            None => ProbeOutcome::Failed {
                error: "connection refused".to_string(),
            },
        };
        ProbeResult {
            server,
            outcome,
            response_time_ms: 1,
        }
    }
}

/// Ambient resolver returning a fixed answer, or failing when empty.
pub struct FixedAmbient {
    answer: Vec<IpAddr>,
    calls: AtomicUsize,
}

impl FixedAmbient {
    pub fn new(addresses: &[&str]) -> Self {
        Self {
            answer: addresses.iter().map(|a| a.parse().unwrap()).collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AmbientResolver for FixedAmbient {
    async fn resolve(&self, _hostname: &str) -> ToolboxResult<Vec<IpAddr>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.answer.is_empty() {
            return Err(ToolboxError::NetworkError(
                "no nameservers reachable".to_string(),
            ));
        }
        Ok(self.answer.clone())
    }
}

/// `{"ProviderA": ["10.0.0.1","10.0.0.2"], "ProviderB": ["10.0.0.3"]}` with
/// 10.0.0.2 failing.
pub fn scenario_service(
    ambient: &[&str],
) -> (EndpointService, Arc<CountingProbe>, Arc<FixedAmbient>) {
    let registry = ProviderRegistry::from_json(
        r#"{"ProviderA": ["10.0.0.1", "10.0.0.2"], "ProviderB": ["10.0.0.3"]}"#,
    )
    .unwrap();
    let probe = Arc::new(
        CountingProbe::default()
            .with_answer("10.0.0.1", &["93.0.0.1"])
            .with_answer("10.0.0.3", &["93.0.0.1", "93.0.0.2"]),
    );
    let ambient = Arc::new(FixedAmbient::new(ambient));
    let service = EndpointService::with_resolvers(
        Arc::new(registry),
        probe.clone(),
        ambient.clone(),
        DiscoveryOptions {
            concurrency: 1,
            ..DiscoveryOptions::default()
        },
    );
    (service, probe, ambient)
}
