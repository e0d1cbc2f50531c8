//! Resolver probe backed by hickory-resolver.

use std::collections::BTreeSet;
use std::net::IpAddr;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use hickory_resolver::{
    ResolveError,
    proto::{ProtoErrorKind, op::ResponseCode},
};

use crate::traits::ResolverProbe;
use crate::types::{ProbeOutcome, ProbeResult};

use super::resolver::build_resolver_for_server;

/// Per-probe network timeout used when none is configured.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Queries a single server with a resolver built for that call alone.
#[derive(Debug, Clone, Copy)]
pub struct HickoryProbe {
    timeout: Duration,
}

impl HickoryProbe {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for HickoryProbe {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_TIMEOUT)
    }
}

#[async_trait]
impl ResolverProbe for HickoryProbe {
    async fn probe(&self, hostname: &str, server: IpAddr) -> ProbeResult {
        // hickory answers address literals itself without asking the server.
        if hostname.parse::<IpAddr>().is_ok() {
            return ProbeResult {
                server,
                outcome: ProbeOutcome::Failed {
                    error: format!("{hostname} is an address, not a hostname"),
                },
                response_time_ms: 0,
            };
        }

        let resolver = build_resolver_for_server(server, self.timeout);
        let start = Instant::now();

        let outcome = match resolver.lookup_ip(hostname).await {
            Ok(lookup) => ProbeOutcome::Resolved {
                addresses: lookup.iter().collect(),
            },
            Err(e) => classify_error(&e),
        };

        // u128 -> u64: elapsed millis for a DNS query will never exceed u64::MAX
        #[allow(clippy::cast_possible_truncation)]
        let response_time_ms = start.elapsed().as_millis() as u64;

        ProbeResult {
            server,
            outcome,
            response_time_ms,
        }
    }
}

/// Map a resolver error onto a probe outcome.
///
/// NOERROR with an empty answer section is a successful probe with no
/// addresses; every other negative answer is a failure.
fn classify_error(err: &ResolveError) -> ProbeOutcome {
    if let Some(proto) = err.proto() {
        match proto.kind() {
            ProtoErrorKind::NoRecordsFound { response_code, .. } => {
                return if *response_code == ResponseCode::NoError {
                    ProbeOutcome::Resolved {
                        addresses: BTreeSet::new(),
                    }
                } else {
                    ProbeOutcome::Failed {
                        error: format!("server answered {response_code}"),
                    }
                };
            }
            ProtoErrorKind::Timeout => return ProbeOutcome::Timeout,
            _ => {}
        }
    }
    ProbeOutcome::Failed {
        error: err.to_string(),
    }
}
