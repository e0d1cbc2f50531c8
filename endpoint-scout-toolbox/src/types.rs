//! Public types returned by toolbox operations.

use std::collections::BTreeSet;
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A named group of resolver servers operated by one organisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    /// Human-readable name (e.g. `"Google"`).
    pub name: String,
    /// Resolver server addresses, queried in this order.
    pub servers: Vec<IpAddr>,
}

/// Outcome of a single resolver probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ProbeOutcome {
    /// The server answered. An empty set means NOERROR with no address records.
    Resolved { addresses: BTreeSet<IpAddr> },
    /// The server did not answer in time.
    Timeout,
    /// Any other failure (NXDOMAIN, refused, unreachable, malformed response).
    Failed { error: String },
}

/// Result of querying one resolver server for one hostname.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeResult {
    /// Server that was queried.
    pub server: IpAddr,
    /// Tagged success or failure.
    #[serde(flatten)]
    pub outcome: ProbeOutcome,
    /// Query round-trip time in milliseconds.
    pub response_time_ms: u64,
}

impl ProbeResult {
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, ProbeOutcome::Resolved { .. })
    }

    /// Addresses returned by the server; empty on failure.
    pub fn addresses(&self) -> impl Iterator<Item = &IpAddr> {
        let addresses = match &self.outcome {
            ProbeOutcome::Resolved { addresses } => Some(addresses),
            _ => None,
        };
        addresses.into_iter().flatten()
    }

    /// Descriptive error for a failed probe.
    pub fn error(&self) -> Option<String> {
        match &self.outcome {
            ProbeOutcome::Resolved { .. } => None,
            ProbeOutcome::Timeout => Some("query timed out".to_string()),
            ProbeOutcome::Failed { error } => Some(error.clone()),
        }
    }
}

/// A probe result tagged with the provider whose server was queried.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderProbe {
    pub provider: String,
    #[serde(flatten)]
    pub result: ProbeResult,
}

/// Aggregate of one sweep across every configured resolver server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryReport {
    /// Queried domain.
    pub domain: String,
    /// Distinct endpoints seen by any server, in sorted order.
    pub endpoints: BTreeSet<IpAddr>,
    /// Number of successful probes, counting every server that answered.
    ///
    /// This is not the number of distinct endpoints: a server that answers
    /// with addresses already seen still counts.
    pub resolution_count: usize,
    /// Number of probes that failed or timed out.
    pub failed_probes: usize,
    /// Total wall-clock time in milliseconds.
    pub total_time_ms: u64,
}

impl DiscoveryReport {
    pub fn distinct_endpoints(&self) -> usize {
        self.endpoints.len()
    }

    /// Total number of servers queried during the sweep.
    pub fn servers_queried(&self) -> usize {
        self.resolution_count + self.failed_probes
    }

    /// `true` when no server answered, which callers read as "no data".
    pub fn is_empty(&self) -> bool {
        self.resolution_count == 0
    }
}

/// Host operating system family, selecting the trace command convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsFamily {
    /// Unix-like hosts (`traceroute`).
    Posix = 0,
    /// Windows hosts (`tracert`).
    Windows = 1,
}

impl OsFamily {
    /// Family of the platform this binary was built for.
    pub const fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Posix
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Posix => write!(f, "posix"),
            Self::Windows => write!(f, "windows"),
        }
    }
}

impl FromStr for OsFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "posix" | "unix" | "linux" | "macos" => Ok(Self::Posix),
            "windows" => Ok(Self::Windows),
            _ => Err(format!("Unsupported OS family: {s}")),
        }
    }
}

/// One diagnostic trace command for one endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStep {
    /// Endpoint to trace.
    pub endpoint: IpAddr,
    /// Full command line, e.g. `"traceroute -n 93.184.216.34"`.
    pub command: String,
}

/// Ordered list of trace commands derived from a discovery report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePlan {
    pub os_family: OsFamily,
    pub steps: Vec<RouteStep>,
}

impl RoutePlan {
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn test_probe_result_accessors_on_success() {
        let result = ProbeResult {
            server: ip("8.8.8.8"),
            outcome: ProbeOutcome::Resolved {
                addresses: [ip("93.0.0.2"), ip("93.0.0.1")].into_iter().collect(),
            },
            response_time_ms: 12,
        };
        assert!(result.succeeded());
        assert_eq!(result.error(), None);
        let addrs: Vec<_> = result.addresses().copied().collect();
        assert_eq!(addrs, vec![ip("93.0.0.1"), ip("93.0.0.2")]);
    }

    #[test]
    fn test_probe_result_accessors_on_failure() {
        let failed = ProbeResult {
            server: ip("1.1.1.1"),
            outcome: ProbeOutcome::Failed {
                error: "NXDOMAIN".to_string(),
            },
            response_time_ms: 3,
        };
        assert!(!failed.succeeded());
        assert_eq!(failed.addresses().count(), 0);
        assert_eq!(failed.error().as_deref(), Some("NXDOMAIN"));

        let timed_out = ProbeResult {
            server: ip("1.1.1.1"),
            outcome: ProbeOutcome::Timeout,
            response_time_ms: 5000,
        };
        assert!(!timed_out.succeeded());
        assert!(timed_out.error().unwrap().contains("timed out"));
    }

    #[test]
    fn test_empty_answer_is_success() {
        let result = ProbeResult {
            server: ip("9.9.9.9"),
            outcome: ProbeOutcome::Resolved {
                addresses: BTreeSet::new(),
            },
            response_time_ms: 8,
        };
        assert!(result.succeeded());
        assert_eq!(result.addresses().count(), 0);
    }

    #[test]
    fn test_probe_result_serialization() {
        let result = ProbeResult {
            server: ip("8.8.8.8"),
            outcome: ProbeOutcome::Failed {
                error: "refused".to_string(),
            },
            response_time_ms: 40,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["server"], "8.8.8.8");
        assert_eq!(json["status"], "failed");
        assert_eq!(json["error"], "refused");
        assert_eq!(json["responseTimeMs"], 40);
    }

    #[test]
    fn test_discovery_report_serialization_is_sorted() {
        let report = DiscoveryReport {
            domain: "example.test".to_string(),
            endpoints: [ip("93.0.0.2"), ip("10.0.0.1"), ip("93.0.0.1")]
                .into_iter()
                .collect(),
            resolution_count: 4,
            failed_probes: 1,
            total_time_ms: 100,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["resolutionCount"], 4);
        assert_eq!(json["failedProbes"], 1);
        assert_eq!(
            json["endpoints"],
            serde_json::json!(["10.0.0.1", "93.0.0.1", "93.0.0.2"])
        );
        assert_eq!(report.servers_queried(), 5);
        assert_eq!(report.distinct_endpoints(), 3);
    }

    #[test]
    fn test_default_report_is_empty() {
        let report = DiscoveryReport::default();
        assert!(report.is_empty());
        assert_eq!(report.distinct_endpoints(), 0);
    }

    #[test]
    fn test_os_family_from_str() {
        assert_eq!("posix".parse::<OsFamily>().unwrap(), OsFamily::Posix);
        assert_eq!("Linux".parse::<OsFamily>().unwrap(), OsFamily::Posix);
        assert_eq!("WINDOWS".parse::<OsFamily>().unwrap(), OsFamily::Windows);
        assert!("plan9".parse::<OsFamily>().is_err());
    }

    #[test]
    fn test_os_family_current_matches_target() {
        if cfg!(windows) {
            assert_eq!(OsFamily::current(), OsFamily::Windows);
        } else {
            assert_eq!(OsFamily::current(), OsFamily::Posix);
        }
    }
}
