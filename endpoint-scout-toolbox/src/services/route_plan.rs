//! Trace-command planning for discovered endpoints.

use std::collections::BTreeSet;
use std::net::IpAddr;

use crate::types::{OsFamily, RoutePlan, RouteStep};

/// External trace program and its numeric-mode flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceTemplate {
    pub program: &'static str,
    pub args: &'static [&'static str],
}

impl TraceTemplate {
    fn render(&self, endpoint: IpAddr) -> String {
        let mut command = String::from(self.program);
        for arg in self.args {
            command.push(' ');
            command.push_str(arg);
        }
        command.push(' ');
        command.push_str(&endpoint.to_string());
        command
    }
}

/// Indexed by `OsFamily as usize`.
static TRACE_TEMPLATES: [TraceTemplate; 2] = [
    TraceTemplate {
        program: "traceroute",
        args: &["-n"],
    },
    TraceTemplate {
        program: "tracert",
        args: &["-d"],
    },
];

impl OsFamily {
    /// Trace command convention for this family, without reverse DNS.
    pub fn trace_template(self) -> &'static TraceTemplate {
        &TRACE_TEMPLATES[self as usize]
    }
}

impl RouteStep {
    /// Program followed by its arguments, for callers that spawn the trace.
    pub fn argv(&self) -> Vec<&str> {
        self.command.split(' ').collect()
    }
}

/// One trace command per endpoint, in sorted endpoint order.
///
/// Commands are only produced, never run.
pub fn plan_routes(endpoints: &BTreeSet<IpAddr>, os_family: OsFamily) -> RoutePlan {
    let template = os_family.trace_template();
    let steps = endpoints
        .iter()
        .map(|endpoint| RouteStep {
            endpoint: *endpoint,
            command: template.render(*endpoint),
        })
        .collect();

    RoutePlan { os_family, steps }
}
