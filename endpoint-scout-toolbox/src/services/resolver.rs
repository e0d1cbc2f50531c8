//! Shared DNS resolver builders used by the probe and the default-resolver check.

use std::net::IpAddr;
use std::sync::LazyLock;
use std::time::Duration;

use hickory_resolver::{
    TokioResolver,
    config::{
        LookupIpStrategy, NameServerConfigGroup, ResolveHosts, ResolverConfig, ResolverOpts,
    },
    name_server::TokioConnectionProvider,
};

/// Shared resolver built from the host system configuration.
///
/// On Unix/Windows this uses e.g. `/etc/resolv.conf`. If the system
/// configuration cannot be loaded, it falls back to Hickory's default upstream
/// set (Google Public DNS).
pub(crate) static DEFAULT_RESOLVER: LazyLock<TokioResolver> = LazyLock::new(build_system_resolver);

/// Human-readable description of the DNS servers used by the default resolver.
pub(crate) static SYSTEM_DNS_LABEL: LazyLock<String> = LazyLock::new(|| {
    #[cfg(any(unix, target_os = "windows"))]
    {
        if let Ok((config, _opts)) = hickory_resolver::system_conf::read_system_conf() {
            let ips = dedup_ips(&config);
            if !ips.is_empty() {
                return ips.join(", ");
            }
        }
    }

    let ips = dedup_ips(&ResolverConfig::default());
    if ips.is_empty() {
        "Default".to_string()
    } else {
        ips.join(", ")
    }
});

/// Deduplicate nameserver IP addresses from a resolver configuration.
pub(crate) fn dedup_ips(config: &ResolverConfig) -> Vec<String> {
    let mut ips: Vec<String> = Vec::new();
    for ns in config.name_servers() {
        let ip = ns.socket_addr.ip().to_string();
        if !ips.contains(&ip) {
            ips.push(ip);
        }
    }
    ips
}

/// Build a resolver whose only upstream is `server` (UDP and TCP on port 53).
///
/// Each call returns an independent resolver; no shared configuration is
/// touched and the hosts file is never consulted. One attempt per query,
/// bounded by `timeout`.
pub(crate) fn build_resolver_for_server(server: IpAddr, timeout: Duration) -> TokioResolver {
    let config = ResolverConfig::from_parts(
        None,
        vec![],
        NameServerConfigGroup::from_ips_clear(&[server], 53, true),
    );
    let mut opts = ResolverOpts::default();
    opts.timeout = timeout;
    opts.attempts = 1;
    opts.ip_strategy = LookupIpStrategy::Ipv4AndIpv6;
    opts.use_hosts_file = ResolveHosts::Never;
    TokioResolver::builder_with_config(config, TokioConnectionProvider::default())
        .with_options(opts)
        .build()
}

/// Build a resolver using the host system DNS configuration (with fallback).
fn build_system_resolver() -> TokioResolver {
    #[cfg(any(unix, target_os = "windows"))]
    {
        match TokioResolver::builder_tokio() {
            Ok(mut builder) => {
                builder.options_mut().ip_strategy = LookupIpStrategy::Ipv4AndIpv6;
                return builder.build();
            }
            Err(e) => {
                log::warn!(
                    "Failed to load system DNS configuration, falling back to defaults: {e}"
                );
            }
        }
    }

    let mut opts = ResolverOpts::default();
    opts.ip_strategy = LookupIpStrategy::Ipv4AndIpv6;
    TokioResolver::builder_with_config(ResolverConfig::default(), TokioConnectionProvider::default())
        .with_options(opts)
        .build()
}
