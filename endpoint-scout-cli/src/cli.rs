//! Command-line surface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use endpoint_scout_toolbox::OsFamily;

#[derive(Debug, Parser)]
#[command(name = "endpoint-scout", version)]
#[command(about = "Find every endpoint a domain resolves to across public DNS providers.")]
pub struct Cli {
    /// Configuration file (JSON). Defaults to the platform config directory.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory for the rotating log file
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    /// Maximum number of resolver probes in flight
    #[arg(long, global = true)]
    pub concurrency: Option<usize>,

    /// Per-probe timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Only print warnings and errors to the console
    #[arg(long, short, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Resolve a domain through every configured provider and list its endpoints
    #[command(alias = "fe")]
    FindEndpoints {
        #[command(flatten)]
        target: DomainArgs,
        /// Also print every per-server result
        #[arg(long, short)]
        verbose: bool,
    },
    /// Print a traceroute command for every endpoint of a domain
    #[command(alias = "st")]
    ShowTraceroutes {
        #[command(flatten)]
        target: DomainArgs,
        /// Trace command convention (defaults to the running platform)
        #[arg(long)]
        os: Option<OsFamily>,
    },
    /// List the configured DNS providers and their servers
    #[command(alias = "lp")]
    ListProviders {
        /// Print the registry as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Args)]
pub struct DomainArgs {
    /// Domain to resolve (e.g. www.amazon.de, www.amazon.com, smile.amazon.com)
    #[arg(long)]
    pub domain: Option<String>,
    /// Print the result as JSON on stdout
    #[arg(long)]
    pub json: bool,
}
