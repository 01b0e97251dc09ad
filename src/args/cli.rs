use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use super::defaults::DEFAULT_LOG_DIR;
use super::parsers::{parse_bool_env, parse_timeout, parse_positive_usize};
use super::types::PositiveUsize;

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Concurrent HTTP replay benchmark - every simulated user replays the same request list."
)]
pub struct BenchArgs {
    /// Target host including scheme and optional port (e.g. http://localhost:8080)
    #[arg(long, short = 'u')]
    pub host: String,

    /// Request list file (.json array or .toml [[requests]])
    #[arg(long, short = 'c')]
    pub config: PathBuf,

    /// Number of simulated users; each one replays the full request list
    #[arg(
        long,
        short = 'n',
        default_value = "1",
        value_parser = parse_positive_usize
    )]
    pub concurrency: PositiveUsize,

    /// Bearer token sent as 'Authorization: Bearer <token>'
    #[arg(long, env = "REPLAYBENCH_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Directory for per-run request logs
    #[arg(long = "log-dir", default_value = DEFAULT_LOG_DIR)]
    pub log_dir: PathBuf,

    /// Per-request timeout enforced by the HTTP client (supports ms/s/m/h)
    #[arg(long, default_value = "30s", value_parser = parse_timeout)]
    pub timeout: Duration,

    /// Write credential headers (Authorization) to the request log unredacted
    #[arg(long = "log-secrets")]
    pub log_secrets: bool,

    /// Write the final report as JSON to this path
    #[arg(long = "export-json")]
    pub export_json: Option<PathBuf>,

    /// Enable verbose logging (sets log level to debug unless overridden by REPLAYBENCH_LOG/RUST_LOG)
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Disable ANSI colors in diagnostics
    #[arg(long = "no-color", env = "NO_COLOR", value_parser = parse_bool_env)]
    pub no_color: bool,
}
