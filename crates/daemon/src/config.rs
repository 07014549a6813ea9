use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub listen: SocketAddr,

    /// Schedule snapshot read by the next-session endpoint.
    pub snapshot_path: PathBuf,

    /// Ergast-compatible results/standings API, e.g. `https://api.jolpi.ca/ergast/f1`.
    pub historical_base_url: String,
    /// Current-season schedule API, e.g. `https://f1api.dev/api`.
    pub current_base_url: String,
    pub upstream_timeout: Duration,

    /// Zero disables the background refresh.
    pub refresh_interval_seconds: u64,
}
