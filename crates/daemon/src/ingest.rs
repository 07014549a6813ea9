//! Keeps the schedule snapshot on disk in step with the current-season API.

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde_json::Value;
use tokio::time::interval;
use tracing::{info, warn};

use crate::api::AppState;
use crate::upstream::UpstreamClient;

pub fn spawn_refresh(state: AppState) {
    let every = state.config.refresh_interval_seconds;
    if every == 0 {
        return;
    }
    tokio::spawn(async move {
        let mut tick = interval(Duration::from_secs(every));
        loop {
            tick.tick().await;
            if let Err(e) = refresh_snapshot(&state.upstream, &state.config.snapshot_path).await {
                warn!("snapshot refresh failed: {e:?}");
            }
        }
    });
}

/// Fetches the current season and replaces the snapshot file. Returns the
/// number of race entries written.
///
/// The existing snapshot is left alone when the fetched schedule has no race
/// the resolver could read.
pub async fn refresh_snapshot(upstream: &UpstreamClient, path: &Path) -> Result<usize> {
    let races = upstream
        .current_schedule()
        .await
        .context("fetch current schedule")?;
    let (bytes, count) = encode_snapshot(&races)?;

    let target = path.to_path_buf();
    tokio::task::spawn_blocking(move || write_atomically(&target, &bytes))
        .await
        .context("snapshot writer task")??;
    info!(path = %path.display(), count, "snapshot refreshed");
    Ok(count)
}

/// Serializes a fetched `races` array, refusing one the resolver cannot use.
fn encode_snapshot(races: &Value) -> Result<(Vec<u8>, usize)> {
    let Value::Array(entries) = races else {
        bail!("current schedule `races` is not an array");
    };
    let count = entries.len();

    let bytes = serde_json::to_vec(races)?;
    let usable = pitwall_core::parse_snapshot(&bytes)?.len();
    if count > 0 && usable == 0 {
        bail!("none of the {count} fetched races could be read; keeping the old snapshot");
    }
    if usable < count {
        warn!(count, usable, "some races in the fetched schedule will be ignored");
    }
    Ok((bytes, count))
}

/// Writes `bytes` next to `path` and renames over it, so readers see either
/// the old document or the new one.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("create temp file in {}", dir.display()))?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .with_context(|| format!("replace {}", path.display()))?;
    Ok(())
}
