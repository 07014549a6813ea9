use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use pitwall_core::{resolve_next_session, ResolvedSession, SnapshotSource};
use serde_json::Value;
use tracing::info;

use crate::config::DaemonConfig;
use crate::error::ApiError;
use crate::upstream::{Round, Season, UpstreamClient};

#[derive(Clone)]
pub struct AppState {
    pub config: DaemonConfig,
    pub upstream: UpstreamClient,
    pub snapshot: Arc<dyn SnapshotSource>,
}

impl AppState {
    pub fn new(
        config: DaemonConfig,
        upstream: UpstreamClient,
        snapshot: Arc<dyn SnapshotSource>,
    ) -> Self {
        Self {
            config,
            upstream,
            snapshot,
        }
    }
}

pub async fn healthz() -> &'static str {
    "ok"
}

/// Nearest session that has not started yet. 404 when the season is over.
pub async fn next_session(
    State(state): State<AppState>,
) -> Result<Json<ResolvedSession>, ApiError> {
    let snapshot = Arc::clone(&state.snapshot);
    let now = pitwall_core::now();
    let resolved = tokio::task::spawn_blocking(move || resolve_next_session(snapshot.as_ref(), now))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    match resolved {
        Some(session) => {
            info!(
                race = %session.race_name,
                session = %session.session_key,
                "resolved next session"
            );
            Ok(Json(session))
        }
        None => Err(ApiError::NoUpcomingSession),
    }
}

pub async fn driver_standings(
    State(state): State<AppState>,
    Path(season): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let season: Season = season.parse()?;
    Ok(Json(state.upstream.driver_standings(season).await?))
}

pub async fn constructor_standings(
    State(state): State<AppState>,
    Path(season): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let season: Season = season.parse()?;
    Ok(Json(state.upstream.constructor_standings(season).await?))
}

pub async fn race_results(
    State(state): State<AppState>,
    Path((season, round)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let season: Season = season.parse()?;
    let round: Round = round.parse()?;
    Ok(Json(state.upstream.race_results(season, round).await?))
}

pub async fn circuits(
    State(state): State<AppState>,
    Path(season): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let season: Season = season.parse()?;
    Ok(Json(state.upstream.circuits(season).await?))
}

pub async fn schedule(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.upstream.current_schedule().await?))
}

pub async fn last_results(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.upstream.last_race_results().await?))
}
