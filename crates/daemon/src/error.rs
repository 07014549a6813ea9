use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pitwall_core::SnapshotError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("no upcoming session")]
    NoUpcomingSession,
    #[error("invalid {what}: {value}")]
    BadParam { what: &'static str, value: String },
    #[error("schedule data unavailable: {0}")]
    Unavailable(#[from] SnapshotError),
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),
    #[error("upstream {url} answered {status}")]
    UpstreamStatus { url: String, status: u16 },
    #[error("upstream {url} has no `{path}`")]
    UpstreamShape { url: String, path: String },
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NoUpcomingSession => StatusCode::NOT_FOUND,
            ApiError::BadParam { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unavailable(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Upstream(_)
            | ApiError::UpstreamStatus { .. }
            | ApiError::UpstreamShape { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
