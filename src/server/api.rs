use crate::{
    error::FeedError,
    fetch::fetch_bytes,
    parser::{FeedSummary, parse_feed},
    projection::{VehicleRecord, project},
    server::state::AppState,
};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

/// JSON body returned on any pipeline failure.
///
/// `error` is `"Failed to retrieve data"` when the upstream could not be
/// reached or answered with a non-200 status, and `"Failed to decode feed
/// data"` when the payload is not a valid feed. `status_code` carries the
/// upstream status for non-200 replies and 500 otherwise.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: &'static str,
    pub status_code: u16,
}

impl From<&FeedError> for ErrorEnvelope {
    fn from(err: &FeedError) -> Self {
        match err {
            FeedError::FetchFailed { status } => ErrorEnvelope {
                error: "Failed to retrieve data",
                status_code: *status,
            },
            FeedError::Transport(_) => ErrorEnvelope {
                error: "Failed to retrieve data",
                status_code: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            },
            FeedError::Decode(_) => ErrorEnvelope {
                error: "Failed to decode feed data",
                status_code: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            },
        }
    }
}

pub struct ApiError(FeedError);

impl From<FeedError> for ApiError {
    fn from(err: FeedError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(kind = self.0.kind(), error = %self.0, "Positions request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorEnvelope::from(&self.0)),
        )
            .into_response()
    }
}

pub async fn positions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<VehicleRecord>>, ApiError> {
    let bytes = fetch_bytes(state.client.as_ref(), &state.feed_url).await?;
    let feed = parse_feed(&bytes)?;

    let summary = FeedSummary::from_feed(&feed);
    let records = project(&feed);
    info!(
        entities = summary.total_entities,
        vehicles = records.len(),
        feed_timestamp = ?summary.feed_timestamp,
        "Positions served"
    );

    Ok(Json(records))
}
