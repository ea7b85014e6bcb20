//! Errors surfaced through the HTTP API.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use quirky_game::GameError;
use serde::Serialize;
use tracing::warn;

/// A request that could not be served.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::From)]
pub enum ApiError {
    /// No game with this name is running.
    #[display("No such game exists: {}", _0)]
    #[from(ignore)]
    SessionNotFound(String),

    /// The game refused the request.
    #[display("{}", _0)]
    Game(GameError),

    /// The request was malformed.
    #[display("Bad request: {}", _0)]
    #[from(ignore)]
    BadRequest(String),
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Game(e) => Some(e),
            _ => None,
        }
    }
}

impl ApiError {
    /// HTTP status reported for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::SessionNotFound(_) | ApiError::Game(GameError::PlayerNotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Game(_) => StatusCode::CONFLICT,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        warn!(status = %status, error = %self, "Request failed");
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quirky_game::PlacementError;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::SessionNotFound("g".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(GameError::PlayerNotFound("p".into())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(GameError::InvalidPlacement(PlacementError::TooManyInLine)).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::BadRequest("empty".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }
}
