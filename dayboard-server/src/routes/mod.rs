pub mod items;
pub mod views;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use dayboard_core::BoardError;

/// Standard API error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Convert errors to HTTP responses
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self.0.downcast_ref::<BoardError>() {
            Some(BoardError::NotFound(_)) => StatusCode::NOT_FOUND,
            Some(BoardError::Validation(_) | BoardError::WrongSource { .. }) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(ErrorResponse {
            error: self.0.to_string(),
        });
        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
