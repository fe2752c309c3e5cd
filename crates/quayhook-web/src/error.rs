use axum::{
    http::StatusCode,
    response::{
        IntoResponse,
        Response,
    },
};
use thiserror::Error;

/// Body returned for any rejected delivery; details stay in the logs.
pub const FAILURE_BODY: &str = "error";

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("Failed to decode payload: {0}")]
    Decode(#[from] serde_json::Error),
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Webhook rejected");
        (StatusCode::BAD_REQUEST, FAILURE_BODY).into_response()
    }
}

pub type WebhookResult<T> = Result<T, WebhookError>;
