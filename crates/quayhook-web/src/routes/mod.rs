pub mod health;
pub mod webhook;

use axum::{
    routing::any,
    Router,
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", any(health::health_check))
        .fallback(webhook::receive_webhook)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
