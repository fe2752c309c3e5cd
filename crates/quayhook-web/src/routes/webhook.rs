use axum::{
    body::Bytes,
    extract::State,
    http::{
        Method,
        Uri,
    },
};
use quayhook_core::{
    IncomingEvent,
    QuayPayload,
};

use crate::error::WebhookResult;
use crate::state::AppState;

pub const ACK_BODY: &str = "ok";

/// Catch-all handler. Anything that is not a POST to the configured webhook
/// route is logged and acknowledged without further work; an accepted
/// delivery is dispatched in the background before the response is sent.
pub async fn receive_webhook(
    State(state): State<AppState>, method: Method, uri: Uri, body: Bytes,
) -> WebhookResult<&'static str> {
    if method != Method::POST {
        tracing::warn!(method = %method, uri = %uri, "Ignoring request: incorrect method");
        return Ok(ACK_BODY);
    }

    let target = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());
    if target != &*state.webhook_route {
        tracing::warn!(received = target, "Ignoring request: incorrect webhook path");
        return Ok(ACK_BODY);
    }

    let payload: QuayPayload = serde_json::from_slice(&body)?;
    tracing::debug!(?payload, "Decoded webhook payload");

    let event = IncomingEvent::from(payload);
    tracing::info!(
        repository = %event.repository,
        reference = %event.reference,
        commit = event.commit.as_deref().unwrap_or(""),
        "Accepted build notification"
    );

    // Detached: the response does not wait for deployments.
    drop(state.dispatcher.dispatch(event));

    Ok(ACK_BODY)
}
