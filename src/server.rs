//! HTTP endpoint for inbound slash commands.
//!
//! The endpoint reads the raw body and the signature headers, lets the
//! [`Router`] decide, and maps the [`Disposition`] onto a status code and a
//! JSON body. Misconfiguration is caught before a router can be built, so
//! the endpoint never answers 500 itself.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Json;
use mockable::Clock;
use serde_json::json;
use tokio::net::TcpListener;

use crate::auth::{SIGNATURE_HEADER, TIMESTAMP_HEADER};
use crate::command::ports::ReplyDelivery;
use crate::command::services::{Disposition, Router};

/// Builds the axum application serving `router` at `path`.
#[must_use]
pub fn app<D, C>(path: &str, router: Arc<Router<D, C>>) -> axum::Router
where
    D: ReplyDelivery + 'static,
    C: Clock + Send + Sync + 'static,
{
    axum::Router::new()
        .route(path, post(slash_endpoint::<D, C>))
        .with_state(router)
}

/// Serves `app` on `listener` until interrupted.
///
/// # Errors
///
/// Returns an I/O error if the server fails.
pub async fn serve(listener: TcpListener, app: axum::Router) -> std::io::Result<()> {
    if let Ok(address) = listener.local_addr() {
        tracing::info!(%address, "listening for slash commands");
    }
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %err, "failed to listen for shutdown signal");
            }
        })
        .await
}

async fn slash_endpoint<D, C>(
    State(router): State<Arc<Router<D, C>>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response
where
    D: ReplyDelivery + 'static,
    C: Clock + Send + Sync + 'static,
{
    let timestamp = header(&headers, TIMESTAMP_HEADER);
    let signature = header(&headers, SIGNATURE_HEADER);
    into_response(router.handle(&body, timestamp, signature))
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

fn into_response(disposition: Disposition) -> Response {
    let status = StatusCode::from_u16(disposition.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let detail = disposition.detail();
    match disposition {
        Disposition::Ack(None) => status.into_response(),
        Disposition::Ack(Some(message)) | Disposition::Message(message) => {
            (status, Json(message)).into_response()
        }
        Disposition::Forbidden | Disposition::Unprocessable => {
            (status, Json(json!({ "detail": detail }))).into_response()
        }
    }
}
