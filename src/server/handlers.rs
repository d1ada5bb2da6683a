//! HTTP handlers for the viewer and status endpoints

use std::convert::Infallible;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use bytes::Bytes;
use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::registry::ViewerRegistry;
use crate::stats::RelayStats;
use crate::upstream::UpstreamStatus;

use super::config::ServerConfig;

/// Shared state for the HTTP handlers
#[derive(Clone)]
pub(super) struct AppState {
    pub registry: Arc<ViewerRegistry>,
    pub upstream: Arc<UpstreamStatus>,
    pub config: ServerConfig,
}

/// `GET /relay-stream`: admit a viewer and stream chunks to it
pub(super) async fn relay_stream(State(state): State<AppState>) -> Response {
    let (viewer_id, rx) = match state.registry.admit().await {
        Ok(admitted) => admitted,
        Err(e) => {
            tracing::warn!(error = %e, "Viewer rejected");
            return (StatusCode::SERVICE_UNAVAILABLE, e.to_string()).into_response();
        }
    };

    let body = ViewerBody::new(rx, Arc::clone(&state.registry), viewer_id);

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, state.config.content_type.as_str())
        .header(header::CACHE_CONTROL, "no-cache")
        .header(header::PRAGMA, "no-cache")
        .body(Body::from_stream(body));

    match response {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build stream response");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// `GET /status`: JSON snapshot of relay health
pub(super) async fn status(State(state): State<AppState>) -> Json<RelayStats> {
    Json(RelayStats::collect(&state.registry, &state.upstream).await)
}

/// Streaming response body for one viewer
///
/// Wraps the receiving half of the viewer's chunk queue. Dropping it
/// (the viewer closed the connection, or the response was torn down)
/// removes the sink from the registry immediately, so `count()` stays
/// accurate between broadcasts.
struct ViewerBody {
    chunks: ReceiverStream<Bytes>,
    registry: Arc<ViewerRegistry>,
    viewer_id: u64,
}

impl ViewerBody {
    fn new(rx: mpsc::Receiver<Bytes>, registry: Arc<ViewerRegistry>, viewer_id: u64) -> Self {
        Self {
            chunks: ReceiverStream::new(rx),
            registry,
            viewer_id,
        }
    }
}

impl Stream for ViewerBody {
    type Item = Result<Bytes, Infallible>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.chunks.poll_next_unpin(cx).map(|chunk| chunk.map(Ok))
    }
}

impl Drop for ViewerBody {
    fn drop(&mut self) {
        let registry = Arc::clone(&self.registry);
        let viewer_id = self.viewer_id;
        tokio::spawn(async move {
            registry.remove(viewer_id).await;
        });
    }
}
