//! Per-request correlation id
//!
//! Every request gets a fresh v4 uuid before it reaches any handler. The
//! id rides in the request extensions and ends up in both the success and
//! error envelopes, so one request can be followed across log lines and
//! the response body.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

/// Correlation id carried in request extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestId(pub Uuid);

impl RequestId {
    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

/// Middleware that tags the request with a fresh correlation id.
pub async fn correlation_id(mut request: Request, next: Next) -> Response {
    let request_id = RequestId(Uuid::new_v4());
    request.extensions_mut().insert(request_id);

    tracing::info!(
        event = "request",
        request_id = %request_id.0,
        method = %request.method(),
        path = %request.uri().path(),
    );

    next.run(request).await
}
