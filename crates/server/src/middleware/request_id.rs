//! Request correlation: an `x-request-id` tied into tracing and Sentry.
//!
//! The per-request tracing span is built by [`make_span`], which declares a
//! `request_id` field up front; [`request_id_middleware`] fills it in once
//! the ID is known, tags the Sentry scope, and echoes the ID back in the
//! response headers.

use axum::extract::Request;
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Build the tracing span for one HTTP request.
///
/// Wired into `TraceLayer::make_span_with`. The `request_id` field must be
/// declared here: recording into a span that never declared the field is
/// silently dropped.
pub fn make_span(request: &Request) -> Span {
    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = tracing::field::Empty,
    )
}

/// The upstream-provided request ID, or a fresh UUID v4.
///
/// Proxies and load balancers that already assign an `x-request-id` keep
/// their value so correlation spans the whole chain.
fn request_id_from(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from)
}

/// Middleware that ensures every request has a unique request ID.
///
/// Runs inside the span built by [`make_span`], so the recorded
/// `request_id` shows up on every log line for the request.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = request_id_from(request.headers());

    Span::current().record("request_id", request_id.as_str());

    // Sentry tag for error correlation
    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;

    // Echo the ID so clients can quote it in support requests
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_reuses_upstream_header() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("lb-abc-123"));
        assert_eq!(request_id_from(&headers), "lb-abc-123");
    }

    #[test]
    fn test_request_id_generated_when_absent() {
        let id = request_id_from(&HeaderMap::new());
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn test_span_declares_request_id_field() {
        // A span only accepts records for fields present in its metadata.
        let subscriber = tracing_subscriber::fmt().finish();
        tracing::subscriber::with_default(subscriber, || {
            let request = Request::builder()
                .uri("/cart")
                .body(axum::body::Body::empty())
                .unwrap();
            let span = make_span(&request);
            assert!(span.field("request_id").is_some());
        });
    }
}
