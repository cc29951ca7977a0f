// ABOUTME: Request span construction for the tower-http trace layer
// ABOUTME: Tags every request span with a request ID and the calling user when known
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use axum::body::Body;
use http::Request;
use tracing::Span;
use uuid::Uuid;

use crate::auth::user_id_from_headers;

/// Header used to correlate requests across services
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request ID from the incoming header, or a fresh one
#[must_use]
pub fn request_id(request: &Request<Body>) -> String {
    request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map_or_else(
            || format!("req_{}", Uuid::new_v4().simple()),
            str::to_owned,
        )
}

/// Span for one HTTP request, used as the trace layer's `make_span_with`
pub fn make_request_span(request: &Request<Body>) -> Span {
    let user_id = user_id_from_headers(request.headers());
    tracing::info_span!(
        "http_request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id(request),
        user.id = user_id.as_deref().unwrap_or("anonymous"),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn request_with(headers: &[(&str, &str)]) -> Request<Body> {
        let mut builder = Request::builder().uri("/api/plans");
        for (key, value) in headers {
            builder = builder.header(*key, *value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_incoming_request_id_is_kept() {
        let request = request_with(&[(REQUEST_ID_HEADER, "abc-123")]);
        assert_eq!(request_id(&request), "abc-123");
    }

    #[test]
    fn test_missing_request_id_is_generated() {
        let first = request_id(&request_with(&[]));
        let second = request_id(&request_with(&[]));
        assert!(first.starts_with("req_"));
        assert_ne!(first, second);
    }
}
