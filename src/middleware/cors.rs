// ABOUTME: CORS layer allowing the configured frontend origin
// ABOUTME: Permits credentials plus the headers the dashboard sends
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use http::{header::HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use crate::auth::USER_ID_HEADER;
use crate::config::ServerConfig;

/// Configure CORS for the dashboard
///
/// `CORS_ORIGIN` may hold a comma-separated list. Credentials are allowed, so
/// a wildcard is never emitted: unparsable configuration falls back to the
/// default origin.
#[must_use]
pub fn setup_cors(config: &ServerConfig) -> CorsLayer {
    let mut origins: Vec<HeaderValue> = config
        .cors_origin
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty() && *origin != "*")
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if origins.is_empty() {
        warn!(
            cors_origin = %config.cors_origin,
            "No usable CORS origin configured, using default"
        );
        origins.push(HeaderValue::from_static(
            crate::constants::defaults::CORS_ORIGIN,
        ));
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_headers([
            HeaderName::from_static("content-type"),
            HeaderName::from_static("authorization"),
            HeaderName::from_static("accept"),
            HeaderName::from_static("origin"),
            HeaderName::from_static("x-requested-with"),
            HeaderName::from_static("x-request-id"),
            HeaderName::from_static(USER_ID_HEADER),
        ])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
}
