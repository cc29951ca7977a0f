// ABOUTME: HTTP middleware for request tracing and cross-origin access
// ABOUTME: Provides the CORS layer and request span construction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// CORS configuration
pub mod cors;
/// Request span construction
pub mod request_span;

pub use cors::setup_cors;
pub use request_span::{make_request_span, request_id, REQUEST_ID_HEADER};
