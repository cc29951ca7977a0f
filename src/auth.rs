// ABOUTME: Caller identity extraction for dietitian-scoped routes
// ABOUTME: Trusts the user ID header set by the upstream authentication layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Request authentication
//!
//! Token verification happens upstream; requests reach this service with the
//! verified user ID in the [`USER_ID_HEADER`] header.

use axum::http::HeaderMap;

use crate::errors::{AppError, AppResult};

/// Header carrying the verified dietitian ID
pub const USER_ID_HEADER: &str = "x-user-id";

/// Identity of the calling dietitian
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Dietitian ID, used as the owner of every stored record
    pub user_id: String,
}

/// User ID from the request headers, if present and non-blank
#[must_use]
pub fn user_id_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

/// Require an authenticated caller
///
/// # Errors
///
/// Returns `AuthRequired` when the header is missing, blank or not valid UTF-8
pub fn authenticate(headers: &HeaderMap) -> AppResult<AuthenticatedUser> {
    user_id_from_headers(headers)
        .map(|user_id| AuthenticatedUser { user_id })
        .ok_or_else(AppError::auth_required)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_missing_header_requires_auth() {
        let headers = HeaderMap::new();
        let err = authenticate(&headers).err();
        assert_eq!(
            err.map(|e| e.code),
            Some(crate::errors::ErrorCode::AuthRequired)
        );
    }

    #[test]
    fn test_header_is_trimmed() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_static("  diet-1 "));
        assert_eq!(user_id_from_headers(&headers).as_deref(), Some("diet-1"));
    }

    #[test]
    fn test_blank_header_is_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_static("   "));
        assert!(authenticate(&headers).is_err());
    }
}
