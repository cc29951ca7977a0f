// ABOUTME: Core types and constants for the NutriPlan nutrition planning service
// ABOUTME: Foundation crate with error handling, domain models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # `NutriPlan` Core
//!
//! Foundation crate providing shared types for the `NutriPlan` service. It changes
//! rarely, so the server crate rebuilds incrementally on top of it.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **constants**: Quota, AI and server defaults
//! - **models**: Client, diet plan, branding and usage records

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Domain models shared across the service
pub mod models;
