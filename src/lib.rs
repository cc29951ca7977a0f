// ABOUTME: Main library entry point for the NutriPlan nutrition planning API
// ABOUTME: Plan text structuring, AI generation behind a daily quota, and dietitian records
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # `NutriPlan` Server
//!
//! HTTP backend for dietitians who draft client nutrition plans with AI help.
//!
//! ## Features
//!
//! - **Plan structuring**: loosely formatted plan text becomes headings, meal
//!   tables, lists and paragraphs, rendered to branded HTML
//! - **AI generation**: Gemini or `OpenAI` behind a per-user daily quota, with a
//!   safety filter on the output
//! - **Records**: clients, diet plans and branding stored in `SQLite`
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use nutriplan_server::plans::parse_plan_sections;
//!
//! let sections = parse_plan_sections("DAY 1\nBreakfast: Oatmeal; 1 cup");
//! assert_eq!(sections.len(), 2);
//! ```

/// Caller identity extraction
pub mod auth;

/// Environment-driven configuration
pub mod config;

/// `SQLite` document store
pub mod database;

/// LLM provider abstraction, prompts and the output safety filter
pub mod llm;

/// Structured logging setup
pub mod logging;

/// HTTP middleware for tracing and CORS
pub mod middleware;

/// Plan text parsing and HTML rendering
pub mod plans;

/// Daily AI generation quota
pub mod quota;

/// Shared server state
pub mod resources;

/// HTTP routes
pub mod routes;

/// Domain services
pub mod services;

pub use nutriplan_core::{constants, errors, models};
