// ABOUTME: Configuration module for the NutriPlan server
// ABOUTME: Re-exports the environment-driven server and AI settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module
//!
//! All settings come from environment variables and are read once at startup
//! by [`ServerConfig::from_env`].

/// Environment and server configuration
pub mod environment;

pub use environment::{AiConfig, Environment, LlmProviderType, ServerConfig};
