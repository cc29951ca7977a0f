// ABOUTME: Domain service layer for business logic extracted from route handlers
// ABOUTME: Hosts the AI plan generation orchestration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Domain service layer
//!
//! Route handlers stay thin: they extract identity and payloads, then hand
//! off to services here.

/// Plan generation: validation, quota, provider call, safety filter
pub mod generation;

pub use generation::{
    AiFailure, GenerationOutcome, GenerationRequest, GenerationSettings, PlanGenerationService,
};
