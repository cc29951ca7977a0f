// ABOUTME: Application-wide constants organized by domain
// ABOUTME: Quota limits, AI generation defaults, service identity, and server defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Service identity
pub mod service {
    /// Service name used in logs and the root banner
    pub const SERVICE_NAME: &str = "nutriplan-server";

    /// Human-readable product name
    pub const DISPLAY_NAME: &str = "NutriPlan Pro API";
}

/// Usage quota for AI generation
pub mod quota {
    /// Free-tier generations per user per UTC day
    pub const DAILY_GENERATION_LIMIT: u32 = 3;

    /// Message returned when the daily limit is reached
    #[must_use]
    pub fn limit_reached_message(limit: u32) -> String {
        format!("Daily AI generation limit reached ({limit}/{limit}). Please try again tomorrow.")
    }
}

/// AI generation defaults
pub mod ai {
    /// Sampling temperature
    pub const DEFAULT_TEMPERATURE: f32 = 0.7;

    /// Output token cap, enough for a 7-day plan
    pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 3000;

    /// Seconds before an AI call is abandoned
    pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

    /// Gemini model used when none is configured
    pub const GEMINI_DEFAULT_MODEL: &str = "gemini-2.5-flash";

    /// `OpenAI` model used when none is configured
    pub const OPENAI_DEFAULT_MODEL: &str = "gpt-4o";

    /// Phrases that reject a generated plan outright (matched case-insensitively)
    pub const UNSAFE_PHRASES: &[&str] = &[
        "this will cure",
        "medical treatment",
        "guaranteed results",
        "diagnose",
        "prescribe medication",
        "replace your doctor",
    ];
}

/// Server defaults
pub mod defaults {
    /// HTTP listen port
    pub const HTTP_PORT: u16 = 5000;

    /// SQLite database location
    pub const DATABASE_URL: &str = "sqlite:./data/nutriplan.db";

    /// Frontend origin allowed by CORS
    pub const CORS_ORIGIN: &str = "http://localhost:3000";
}

/// HTTP server limits
pub mod http {
    /// Largest accepted request body
    pub const REQUEST_BODY_LIMIT_BYTES: usize = 1024 * 1024;

    /// Seconds added to the AI timeout to bound a whole request
    pub const REQUEST_TIMEOUT_GRACE_SECS: u64 = 15;

    /// Version reported by the root banner and health check
    pub const API_VERSION: &str = "1.0.0";
}
