// ABOUTME: LLM provider abstraction used to generate nutrition plan text
// ABOUTME: Defines the provider contract plus chat message, request and response types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # LLM Providers
//!
//! Plan generation talks to a single configured provider through the
//! [`LlmProvider`] trait. Two implementations ship with the server:
//!
//! - **`GeminiProvider`**: Google Generative Language API (default)
//! - **`OpenAiProvider`**: `OpenAI` chat completions
//!
//! ## Example
//!
//! ```rust,no_run
//! use nutriplan_server::llm::{ChatMessage, ChatRequest, GeminiProvider, LlmProvider};
//!
//! async fn example() {
//!     let provider = GeminiProvider::new("api-key");
//!     let request = ChatRequest::new(vec![
//!         ChatMessage::system("You are a nutrition assistant."),
//!         ChatMessage::user("Suggest a high-protein breakfast."),
//!     ]);
//!     let response = provider.complete(&request).await;
//! }
//! ```

mod gemini;
mod openai;
pub mod prompts;
pub mod safety;

pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;
pub use prompts::{build_user_prompt, SYSTEM_PROMPT};
pub use safety::find_unsafe_phrase;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, ErrorCode};

/// Who a prompt message speaks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Standing instructions (the dietitian-assistant persona)
    System,
    /// Per-request client details
    User,
}

impl MessageRole {
    /// Wire name used by chat-style APIs
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
        }
    }
}

/// One prompt message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Speaker
    pub role: MessageRole,
    /// Prompt text
    pub content: String,
}

impl ChatMessage {
    /// Message with an explicit role
    #[must_use]
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Instruction message
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// Request message
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }
}

/// Prompt plus sampling parameters for one generation call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Prompt messages, system first
    pub messages: Vec<ChatMessage>,
    /// Model override; the provider default applies when `None`
    pub model: Option<String>,
    /// Sampling temperature
    pub temperature: Option<f32>,
    /// Output token cap
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    /// Request with no overrides
    #[must_use]
    pub const fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            model: None,
            temperature: None,
            max_tokens: None,
        }
    }

    /// Override the model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Override the temperature
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Cap output tokens
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// System messages joined in order, if any
    #[must_use]
    pub fn system_text(&self) -> Option<String> {
        let parts: Vec<&str> = self
            .messages
            .iter()
            .filter(|m| m.role == MessageRole::System)
            .map(|m| m.content.as_str())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("\n\n"))
        }
    }
}

/// Text produced by a provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Plan text
    pub content: String,
    /// Model that answered
    pub model: String,
    /// Token accounting, when the provider reports it
    pub usage: Option<TokenUsage>,
    /// Provider stop reason
    pub finish_reason: Option<String>,
}

/// Token accounting for one call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Prompt side
    pub prompt_tokens: u32,
    /// Output side
    pub completion_tokens: u32,
    /// Sum reported by the provider
    pub total_tokens: u32,
}

/// Map an upstream HTTP status and error text onto an error code
///
/// Checked in order: credentials, rate limiting, safety blocking. Anything
/// else is a generic external service error.
#[must_use]
pub fn classify_upstream_error(status: u16, message: &str) -> ErrorCode {
    if matches!(status, 401 | 403)
        || message.contains("API_KEY_INVALID")
        || message.contains("API key not valid")
        || message.contains("invalid_api_key")
    {
        ErrorCode::ExternalAuthFailed
    } else if status == 429
        || message.contains("RATE_LIMIT")
        || message.contains("RESOURCE_EXHAUSTED")
        || message.contains("quota")
    {
        ErrorCode::ExternalRateLimited
    } else if message.contains("SAFETY") {
        ErrorCode::ContentBlocked
    } else {
        ErrorCode::ExternalServiceError
    }
}

/// LLM provider trait for plan generation
///
/// Implementations map upstream failures onto `ExternalAuthFailed`,
/// `ExternalRateLimited`, `ContentBlocked` or `ExternalServiceError` so the
/// generation service can pick the user-facing message.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    /// Model used when the request names none
    fn default_model(&self) -> &str;

    /// Generate text for the request
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError>;
}
