// ABOUTME: Google Gemini provider for plan generation via the Generative Language v1 API
// ABOUTME: Sends system and user prompts as one text part and classifies upstream failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Gemini Provider
//!
//! Plan generation through Google's `generateContent` endpoint.
//!
//! The v1 endpoint has no separate system-instruction field, so the system
//! prompt is prepended to the user prompt in a single text part.
//!
//! ## Configuration
//!
//! Set `GEMINI_API_KEY` with a key from Google AI Studio. The model defaults
//! to `gemini-2.5-flash` and can be changed with `NUTRIPLAN_LLM_MODEL`.

use std::fmt;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument, warn};

use super::prompts::combined_prompt;
use super::{
    classify_upstream_error, ChatRequest, ChatResponse, LlmProvider, MessageRole, TokenUsage,
};
use crate::constants::ai::GEMINI_DEFAULT_MODEL;
use crate::errors::{AppError, ErrorCode};

/// Public Generative Language API root
const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1";

// Wire types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<TextPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TextPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
    usage_metadata: Option<UsageMetadata>,
    prompt_feedback: Option<PromptFeedback>,
    error: Option<GeminiError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<u32>,
    candidates_token_count: Option<u32>,
    total_token_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorEnvelope {
    error: GeminiError,
}

/// Gemini-backed [`LlmProvider`]
pub struct GeminiProvider {
    api_key: String,
    client: Client,
    default_model: String,
    base_url: String,
}

impl GeminiProvider {
    /// Provider using `gemini-2.5-flash` on the public endpoint
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            client: Client::new(),
            default_model: GEMINI_DEFAULT_MODEL.to_owned(),
            base_url: API_BASE_URL.to_owned(),
        }
    }

    /// Use another model when requests name none
    #[must_use]
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    /// Point the provider at a different API root (proxies, test servers)
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn build_url(&self, model: &str) -> String {
        format!(
            "{}/models/{model}:generateContent?key={}",
            self.base_url.trim_end_matches('/'),
            self.api_key
        )
    }

    fn build_gemini_request(request: &ChatRequest) -> GeminiRequest {
        let user_text = request
            .messages
            .iter()
            .filter(|m| m.role != MessageRole::System)
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let text = match request.system_text() {
            Some(system) => combined_prompt(&system, &user_text),
            None => user_text,
        };

        let generation_config = (request.temperature.is_some() || request.max_tokens.is_some())
            .then(|| GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
            });

        GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![TextPart { text }],
            }],
            generation_config,
        }
    }

    /// Map a non-success response onto a classified error carrying the upstream text
    fn upstream_failure(status: u16, body: &str) -> AppError {
        let detail = serde_json::from_str::<GeminiErrorEnvelope>(body).map_or_else(
            |_| body.chars().take(500).collect::<String>(),
            |envelope| format!("{} {}", envelope.error.status, envelope.error.message),
        );
        let code = classify_upstream_error(status, &detail);
        AppError::new(code, format!("Gemini API error ({status}): {}", detail.trim()))
    }

    /// Pull the plan text out of a successful response
    fn plan_text(response: &GeminiResponse) -> Result<String, AppError> {
        if let Some(reason) = response
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            return Err(AppError::new(
                ErrorCode::ContentBlocked,
                format!("Gemini blocked the prompt: SAFETY ({reason})"),
            ));
        }

        let candidate = response
            .candidates
            .as_ref()
            .and_then(|c| c.first())
            .ok_or_else(|| AppError::external_service("Gemini", "No candidates in response"))?;

        let text: String = candidate
            .content
            .as_ref()
            .map(|c| c.parts.iter().map(|p| p.text.as_str()).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            if candidate.finish_reason.as_deref() == Some("SAFETY") {
                return Err(AppError::new(
                    ErrorCode::ContentBlocked,
                    "Gemini stopped generation: SAFETY",
                ));
            }
            return Err(AppError::external_service("Gemini", "No content in response"));
        }
        Ok(text)
    }

    fn token_usage(meta: &UsageMetadata) -> TokenUsage {
        TokenUsage {
            prompt_tokens: meta.prompt_token_count.unwrap_or(0),
            completion_tokens: meta.candidates_token_count.unwrap_or(0),
            total_tokens: meta.total_token_count.unwrap_or(0),
        }
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    #[instrument(skip(self, request), fields(model = %request.model.as_deref().unwrap_or(&self.default_model)))]
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        let model = request.model.as_deref().unwrap_or(&self.default_model);
        let body = Self::build_gemini_request(request);
        debug!("Calling Gemini generateContent");

        let response = self
            .client
            .post(self.build_url(model))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                AppError::external_service("Gemini", format!("HTTP request failed: {e}"))
                    .with_source(e)
            })?;

        let http_status = response.status();
        let raw = response.text().await.map_err(|e| {
            AppError::external_service("Gemini", format!("Failed to read response: {e}"))
        })?;

        if !http_status.is_success() {
            error!(status = %http_status, "Gemini rejected the request");
            return Err(Self::upstream_failure(http_status.as_u16(), &raw));
        }

        let parsed: GeminiResponse = serde_json::from_str(&raw).map_err(|e| {
            error!(error = %e, "Unparseable Gemini body");
            AppError::external_service("Gemini", format!("Failed to parse response: {e}"))
        })?;

        if let Some(error) = &parsed.error {
            let detail = format!("{} {}", error.status, error.message);
            return Err(AppError::new(
                classify_upstream_error(http_status.as_u16(), &detail),
                format!("Gemini API error: {}", detail.trim()),
            ));
        }

        let content = Self::plan_text(&parsed).inspect_err(|e| {
            warn!(code = ?e.code, "Gemini returned no usable content");
        })?;
        debug!(chars = content.len(), "Gemini plan received");

        Ok(ChatResponse {
            content,
            model: model.to_owned(),
            usage: parsed.usage_metadata.as_ref().map(Self::token_usage),
            finish_reason: parsed
                .candidates
                .and_then(|c| c.into_iter().next())
                .and_then(|c| c.finish_reason),
        })
    }
}

impl fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("model", &self.default_model)
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}
