// ABOUTME: Orchestrates one AI plan generation from validation through the safety filter
// ABOUTME: Consumes quota before the provider call and maps upstream failures to fixed messages
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};

use crate::constants::ai::{DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT_SECS};
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::llm::{
    build_user_prompt, find_unsafe_phrase, ChatMessage, ChatRequest, LlmProvider, SYSTEM_PROMPT,
};
use crate::models::ClientProfile;
use crate::plans::{parse_plan_sections, Section};
use crate::quota::QuotaGate;

const NOT_CONFIGURED_MESSAGE: &str = "AI service not configured";
const UNSAFE_CONTENT_MESSAGE: &str =
    "Generated plan contains inappropriate medical claims. Please try again.";

/// Incoming generation payload
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationRequest {
    /// Client profile the plan is written for
    pub client_data: Option<ClientProfile>,
    /// Dietitian's free-text notes
    pub raw_input: Option<String>,
    /// Caller identity
    pub user_id: Option<String>,
}

/// Successful generation result
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOutcome {
    /// Plan text exactly as returned by the model
    pub generated_plan: String,
    /// Generations left today
    pub remaining: u32,
    /// Daily limit
    pub limit: u32,
    /// Total tokens reported by the provider
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<u32>,
    /// Parsed structure of the plan
    pub sections: Vec<Section>,
}

/// Classified failure of the provider call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiFailure {
    /// Provider rejected our credentials
    Auth,
    /// Provider is rate limiting or out of quota
    RateLimited,
    /// Provider safety filters blocked the request or response
    SafetyBlocked,
    /// No answer within the configured timeout
    Timeout,
    /// Anything else
    Other,
}

impl AiFailure {
    /// Classify a provider error by its code
    #[must_use]
    pub const fn classify(error: &AppError) -> Self {
        match error.code {
            ErrorCode::ExternalAuthFailed | ErrorCode::AuthInvalid => Self::Auth,
            ErrorCode::ExternalRateLimited => Self::RateLimited,
            ErrorCode::ContentBlocked => Self::SafetyBlocked,
            ErrorCode::ExternalTimeout => Self::Timeout,
            _ => Self::Other,
        }
    }

    /// Message shown to the user
    #[must_use]
    pub const fn user_message(self) -> &'static str {
        match self {
            Self::Auth => "AI service configuration error. Please contact support.",
            Self::RateLimited => "AI service is temporarily busy. Please try again later.",
            Self::SafetyBlocked => {
                "Content was blocked by safety filters. Please rephrase your input."
            }
            Self::Timeout => "AI service took too long to respond. Please try again.",
            Self::Other => "Failed to generate diet plan. Please try again.",
        }
    }

    /// Error code returned to the caller
    #[must_use]
    pub const fn error_code(self) -> ErrorCode {
        match self {
            Self::Auth => ErrorCode::ExternalAuthFailed,
            Self::RateLimited => ErrorCode::ExternalRateLimited,
            Self::SafetyBlocked => ErrorCode::ContentBlocked,
            Self::Timeout => ErrorCode::ExternalTimeout,
            Self::Other => ErrorCode::ExternalServiceError,
        }
    }

    /// User-facing error; raw upstream detail is attached only for classified failures
    #[must_use]
    pub fn into_error(self, raw_detail: &str) -> AppError {
        let error = AppError::new(self.error_code(), self.user_message());
        if self == Self::Other {
            error
        } else {
            error.with_details(json!({ "details": raw_detail }))
        }
    }
}

/// Model parameters and the caller-imposed time bound
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    /// Model override; provider default when `None`
    pub model: Option<String>,
    /// Sampling temperature
    pub temperature: f32,
    /// Output token cap
    pub max_output_tokens: u32,
    /// Bound on a single provider call
    pub timeout: Duration,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: None,
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Generates plans for dietitians behind the daily quota
#[derive(Clone)]
pub struct PlanGenerationService {
    provider: Option<Arc<dyn LlmProvider>>,
    quota: QuotaGate,
    settings: GenerationSettings,
}

impl PlanGenerationService {
    /// Create the service; `provider` is `None` when no API key is configured
    #[must_use]
    pub fn new(
        provider: Option<Arc<dyn LlmProvider>>,
        quota: QuotaGate,
        settings: GenerationSettings,
    ) -> Self {
        Self {
            provider,
            quota,
            settings,
        }
    }

    /// Whether a provider is available
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// Name of the configured provider
    #[must_use]
    pub fn provider_name(&self) -> Option<&'static str> {
        self.provider.as_ref().map(|p| p.name())
    }

    /// Quota gate used by this service
    #[must_use]
    pub const fn quota(&self) -> &QuotaGate {
        &self.quota
    }

    fn build_chat_request(&self, client: &ClientProfile, raw_input: Option<&str>) -> ChatRequest {
        let request = ChatRequest::new(vec![
            ChatMessage::system(SYSTEM_PROMPT.trim_end()),
            ChatMessage::user(build_user_prompt(client, raw_input)),
        ])
        .with_temperature(self.settings.temperature)
        .with_max_tokens(self.settings.max_output_tokens);

        match &self.settings.model {
            Some(model) => request.with_model(model.clone()),
            None => request,
        }
    }

    /// Generate a plan
    ///
    /// Checks run in order: client data, caller identity, provider
    /// configuration, quota. A consumed unit is not returned if the provider
    /// call fails afterwards.
    ///
    /// # Errors
    ///
    /// - `MissingRequiredField` when client data is absent
    /// - `AuthRequired` when the user ID is absent
    /// - `ConfigMissing` when no provider is configured
    /// - `QuotaExceeded` when today's limit is used up
    /// - a classified provider error (see [`AiFailure`])
    /// - `ContentBlocked` when the plan contains a denylisted phrase
    pub async fn generate(&self, request: GenerationRequest) -> AppResult<GenerationOutcome> {
        let client = request
            .client_data
            .ok_or_else(|| AppError::missing_field("Client data is required"))?;

        let user_id = request
            .user_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_owned)
            .ok_or_else(AppError::auth_required)?;

        let provider = self
            .provider
            .as_ref()
            .ok_or_else(|| AppError::new(ErrorCode::ConfigMissing, NOT_CONFIGURED_MESSAGE))?;

        let decision = self.quota.check_and_consume_today(&user_id).await?;
        if let Some(message) = decision.denial_message() {
            return Err(AppError::new(ErrorCode::QuotaExceeded, message)
                .with_user_id(&user_id)
                .with_details(json!({ "remaining": 0, "limit": decision.limit })));
        }

        let chat_request = self.build_chat_request(&client, request.raw_input.as_deref());

        info!(
            user.id = %user_id,
            llm.provider = provider.name(),
            client = client.display_name(),
            "Generating diet plan"
        );

        let response =
            match tokio::time::timeout(self.settings.timeout, provider.complete(&chat_request))
                .await
            {
                Ok(Ok(response)) => response,
                Ok(Err(upstream)) => {
                    let failure = AiFailure::classify(&upstream);
                    error!(
                        user.id = %user_id,
                        llm.provider = provider.name(),
                        failure = ?failure,
                        error = %upstream,
                        "Diet plan generation failed"
                    );
                    return Err(failure.into_error(&upstream.message));
                }
                Err(_elapsed) => {
                    warn!(
                        user.id = %user_id,
                        timeout_secs = self.settings.timeout.as_secs(),
                        "Diet plan generation timed out"
                    );
                    return Err(AiFailure::Timeout.into_error(&format!(
                        "No response within {} seconds",
                        self.settings.timeout.as_secs()
                    )));
                }
            };

        if let Some(phrase) = find_unsafe_phrase(&response.content) {
            warn!(user.id = %user_id, phrase, "Generated plan rejected by safety filter");
            return Err(AppError::new(ErrorCode::ContentBlocked, UNSAFE_CONTENT_MESSAGE));
        }

        let sections = parse_plan_sections(response.content.as_str());

        info!(
            user.id = %user_id,
            quota.remaining = decision.remaining,
            sections = sections.len(),
            "Diet plan generated"
        );

        Ok(GenerationOutcome {
            generated_plan: response.content,
            remaining: decision.remaining,
            limit: decision.limit,
            tokens_used: response.usage.map(|u| u.total_tokens),
            sections,
        })
    }
}
