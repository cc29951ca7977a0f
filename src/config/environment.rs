// ABOUTME: Environment-driven server configuration for ports, storage, CORS and the AI provider
// ABOUTME: Parses typed settings once at startup and builds the configured LLM provider
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration

use std::env;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::{ai, defaults, quota};
use crate::llm::{GeminiProvider, LlmProvider, OpenAiProvider};
use crate::services::GenerationSettings;

/// Deployment environment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Deployed service
    Production,
    /// Test runs
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Which LLM backend generates plans
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProviderType {
    /// Google Gemini
    #[default]
    Gemini,
    /// `OpenAI` chat completions
    OpenAi,
}

impl LlmProviderType {
    /// Environment variable for provider selection
    pub const ENV_VAR: &'static str = "NUTRIPLAN_LLM_PROVIDER";

    /// Environment variable for model selection
    pub const MODEL_ENV_VAR: &'static str = "NUTRIPLAN_LLM_MODEL";

    /// Parse from string with fallback to Gemini
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "openai" | "gpt" => Self::OpenAi,
            _ => Self::Gemini,
        }
    }

    /// Environment variable holding this provider's API key
    #[must_use]
    pub const fn api_key_env_var(self) -> &'static str {
        match self {
            Self::Gemini => "GEMINI_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
        }
    }

    /// Model used when no override is configured
    #[must_use]
    pub const fn default_model(self) -> &'static str {
        match self {
            Self::Gemini => ai::GEMINI_DEFAULT_MODEL,
            Self::OpenAi => ai::OPENAI_DEFAULT_MODEL,
        }
    }
}

impl std::fmt::Display for LlmProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gemini => write!(f, "gemini"),
            Self::OpenAi => write!(f, "openai"),
        }
    }
}

/// AI generation settings
#[derive(Clone)]
pub struct AiConfig {
    /// Selected backend
    pub provider: LlmProviderType,
    /// API key for the selected backend; AI is disabled when absent
    pub api_key: Option<String>,
    /// Model override
    pub model: Option<String>,
    /// Generations per user per UTC day
    pub daily_limit: u32,
    /// Bound on one provider call
    pub request_timeout: Duration,
    /// Sampling temperature
    pub temperature: f32,
    /// Output token cap
    pub max_output_tokens: u32,
}

impl std::fmt::Debug for AiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiConfig")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("daily_limit", &self.daily_limit)
            .field("request_timeout", &self.request_timeout)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .finish()
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: LlmProviderType::default(),
            api_key: None,
            model: None,
            daily_limit: quota::DAILY_GENERATION_LIMIT,
            request_timeout: Duration::from_secs(ai::DEFAULT_TIMEOUT_SECS),
            temperature: ai::DEFAULT_TEMPERATURE,
            max_output_tokens: ai::DEFAULT_MAX_OUTPUT_TOKENS,
        }
    }
}

impl AiConfig {
    /// Load AI settings from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable is set but unparsable
    pub fn from_env() -> Result<Self> {
        let provider = env::var(LlmProviderType::ENV_VAR)
            .map(|s| LlmProviderType::from_str_or_default(&s))
            .unwrap_or_default();

        Ok(Self {
            provider,
            api_key: non_empty_var(provider.api_key_env_var()),
            model: non_empty_var(LlmProviderType::MODEL_ENV_VAR),
            daily_limit: parse_var("AI_DAILY_LIMIT", quota::DAILY_GENERATION_LIMIT)?,
            request_timeout: Duration::from_secs(parse_var(
                "AI_REQUEST_TIMEOUT_SECS",
                ai::DEFAULT_TIMEOUT_SECS,
            )?),
            temperature: parse_var("AI_TEMPERATURE", ai::DEFAULT_TEMPERATURE)?,
            max_output_tokens: parse_var("AI_MAX_OUTPUT_TOKENS", ai::DEFAULT_MAX_OUTPUT_TOKENS)?,
        })
    }

    /// Whether an API key is available
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    /// Build the configured provider, or `None` when no key is set
    #[must_use]
    pub fn build_provider(&self) -> Option<Arc<dyn LlmProvider>> {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!(
                provider = %self.provider,
                env_var = self.provider.api_key_env_var(),
                "No API key configured, AI generation disabled"
            );
            return None;
        };

        let model = self
            .model
            .clone()
            .unwrap_or_else(|| self.provider.default_model().to_owned());

        let provider: Arc<dyn LlmProvider> = match self.provider {
            LlmProviderType::Gemini => {
                Arc::new(GeminiProvider::new(api_key).with_default_model(model))
            }
            LlmProviderType::OpenAi => {
                Arc::new(OpenAiProvider::new(api_key).with_default_model(model))
            }
        };
        Some(provider)
    }

    /// Per-call generation parameters
    #[must_use]
    pub fn generation_settings(&self) -> GenerationSettings {
        GenerationSettings {
            model: self.model.clone(),
            temperature: self.temperature,
            max_output_tokens: self.max_output_tokens,
            timeout: self.request_timeout,
        }
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// SQLite URL
    pub database_url: String,
    /// Browser origin allowed by CORS
    pub cors_origin: String,
    /// Deployment environment
    pub environment: Environment,
    /// AI generation settings
    pub ai: AiConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: defaults::HTTP_PORT,
            database_url: defaults::DATABASE_URL.to_owned(),
            cors_origin: defaults::CORS_ORIGIN.to_owned(),
            environment: Environment::default(),
            ai: AiConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable is set but unparsable
    pub fn from_env() -> Result<Self> {
        let http_port = match non_empty_var("HTTP_PORT").or_else(|| non_empty_var("PORT")) {
            Some(port) => port
                .parse()
                .with_context(|| format!("Invalid HTTP port '{port}'"))?,
            None => defaults::HTTP_PORT,
        };

        let environment = non_empty_var("ENVIRONMENT")
            .or_else(|| non_empty_var("NODE_ENV"))
            .map(|s| Environment::from_str_or_default(&s))
            .unwrap_or_default();

        Ok(Self {
            http_port,
            database_url: env_var_or("DATABASE_URL", defaults::DATABASE_URL),
            cors_origin: env_var_or("CORS_ORIGIN", defaults::CORS_ORIGIN),
            environment,
            ai: AiConfig::from_env()?,
        })
    }

    /// One-line summary for startup logs, without secrets
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "NutriPlan configuration: port={} database={} cors_origin={} environment={} \
             ai_provider={} ai_model={} ai_enabled={} daily_limit={} ai_timeout={}s",
            self.http_port,
            redact_database_url(&self.database_url),
            self.cors_origin,
            self.environment,
            self.ai.provider,
            self.ai
                .model
                .as_deref()
                .unwrap_or_else(|| self.ai.provider.default_model()),
            self.ai.is_enabled(),
            self.ai.daily_limit,
            self.ai.request_timeout.as_secs(),
        )
    }
}

/// Database URL with any query string removed
fn redact_database_url(url: &str) -> &str {
    url.split_once('?').map_or(url, |(path, _)| path)
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn env_var_or(key: &str, default: &str) -> String {
    non_empty_var(key).unwrap_or_else(|| default.to_owned())
}

fn parse_var<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match non_empty_var(key) {
        Some(value) => value
            .parse()
            .with_context(|| format!("Invalid value '{value}' for {key}")),
        None => Ok(default),
    }
}
