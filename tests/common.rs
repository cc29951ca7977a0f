// ABOUTME: Shared setup for integration tests: logging, in-memory database, scripted LLM provider
// ABOUTME: Builds server resources and routers wired to test doubles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `nutriplan_server`

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use nutriplan_server::{
    config::ServerConfig,
    database::Database,
    errors::{AppError, ErrorCode},
    llm::{ChatRequest, ChatResponse, LlmProvider, TokenUsage},
    models::ClientProfile,
    resources::ServerResources,
    routes::build_router,
};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        // Another test binary helper may already have installed a subscriber
        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// Fresh in-memory database with all tables created
pub async fn create_test_database() -> Database {
    init_test_logging();
    Database::new("sqlite::memory:")
        .await
        .expect("in-memory database")
}

/// What the scripted provider does on each call
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    /// Return this plan text
    Plan(String),
    /// Fail with this code and upstream message
    Fail(ErrorCode, String),
    /// Never answer
    Hang,
}

/// LLM provider double that replays one scripted reply and records calls
pub struct ScriptedProvider {
    reply: Mutex<ScriptedReply>,
    calls: AtomicUsize,
    last_request: Mutex<Option<ChatRequest>>,
}

impl ScriptedProvider {
    pub fn new(reply: ScriptedReply) -> Arc<Self> {
        Arc::new(Self {
            reply: Mutex::new(reply),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        })
    }

    pub fn plan(text: &str) -> Arc<Self> {
        Self::new(ScriptedReply::Plan(text.to_owned()))
    }

    pub fn failing(code: ErrorCode, message: &str) -> Arc<Self> {
        Self::new(ScriptedReply::Fail(code, message.to_owned()))
    }

    pub fn set_reply(&self, reply: ScriptedReply) {
        *self.reply.lock().unwrap() = reply;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<ChatRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn default_model(&self) -> &str {
        "scripted-model"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        let reply = self.reply.lock().unwrap().clone();

        match reply {
            ScriptedReply::Plan(content) => Ok(ChatResponse {
                content,
                model: "scripted-model".to_owned(),
                usage: Some(TokenUsage {
                    prompt_tokens: 100,
                    completion_tokens: 250,
                    total_tokens: 350,
                }),
                finish_reason: Some("stop".to_owned()),
            }),
            ScriptedReply::Fail(code, message) => Err(AppError::new(code, message)),
            ScriptedReply::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(AppError::internal("unreachable"))
            }
        }
    }
}

/// Config suitable for tests: in-memory database, given limit, short AI timeout
pub fn test_config(daily_limit: u32) -> ServerConfig {
    let mut config = ServerConfig {
        database_url: "sqlite::memory:".to_owned(),
        ..ServerConfig::default()
    };
    config.ai.daily_limit = daily_limit;
    config.ai.request_timeout = Duration::from_secs(2);
    config
}

/// Resources backed by an in-memory database and the given provider
pub async fn create_test_resources(
    config: ServerConfig,
    provider: Option<Arc<dyn LlmProvider>>,
) -> Arc<ServerResources> {
    let database = create_test_database().await;
    Arc::new(ServerResources::new(Arc::new(config), database, provider))
}

/// Full application router over test resources
pub async fn create_test_router(
    config: ServerConfig,
    provider: Option<Arc<dyn LlmProvider>>,
) -> (Router, Arc<ServerResources>) {
    let resources = create_test_resources(config, provider).await;
    (build_router(resources.clone()), resources)
}

/// A representative client profile
pub fn sample_client() -> ClientProfile {
    ClientProfile {
        full_name: "Jane Doe".to_owned(),
        age: "34".to_owned(),
        gender: "Female".to_owned(),
        height: "165 cm".to_owned(),
        weight: "62 kg".to_owned(),
        medical_conditions: vec!["Type 2 diabetes".to_owned()],
        allergies: vec!["Peanuts".to_owned(), "Shellfish".to_owned()],
        goals: "Stabilize blood sugar".to_owned(),
        notes: String::new(),
        ..ClientProfile::default()
    }
}

/// Plan text exercising headings, meal lines, lists and paragraphs
pub const SAMPLE_GENERATED_PLAN: &str = "\
## Introduction
This plan supports steady energy through the day.

DAY 1
Breakfast: Oatmeal with berries; 1 cup; add cinnamon
Lunch: Grilled chicken salad | 200g
Dinner: Baked salmon; 150g

## Foods to Prefer
- Leafy greens
- Whole grains
";
