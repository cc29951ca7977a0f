// ABOUTME: Integration tests for plan generation: check order, quota, failure mapping and safety filter
// ABOUTME: Uses a scripted LLM provider over in-memory and SQLite usage stores
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(missing_docs)]
#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use common::{sample_client, ScriptedProvider, ScriptedReply, SAMPLE_GENERATED_PLAN};
use nutriplan_server::{
    errors::ErrorCode,
    llm::{LlmProvider, MessageRole, SYSTEM_PROMPT},
    plans::Section,
    quota::{InMemoryUsageStore, QuotaGate, UsageStore},
    services::{AiFailure, GenerationRequest, GenerationSettings, PlanGenerationService},
};

fn service_with(
    provider: Option<Arc<dyn LlmProvider>>,
    limit: u32,
) -> (PlanGenerationService, InMemoryUsageStore) {
    common::init_test_logging();
    let store = InMemoryUsageStore::new();
    let gate = QuotaGate::new(Arc::new(store.clone()) as Arc<dyn UsageStore>, limit);
    let settings = GenerationSettings {
        timeout: Duration::from_millis(200),
        ..GenerationSettings::default()
    };
    (PlanGenerationService::new(provider, gate, settings), store)
}

fn request(user_id: &str) -> GenerationRequest {
    GenerationRequest {
        client_data: Some(sample_client()),
        raw_input: Some("Prefers vegetarian lunches".to_owned()),
        user_id: Some(user_id.to_owned()),
    }
}

#[tokio::test]
async fn test_successful_generation_returns_plan_and_quota() {
    let provider = ScriptedProvider::plan(SAMPLE_GENERATED_PLAN);
    let (service, _) = service_with(Some(provider.clone()), 3);

    let outcome = service.generate(request("diet-1")).await.unwrap();

    assert_eq!(outcome.generated_plan, SAMPLE_GENERATED_PLAN);
    assert_eq!(outcome.remaining, 2);
    assert_eq!(outcome.limit, 3);
    assert_eq!(outcome.tokens_used, Some(350));
    assert!(outcome
        .sections
        .iter()
        .any(|s| matches!(s, Section::MealTable { rows } if rows.len() == 3)));
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_request_carries_prompts_and_settings() {
    let provider = ScriptedProvider::plan("Plain plan");
    let (service, _) = service_with(Some(provider.clone()), 3);

    service.generate(request("diet-1")).await.unwrap();

    let sent = provider.last_request().unwrap();
    assert_eq!(sent.messages.len(), 2);
    assert_eq!(sent.messages[0].role, MessageRole::System);
    assert_eq!(sent.messages[0].content, SYSTEM_PROMPT.trim_end());
    assert_eq!(sent.messages[1].role, MessageRole::User);
    assert!(sent.messages[1].content.contains("- Name: Jane Doe"));
    assert!(sent.messages[1].content.contains("Peanuts, Shellfish"));
    assert!(sent.messages[1].content.contains("Prefers vegetarian lunches"));
    assert_eq!(sent.max_tokens, Some(3000));
    assert!(sent.model.is_none());
}

#[tokio::test]
async fn test_missing_client_data_is_rejected_first() {
    let provider = ScriptedProvider::plan("unused");
    let (service, store) = service_with(Some(provider.clone()), 3);

    let err = service
        .generate(GenerationRequest {
            client_data: None,
            raw_input: None,
            user_id: None,
        })
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::MissingRequiredField);
    assert_eq!(err.message, "Client data is required");
    assert_eq!(provider.calls(), 0);
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_missing_user_is_auth_required() {
    let (service, store) = service_with(Some(ScriptedProvider::plan("unused")), 3);

    let mut req = request("ignored");
    req.user_id = Some("   ".to_owned());
    let err = service.generate(req).await.unwrap_err();

    assert_eq!(err.code, ErrorCode::AuthRequired);
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_unconfigured_provider_does_not_touch_quota() {
    let (service, store) = service_with(None, 3);

    let err = service.generate(request("diet-1")).await.unwrap_err();

    assert_eq!(err.code, ErrorCode::ConfigMissing);
    assert_eq!(err.message, "AI service not configured");
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_quota_denial_skips_provider() {
    let provider = ScriptedProvider::plan("Plan");
    let (service, _) = service_with(Some(provider.clone()), 2);

    service.generate(request("diet-1")).await.unwrap();
    service.generate(request("diet-1")).await.unwrap();
    let err = service.generate(request("diet-1")).await.unwrap_err();

    assert_eq!(err.code, ErrorCode::QuotaExceeded);
    assert_eq!(
        err.message,
        "Daily AI generation limit reached (2/2). Please try again tomorrow."
    );
    assert_eq!(err.context.details["remaining"], 0);
    assert_eq!(err.context.details["limit"], 2);
    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn test_quota_is_per_user() {
    let (service, _) = service_with(Some(ScriptedProvider::plan("Plan")), 1);

    service.generate(request("diet-1")).await.unwrap();
    let other = service.generate(request("diet-2")).await.unwrap();

    assert_eq!(other.remaining, 0);
}

#[tokio::test]
async fn test_padded_user_id_shares_the_trimmed_counter() {
    let (service, store) = service_with(Some(ScriptedProvider::plan("Plan")), 2);

    service.generate(request(" diet-1 ")).await.unwrap();
    let second = service.generate(request("diet-1")).await.unwrap();
    assert_eq!(second.remaining, 0);

    let today = Utc::now().date_naive();
    let record = store.get_usage("diet-1", today).await.unwrap().unwrap();
    assert_eq!(record.generations_used, 2);
    assert!(store.get_usage(" diet-1 ", today).await.unwrap().is_none());
}

#[tokio::test]
async fn test_upstream_failures_map_to_fixed_messages() {
    let cases = [
        (
            ErrorCode::ExternalAuthFailed,
            "API key not valid",
            AiFailure::Auth,
        ),
        (
            ErrorCode::ExternalRateLimited,
            "RESOURCE_EXHAUSTED",
            AiFailure::RateLimited,
        ),
        (
            ErrorCode::ContentBlocked,
            "blocked: SAFETY",
            AiFailure::SafetyBlocked,
        ),
    ];

    for (code, upstream, expected) in cases {
        let (service, _) = service_with(Some(ScriptedProvider::failing(code, upstream)), 3);
        let err = service.generate(request("diet-1")).await.unwrap_err();

        assert_eq!(err.code, expected.error_code());
        assert_eq!(err.message, expected.user_message());
        assert_eq!(err.context.details["details"], upstream);
    }
}

#[tokio::test]
async fn test_unclassified_failure_hides_upstream_detail() {
    let provider = ScriptedProvider::failing(ErrorCode::ExternalServiceError, "socket closed");
    let (service, _) = service_with(Some(provider), 3);

    let err = service.generate(request("diet-1")).await.unwrap_err();

    assert_eq!(err.code, ErrorCode::ExternalServiceError);
    assert_eq!(err.message, "Failed to generate diet plan. Please try again.");
    assert!(err.context.details.is_null());
}

#[tokio::test]
async fn test_timeout_is_classified() {
    let provider = ScriptedProvider::new(ScriptedReply::Hang);
    let (service, _) = service_with(Some(provider), 3);

    let err = service.generate(request("diet-1")).await.unwrap_err();

    assert_eq!(err.code, ErrorCode::ExternalTimeout);
    assert_eq!(err.message, AiFailure::Timeout.user_message());
}

#[tokio::test]
async fn test_failed_call_still_consumes_quota() {
    let provider = ScriptedProvider::failing(ErrorCode::ExternalServiceError, "boom");
    let (service, store) = service_with(Some(provider.clone()), 3);

    service.generate(request("diet-1")).await.unwrap_err();

    let today = Utc::now().date_naive();
    let record = store.get_usage("diet-1", today).await.unwrap().unwrap();
    assert_eq!(record.generations_used, 1);

    provider.set_reply(ScriptedReply::Plan("Recovered plan".to_owned()));
    let outcome = service.generate(request("diet-1")).await.unwrap();
    assert_eq!(outcome.remaining, 1);
}

#[tokio::test]
async fn test_unsafe_phrase_blocks_plan() {
    let provider = ScriptedProvider::plan("Follow this and it will DIAGNOSE your issues.");
    let (service, _) = service_with(Some(provider), 3);

    let err = service.generate(request("diet-1")).await.unwrap_err();

    assert_eq!(err.code, ErrorCode::ContentBlocked);
    assert_eq!(
        err.message,
        "Generated plan contains inappropriate medical claims. Please try again."
    );
}

#[tokio::test]
async fn test_zero_limit_denies_without_calls() {
    let provider = ScriptedProvider::plan("Plan");
    let (service, store) = service_with(Some(provider.clone()), 0);

    let err = service.generate(request("diet-1")).await.unwrap_err();

    assert_eq!(err.code, ErrorCode::QuotaExceeded);
    assert_eq!(provider.calls(), 0);
    assert!(store.is_empty());
}

#[test]
fn test_failure_classification_by_code() {
    use nutriplan_server::errors::AppError;

    let classify = |code| AiFailure::classify(&AppError::new(code, "x"));
    assert_eq!(classify(ErrorCode::ExternalAuthFailed), AiFailure::Auth);
    assert_eq!(classify(ErrorCode::ExternalRateLimited), AiFailure::RateLimited);
    assert_eq!(classify(ErrorCode::ContentBlocked), AiFailure::SafetyBlocked);
    assert_eq!(classify(ErrorCode::ExternalTimeout), AiFailure::Timeout);
    assert_eq!(classify(ErrorCode::DatabaseError), AiFailure::Other);
}
