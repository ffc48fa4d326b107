//! End-to-end pipeline scenarios: configuration → provider selection →
//! HTTP adapters (against a mock server) → oracle → mood.

use httpmock::prelude::*;
use ruchulu_config::{AppConfig, DeploymentMode, FailurePolicy};
use ruchulu_core::error::GenieError;
use ruchulu_core::menu::MenuItem;
use ruchulu_core::message::ConversationMessage;
use ruchulu_core::reply::{Mood, ReplySource};
use ruchulu_genie::oracle::MILD_LINE;
use ruchulu_genie::{GeniePipeline, GenieRequest};
use ruchulu_providers::{ProviderPath, select_path};

fn ask(text: &str) -> GenieRequest {
    GenieRequest::new(vec![ConversationMessage::user(text)])
}

fn with_primary(mut config: AppConfig, server: &MockServer) -> AppConfig {
    config.primary.api_url = Some(server.url("/models/genie"));
    config.primary.api_token = Some("hf_test".into());
    config
}

fn with_secondary(mut config: AppConfig, server: &MockServer) -> AppConfig {
    config.secondary.api_key = Some("sk-test".into());
    config.secondary.api_url = Some(server.base_url());
    config
}

#[tokio::test]
async fn unconfigured_recommendation_names_the_dish() {
    let config = AppConfig::default();
    assert_eq!(select_path(&config), ProviderPath::FallbackOnly);

    let pipeline = GeniePipeline::from_config(&config).unwrap();
    let reply = pipeline
        .respond(
            ask("Can you recommend something?")
                .with_dishes(vec![MenuItem::new("a", "Gongura Biryani")]),
        )
        .await
        .unwrap();

    assert!(reply.reply_text.contains("Gongura Biryani"));
    assert_eq!(reply.source, ReplySource::Fallback);
}

#[tokio::test]
async fn unconfigured_mild_question() {
    let pipeline = GeniePipeline::from_config(&AppConfig::default()).unwrap();
    let reply = pipeline.respond(ask("is it mild?")).await.unwrap();
    assert_eq!(reply.reply_text, MILD_LINE);
    assert_eq!(reply.mood, Mood::Idle);
    assert_eq!(reply.source, ReplySource::Fallback);
}

#[tokio::test]
async fn primary_array_reply() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/models/genie");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"[{"generated_text": " Try the Guntur fry. "}]"#);
        })
        .await;

    let pipeline = GeniePipeline::from_config(&with_primary(AppConfig::default(), &server)).unwrap();
    let reply = pipeline.respond(ask("hungry")).await.unwrap();

    mock.assert_async().await;
    assert_eq!(reply.reply_text, "Try the Guntur fry.");
    assert_eq!(reply.source, ReplySource::PrimaryProvider);
}

#[tokio::test]
async fn primary_failure_without_secondary_falls_back() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/models/genie");
            then.status(500).body("model crashed");
        })
        .await;

    let pipeline = GeniePipeline::from_config(&with_primary(AppConfig::default(), &server)).unwrap();
    let reply = pipeline.respond(ask("anything spicy?")).await.unwrap();

    assert_eq!(mock.hits_async().await, 1);
    assert_eq!(reply.source, ReplySource::Fallback);
    assert!(!reply.reply_text.is_empty());
}

#[tokio::test]
async fn primary_failure_hands_over_to_secondary() {
    let server = MockServer::start_async().await;
    let primary = server
        .mock_async(|when, then| {
            when.method(POST).path("/models/genie");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"error":"loading"}"#);
        })
        .await;
    let secondary = server
        .mock_async(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"choices":[{"message":{"content":"Brave soul. Take the challenge."}}]}"#);
        })
        .await;

    let config = with_secondary(with_primary(AppConfig::default(), &server), &server);
    assert_eq!(select_path(&config), ProviderPath::PrimaryProvider);

    let reply = GeniePipeline::from_config(&config)
        .unwrap()
        .respond(ask("dare me"))
        .await
        .unwrap();

    assert_eq!(primary.hits_async().await, 1);
    assert_eq!(secondary.hits_async().await, 1);
    assert_eq!(reply.source, ReplySource::SecondaryProvider);
    assert_eq!(reply.mood, Mood::Delighted);
}

#[tokio::test]
async fn server_mode_surfaces_secondary_failure() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(500).body("quota exceeded");
        })
        .await;

    let config = with_secondary(AppConfig::default(), &server);
    assert_eq!(config.genie.mode, DeploymentMode::Server);

    let result = GeniePipeline::from_config(&config)
        .unwrap()
        .respond(ask("hello"))
        .await;

    assert_eq!(mock.hits_async().await, 1);
    match result {
        Err(err @ GenieError::Upstream { .. }) => assert!(err.to_string().contains("quota exceeded")),
        other => panic!("Expected upstream error, got: {other:?}"),
    }
}

#[tokio::test]
async fn client_mode_recovers_secondary_failure() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(500).body("quota exceeded");
        })
        .await;

    let mut config = with_secondary(AppConfig::default(), &server);
    config.genie.mode = DeploymentMode::Client;

    let reply = GeniePipeline::from_config(&config)
        .unwrap()
        .respond(ask("is it mild?"))
        .await
        .unwrap();

    assert_eq!(mock.hits_async().await, 1);
    assert_eq!(reply.reply_text, MILD_LINE);
    assert_eq!(reply.source, ReplySource::Fallback);
}

#[tokio::test]
async fn explicit_policy_overrides_mode() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(502);
        })
        .await;

    let mut config = with_secondary(AppConfig::default(), &server);
    config.genie.secondary_failure = Some(FailurePolicy::FallThrough);

    let reply = GeniePipeline::from_config(&config)
        .unwrap()
        .respond(ask("hello"))
        .await
        .unwrap();
    assert_eq!(reply.source, ReplySource::Fallback);
}

#[tokio::test]
async fn empty_secondary_reply_falls_back_even_in_server_mode() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"choices":[{"message":{"content":"   "}}]}"#);
        })
        .await;

    let reply = GeniePipeline::from_config(&with_secondary(AppConfig::default(), &server))
        .unwrap()
        .respond(ask("recommend").with_dishes(vec![]))
        .await
        .unwrap();
    assert_eq!(reply.source, ReplySource::Fallback);
    assert_eq!(reply.reply_text, ruchulu_genie::oracle::NO_SPECIALS);
}

#[tokio::test]
async fn each_provider_is_called_at_most_once() {
    let server = MockServer::start_async().await;
    let primary = server
        .mock_async(|when, then| {
            when.method(POST).path("/models/genie");
            then.status(503);
        })
        .await;
    let secondary = server
        .mock_async(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(200).body("not json at all");
        })
        .await;

    let config = with_secondary(with_primary(AppConfig::default(), &server), &server);
    let reply = GeniePipeline::from_config(&config)
        .unwrap()
        .respond(ask("hello"))
        .await
        .unwrap();

    assert_eq!(primary.hits_async().await, 1);
    assert_eq!(secondary.hits_async().await, 1);
    assert_eq!(reply.source, ReplySource::Fallback);
}
