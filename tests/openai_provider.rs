use httpmock::Method::POST;
use httpmock::MockServer;
use serde_json::json;

use just_begin::config::{Config, OpenAiConfig};
use just_begin::error::JustBeginError;
use just_begin::interfaces::providers::{ChatMessage, CompletionProvider, CompletionRequest};
use just_begin::providers::openai::OpenAiProvider;

fn question_request() -> CompletionRequest {
    CompletionRequest {
        messages: vec![
            ChatMessage::system("You are a business advisor."),
            ChatMessage::user("bakery"),
        ],
        temperature: 0.7,
        max_tokens: None,
    }
}

#[tokio::test]
async fn provider_from_config_posts_model_and_messages() {
    let server = MockServer::start_async().await;
    let chat_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .header("authorization", "Bearer sk-config")
                .body_includes("\"model\":\"gpt-4o-mini\"")
                .body_includes("\"temperature\":0.7")
                .body_includes("\"role\":\"system\"");
            then.status(200).json_body(json!({
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": "What do you sell?"},
                    "finish_reason": "stop"
                }]
            }));
        })
        .await;

    let config = Config {
        openai: OpenAiConfig {
            api_key: Some("sk-config".to_string()),
            model: Some("gpt-4o-mini".to_string()),
            base_url: Some(format!("{}/v1/", server.base_url())),
            timeout_secs: Some(5),
        },
        ..Config::default()
    };
    let provider = OpenAiProvider::from_config(&config).unwrap().unwrap();
    let text = provider.complete(&question_request()).await.unwrap();

    assert_eq!(text, "What do you sell?");
    chat_mock.assert_calls(1);
}

#[tokio::test]
async fn non_json_error_body_is_wrapped() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(502).body("upstream connect error");
        })
        .await;

    let provider = OpenAiProvider::new("key".to_string(), None, Some(server.base_url()));
    let err = provider.complete(&question_request()).await.unwrap_err();

    match err {
        JustBeginError::Upstream { status, payload } => {
            assert_eq!(status, 502);
            assert_eq!(payload["error"]["message"], "upstream connect error");
        }
        other => panic!("expected upstream error, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_message_is_an_empty_completion() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(200)
                .json_body(json!({"choices": [{"index": 0, "finish_reason": "length"}]}));
        })
        .await;

    let provider = OpenAiProvider::new("key".to_string(), None, Some(server.base_url()));
    let err = provider.complete(&question_request()).await.unwrap_err();
    assert!(matches!(err, JustBeginError::EmptyCompletion));
    assert_eq!(err.status_code(), 400);
}

#[tokio::test]
async fn garbage_success_body_is_a_serialization_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(200).body("<html>oops</html>");
        })
        .await;

    let provider = OpenAiProvider::new("key".to_string(), None, Some(server.base_url()));
    let err = provider.complete(&question_request()).await.unwrap_err();
    assert!(matches!(err, JustBeginError::Serialization(_)));
    assert_eq!(err.status_code(), 500);
}
