//! HTTP-level tests for the chat completion call against a mock server.

use openai_client::{ChatRequest, FinishReason, Message, OpenAIClient, OpenAIError};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request() -> ChatRequest {
    ChatRequest::new("gpt-5-nano")
        .message(Message::system("Fasse zusammen."))
        .message(Message::user("Der Senat hat entschieden ..."))
        .output_budget(500)
}

async fn client_for(server: &MockServer) -> OpenAIClient {
    OpenAIClient::new("sk-test").with_base_url(server.uri())
}

#[tokio::test]
async fn test_natural_stop_returns_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-5-nano",
            "max_completion_tokens": 500
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "message": { "role": "assistant", "content": "  Kurzfassung.  " },
                "finish_reason": "stop"
            }],
            "usage": { "prompt_tokens": 120, "completion_tokens": 8, "total_tokens": 128 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server).await.chat_completion(request()).await.unwrap();

    assert_eq!(response.content, "  Kurzfassung.  ");
    assert_eq!(response.finish_reason, FinishReason::Stop);
    assert!(!response.is_truncated());
    assert_eq!(response.usage.unwrap().total_tokens, 128);
}

#[tokio::test]
async fn test_length_limit_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "message": { "role": "assistant", "content": "Der BFH hat" },
                "finish_reason": "length"
            }]
        })))
        .mount(&server)
        .await;

    let response = client_for(&server).await.chat_completion(request()).await.unwrap();

    assert_eq!(response.content, "Der BFH hat");
    assert!(response.is_truncated());
    assert!(response.usage.is_none());
}

#[tokio::test]
async fn test_null_content_becomes_empty_string() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "content": null }, "finish_reason": "length" }]
        })))
        .mount(&server)
        .await;

    let response = client_for(&server).await.chat_completion(request()).await.unwrap();

    assert!(response.content.is_empty());
}

#[tokio::test]
async fn test_api_error_carries_status_and_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": { "message": "The model `gpt-5-nano` does not exist", "type": "invalid_request_error" }
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .await
        .chat_completion(request())
        .await
        .unwrap_err();

    match err {
        OpenAIError::Api { status, message } => {
            assert_eq!(status, 404);
            assert!(message.contains("does not exist"));
        }
        other => panic!("expected API error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_choices_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .await
        .chat_completion(request())
        .await
        .unwrap_err();

    assert!(matches!(err, OpenAIError::Parse(_)));
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let client = OpenAIClient::new("sk-test").with_base_url("http://127.0.0.1:1");

    let err = client.chat_completion(request()).await.unwrap_err();

    assert!(matches!(err, OpenAIError::Network(_)));
}
