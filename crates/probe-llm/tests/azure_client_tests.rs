use mockito::Matcher;
use probe_llm::{
    AzureOpenAIClient, ChatClient, ChatHistory, ChatOptions, ChatRequest, ProbeError,
    StaticCredential,
};
use serde_json::json;
use std::sync::Arc;

const API_VERSION: &str = "2024-10-21";
const COMPLETIONS_PATH: &str = r"^/openai/deployments/joke-deployment/chat/completions";

fn completion_body() -> String {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "created": 1_729_000_000,
        "model": "gpt-4o",
        "system_fingerprint": "fp_1",
        "choices": [{
            "index": 0,
            "finish_reason": "stop",
            "message": {"role": "assistant", "content": "Knock knock."}
        }],
        "usage": {"prompt_tokens": 20, "completion_tokens": 3, "total_tokens": 23}
    })
    .to_string()
}

fn request() -> ChatRequest {
    let mut history = ChatHistory::new("You are a comedian, expert about being funny");
    history.add_user_message("Tell me a joke.");
    ChatRequest::new("joke-deployment", history)
}

fn client_for(url: &str) -> AzureOpenAIClient {
    AzureOpenAIClient::builder()
        .endpoint(format!("{}/", url))
        .api_version(API_VERSION)
        .api_key("test-key")
        .build()
        .unwrap()
}

#[test]
fn test_azure_client_builder_success() {
    let client = AzureOpenAIClient::builder()
        .endpoint("https://test-resource.openai.azure.com/")
        .api_version(API_VERSION)
        .model_id("gpt-4o")
        .api_key("test-key")
        .build()
        .unwrap();

    assert_eq!(client.endpoint(), "https://test-resource.openai.azure.com");
    assert_eq!(client.model_id(), Some("gpt-4o"));
    assert_eq!(
        client.build_url("dep", "chat/completions"),
        "https://test-resource.openai.azure.com/openai/deployments/dep/chat/completions?api-version=2024-10-21"
    );
}

#[test]
fn test_azure_client_builder_missing_endpoint() {
    let err = AzureOpenAIClient::builder()
        .api_version(API_VERSION)
        .api_key("test-key")
        .build()
        .unwrap_err();

    assert!(matches!(err, ProbeError::ConfigurationMissing(ref field) if field == "endpoint"));
}

#[test]
fn test_azure_client_builder_missing_api_version() {
    let err = AzureOpenAIClient::builder()
        .endpoint("https://test-resource.openai.azure.com")
        .api_key("test-key")
        .build()
        .unwrap_err();

    assert!(err.to_string().contains("API version"));
}

#[test]
fn test_azure_client_builder_missing_credential() {
    let err = AzureOpenAIClient::builder()
        .endpoint("https://test-resource.openai.azure.com")
        .api_version(API_VERSION)
        .build()
        .unwrap_err();

    assert!(err.to_string().contains("credential"));
}

#[test]
fn test_azure_client_builder_rejects_non_url_endpoint() {
    let err = AzureOpenAIClient::builder()
        .endpoint("test-resource.openai.azure.com")
        .api_version(API_VERSION)
        .api_key("test-key")
        .build()
        .unwrap_err();

    assert!(matches!(err, ProbeError::InvalidConfiguration(_)));
}

#[tokio::test]
async fn test_complete_sends_conversation_and_maps_result() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Regex(COMPLETIONS_PATH.to_string()))
        .match_query(Matcher::UrlEncoded("api-version".into(), API_VERSION.into()))
        .match_header("api-key", "test-key")
        .match_body(Matcher::Json(json!({
            "messages": [
                {"role": "system", "content": "You are a comedian, expert about being funny"},
                {"role": "user", "content": "Tell me a joke."}
            ]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body())
        .create_async()
        .await;

    let result = client_for(&server.url()).complete(request()).await.unwrap();

    mock.assert_async().await;
    assert_eq!(result.id, "chatcmpl-1");
    assert_eq!(result.first_text(), Some("Knock knock."));
    assert_eq!(result.usage.total_tokens, 23);
}

#[tokio::test]
async fn test_complete_forwards_log_probability_options() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Regex(COMPLETIONS_PATH.to_string()))
        .match_query(Matcher::Any)
        .match_body(Matcher::PartialJson(json!({"logprobs": true, "top_logprobs": 3})))
        .with_status(200)
        .with_body(completion_body())
        .create_async()
        .await;

    let request = request().with_options(ChatOptions::new().log_probabilities(3));
    client_for(&server.url()).complete(request).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_complete_uses_bearer_credential() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Regex(COMPLETIONS_PATH.to_string()))
        .match_query(Matcher::Any)
        .match_header("authorization", "Bearer aad-token")
        .match_header("api-key", Matcher::Missing)
        .with_status(200)
        .with_body(completion_body())
        .create_async()
        .await;

    let client = AzureOpenAIClient::builder()
        .endpoint(server.url())
        .api_version(API_VERSION)
        .credential(Arc::new(StaticCredential::bearer("aad-token")))
        .build()
        .unwrap();
    client.complete(request()).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_unauthorized_is_authentication_failure() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", Matcher::Regex(COMPLETIONS_PATH.to_string()))
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body(r#"{"error":{"code":"401","message":"Access denied"}}"#)
        .create_async()
        .await;

    let err = client_for(&server.url()).complete(request()).await.unwrap_err();
    assert!(matches!(err, ProbeError::AuthenticationFailure(ref msg) if msg.contains("Access denied")));
}

#[tokio::test]
async fn test_server_error_is_service_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", Matcher::Regex(COMPLETIONS_PATH.to_string()))
        .match_query(Matcher::Any)
        .with_status(429)
        .with_body("quota exceeded")
        .create_async()
        .await;

    let err = client_for(&server.url()).complete(request()).await.unwrap_err();
    match err {
        ProbeError::Service { status, body } => {
            assert_eq!(status, 429);
            assert_eq!(body, "quota exceeded");
        }
        other => panic!("expected Service error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unexpected_body_is_malformed_result() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", Matcher::Regex(COMPLETIONS_PATH.to_string()))
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"unexpected": true}"#)
        .create_async()
        .await;

    let err = client_for(&server.url()).complete(request()).await.unwrap_err();
    assert!(matches!(err, ProbeError::MalformedResult(_)));
}

#[tokio::test]
async fn test_invalid_request_fails_before_sending() {
    let client = client_for("http://127.0.0.1:9");

    let empty = ChatRequest::new("joke-deployment", Vec::<probe_llm::Message>::new());
    assert!(matches!(
        client.complete(empty).await.unwrap_err(),
        ProbeError::InvalidInput(_)
    ));

    let too_many = request().with_options(ChatOptions::new().log_probabilities(21));
    assert!(matches!(
        client.complete(too_many).await.unwrap_err(),
        ProbeError::InvalidInput(_)
    ));
}
