use probe_llm::{ChatCompletionV1, ChatRole, CompletionResult, ContentPart, FinishReason, ProbeError};
use serde_json::{json, Value};

fn sample_response() -> Value {
    json!({
        "id": "chatcmpl-AbC123",
        "object": "chat.completion",
        "created": 1_729_000_000,
        "model": "gpt-4o-2024-08-06",
        "system_fingerprint": "fp_67802d9a6d",
        "prompt_filter_results": [],
        "choices": [{
            "index": 0,
            "finish_reason": "stop",
            "message": {
                "role": "assistant",
                "content": "Why did the scarecrow win an award?",
                "refusal": null
            },
            "logprobs": {
                "content": [{
                    "token": "Why",
                    "logprob": -0.0009,
                    "bytes": [87, 104, 121],
                    "top_logprobs": [
                        {"token": "Why", "logprob": -0.0009, "bytes": [87, 104, 121]},
                        {"token": "What", "logprob": -7.25, "bytes": [87, 104, 97, 116]}
                    ]
                }],
                "refusal": null
            },
            "content_filter_results": {}
        }],
        "usage": {
            "prompt_tokens": 24,
            "completion_tokens": 17,
            "total_tokens": 41
        }
    })
}

fn map(value: Value) -> probe_llm::Result<CompletionResult> {
    let body = serde_json::to_vec(&value).unwrap();
    CompletionResult::try_from(ChatCompletionV1::from_slice(&body)?)
}

#[test]
fn test_maps_every_field() {
    let result = map(sample_response()).unwrap();

    assert_eq!(result.id, "chatcmpl-AbC123");
    assert_eq!(result.role, ChatRole::Assistant);
    assert_eq!(result.first_text(), Some("Why did the scarecrow win an award?"));
    assert_eq!(result.model, "gpt-4o-2024-08-06");
    assert_eq!(result.created_at.timestamp(), 1_729_000_000);
    assert_eq!(result.finish_reason, FinishReason::Stop);
    assert_eq!(result.usage.input_tokens, 24);
    assert_eq!(result.usage.output_tokens, 17);
    assert_eq!(result.usage.total_tokens, 41);
    assert_eq!(result.refusal, "");
    assert_eq!(result.system_fingerprint, "fp_67802d9a6d");
    assert!(result.refusal_token_log_probabilities.is_empty());

    let entry = &result.content_token_log_probabilities[0];
    assert_eq!(entry.token, "Why");
    assert_eq!(entry.log_probability, -0.0009);
    assert_eq!(entry.top_log_probabilities.len(), 2);
    assert_eq!(entry.top_log_probabilities[1].token, "What");
}

#[test]
fn test_null_content_maps_to_no_segments() {
    let mut value = sample_response();
    value["choices"][0]["message"]["content"] = Value::Null;
    value["choices"][0]["message"]["refusal"] = json!("I can't help with that.");

    let result = map(value).unwrap();
    assert!(result.content.is_empty());
    assert_eq!(result.refusal, "I can't help with that.");
}

#[test]
fn test_content_parts_are_kept_in_order() {
    let mut value = sample_response();
    value["choices"][0]["message"]["content"] = json!([
        {"type": "text", "text": "first"},
        {"type": "text", "text": "second"}
    ]);

    let result = map(value).unwrap();
    assert_eq!(
        result.content,
        vec![
            ContentPart::Text { text: "first".into() },
            ContentPart::Text { text: "second".into() }
        ]
    );
}

#[test]
fn test_missing_optional_fields_default_to_empty() {
    let mut value = sample_response();
    let obj = value.as_object_mut().unwrap();
    obj.remove("system_fingerprint");
    value["choices"][0].as_object_mut().unwrap().remove("logprobs");

    let result = map(value).unwrap();
    assert_eq!(result.system_fingerprint, "");
    assert!(result.content_token_log_probabilities.is_empty());
}

#[test]
fn test_unknown_finish_reason_is_preserved() {
    let mut value = sample_response();
    value["choices"][0]["finish_reason"] = json!("something_new");

    let result = map(value).unwrap();
    assert_eq!(result.finish_reason.to_string(), "something_new");
}

fn assert_malformed(value: Value, needle: &str) {
    match map(value) {
        Err(ProbeError::MalformedResult(msg)) => {
            assert!(msg.contains(needle), "'{}' does not mention '{}'", msg, needle)
        }
        other => panic!("expected MalformedResult, got {:?}", other),
    }
}

#[test]
fn test_wrong_object_kind_is_malformed() {
    let mut value = sample_response();
    value["object"] = json!("chat.completion.chunk");
    assert_malformed(value, "chat.completion.chunk");
}

#[test]
fn test_no_choices_is_malformed() {
    let mut value = sample_response();
    value["choices"] = json!([]);
    assert_malformed(value, "no choices");
}

#[test]
fn test_missing_usage_is_malformed() {
    let mut value = sample_response();
    value.as_object_mut().unwrap().remove("usage");
    assert_malformed(value, "no usage");
}

#[test]
fn test_missing_finish_reason_is_malformed() {
    let mut value = sample_response();
    value["choices"][0]["finish_reason"] = Value::Null;
    assert_malformed(value, "no finish reason");
}

#[test]
fn test_unknown_part_type_is_malformed() {
    let mut value = sample_response();
    value["choices"][0]["message"]["content"] = json!([{"type": "image_url", "image_url": {}}]);
    assert_malformed(value, "chat.completion");
}

#[test]
fn test_non_json_body_is_malformed() {
    let err = ChatCompletionV1::from_slice(b"<html>gateway timeout</html>").unwrap_err();
    assert!(matches!(err, ProbeError::MalformedResult(_)));
}
