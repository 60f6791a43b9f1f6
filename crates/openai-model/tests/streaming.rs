use std::future::poll_fn;
use std::pin::pin;

use devnews_model::{
    ErrorKind, ModelProvider, ModelProviderError, ModelRequest,
    ModelResponse, ModelResponseEvent,
};
use devnews_openai_model::{OpenAIConfigBuilder, OpenAIProvider};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const STREAM_BODY: &str = concat!(
    "data: {\"id\":\"x\",\"choices\":[{\"delta\":{\"content\":\"<div>\"},\"finish_reason\":null}]}\n\n",
    "data: {\"id\":\"x\",\"choices\":[{\"delta\":{\"content\":\"hi</div>\"},\"finish_reason\":null}]}\n\n",
    "data: {\"id\":\"x\",\"choices\":[{\"delta\":{},\"finish_reason\":\"stop\"}]}\n\n",
    "data: [DONE]\n\n",
);

fn provider_for(server: &MockServer) -> OpenAIProvider {
    let config = OpenAIConfigBuilder::with_api_key("sk-test")
        .with_base_url(format!("{}/v1", server.uri()))
        .with_model("test-model")
        .build();
    OpenAIProvider::new(config)
}

#[tokio::test]
async fn test_streamed_completion() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "test-model",
            "stream": true
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(STREAM_BODY, "text/event-stream"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let req = ModelRequest::with_prompt("sys", "hello");
    let resp = provider.send_request(&req).await.unwrap();

    let mut resp = pin!(resp);
    let mut text = String::new();
    while let Some(event) = poll_fn(|cx| resp.as_mut().poll_next_event(cx))
        .await
        .unwrap()
    {
        if let ModelResponseEvent::MessageDelta(delta) = event {
            text.push_str(&delta);
        }
    }
    assert_eq!(text, "<div>hi</div>");
}

#[tokio::test]
async fn test_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "message": "slow down", "code": "rate_limit_exceeded" }
        })))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let req = ModelRequest::with_prompt("sys", "hello");
    let err = provider.send_request(&req).await.err().unwrap();
    assert_eq!(err.kind(), ErrorKind::RateLimitExceeded);
    assert!(err.message().contains("slow down"));
}

#[tokio::test]
async fn test_unexpected_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "x" })),
        )
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let req = ModelRequest::with_prompt("sys", "hello");
    let err = provider.send_request(&req).await.err().unwrap();
    assert_eq!(err.kind(), ErrorKind::Other);
    assert!(err.message().starts_with("Unexpected content type"));
}
