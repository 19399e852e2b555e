//! HTTP adapter tests against mock backends
//!
//! Each backend family is served by a `wiremock` server; requests go through
//! the full gateway (registry, orchestrator, adapter, normalizer).

#[cfg(test)]
mod tests {
    use crate::common::assertions::{AIResponseAssertions, assert_exhausted};
    use crate::common::fixtures::request;
    use crate::{assert_err, assert_ok};
    use applytrack_ai::config::{Config, ProviderConfig};
    use applytrack_ai::{ErrorCategory, Gateway};
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gateway(providers: Vec<ProviderConfig>, retries: u32) -> Gateway {
        let mut config = Config::default();
        config.gateway.orchestrator.same_provider_retries = retries;
        config.gateway.providers = providers;
        Gateway::new(config).expect("gateway")
    }

    fn openai_body(text: &str) -> serde_json::Value {
        json!({
            "id": "chatcmpl-123",
            "model": "gpt-4o-mini",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": text},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 12, "completion_tokens": 30, "total_tokens": 42}
        })
    }

    #[tokio::test]
    async fn test_openrouter_success_with_attribution_headers() {
        let server = MockServer::start().await;
        let mut body = openai_body("Led a five-person team to ship ...");
        body["provider"] = json!("Azure");
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-or-test"))
            .and(header("http-referer", "https://applytrack.example"))
            .and(header("x-title", "ApplyTrack"))
            .and(body_partial_json(json!({"model": "openai/gpt-4o-mini"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(body)
                    .insert_header("x-request-id", "req-or-1"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let gateway = gateway(
            vec![
                ProviderConfig::new("openrouter", "openrouter", "openai/gpt-4o-mini")
                    .with_api_key("sk-or-test")
                    .with_base_url(server.uri())
                    .with_setting("site_url", "https://applytrack.example")
                    .with_setting("site_name", "ApplyTrack"),
            ],
            0,
        );

        let response = assert_ok!(gateway.orchestrator().dispatch(&request()).await);
        response.assert_served_by("openrouter");
        response.assert_has_usage();
        assert_eq!(response.text, "Led a five-person team to ship ...");
        assert_eq!(response.metadata["request_id"], "req-or-1");
        assert_eq!(response.metadata["upstream_provider"], "Azure");
    }

    #[tokio::test]
    async fn test_openai_auth_failure_falls_back_to_anthropic() {
        let openai = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}
            })))
            .expect(1)
            .mount(&openai)
            .await;

        let anthropic = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "sk-ant-test"))
            .and(header("anthropic-version", "2023-06-01"))
            .and(body_partial_json(json!({"model": "claude-3-5-haiku-latest"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "msg_01",
                "type": "message",
                "role": "assistant",
                "model": "claude-3-5-haiku-latest",
                "content": [{"type": "text", "text": "Dear hiring manager,"}],
                "stop_reason": "end_turn",
                "usage": {"input_tokens": 20, "output_tokens": 8}
            })))
            .expect(2)
            .mount(&anthropic)
            .await;

        let gateway = gateway(
            vec![
                ProviderConfig::new("openai", "openai", "gpt-4o-mini")
                    .with_api_key("sk-revoked")
                    .with_base_url(openai.uri()),
                ProviderConfig::new("anthropic", "anthropic", "claude-3-5-haiku-latest")
                    .with_api_key("sk-ant-test")
                    .with_base_url(anthropic.uri())
                    .with_priority(1),
            ],
            1,
        );

        let response = assert_ok!(gateway.orchestrator().dispatch(&request()).await);
        response.assert_served_by("anthropic");
        assert_eq!(response.text, "Dear hiring manager,");
        assert_eq!(response.usage.and_then(|u| u.total_tokens), Some(28));

        // OpenAI is disabled for the process lifetime; no second call
        assert_ok!(gateway.orchestrator().dispatch(&request()).await)
            .assert_served_by("anthropic");
        assert_eq!(
            gateway.health().state("openai").disabled,
            Some(ErrorCategory::AuthError)
        );
    }

    #[tokio::test]
    async fn test_gemini_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
            .and(header("x-goog-api-key", "g-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": "Match score: "}, {"text": "82"}]},
                    "finishReason": "STOP"
                }],
                "usageMetadata": {"promptTokenCount": 50, "candidatesTokenCount": 4, "totalTokenCount": 54},
                "modelVersion": "gemini-1.5-flash-002"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = gateway(
            vec![
                ProviderConfig::new("gemini", "gemini", "models/gemini-1.5-flash")
                    .with_api_key("g-test")
                    .with_base_url(server.uri()),
            ],
            0,
        );

        let response = assert_ok!(gateway.orchestrator().dispatch(&request()).await);
        assert_eq!(response.text, "Match score: 82");
        assert_eq!(response.metadata["finish_reason"], "STOP");
        assert_eq!(response.usage.and_then(|u| u.total_tokens), Some(54));
    }

    #[tokio::test]
    async fn test_rate_limit_honors_retry_after() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(429)
                    .insert_header("retry-after", "17")
                    .set_body_string("slow down"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let gateway = gateway(
            vec![
                ProviderConfig::new("openai", "openai", "gpt-4o-mini")
                    .with_api_key("sk-test")
                    .with_base_url(server.uri()),
            ],
            1,
        );

        let err = assert_err!(gateway.orchestrator().dispatch(&request()).await);
        assert_exhausted(&err, &[("openai", ErrorCategory::RateLimited)]);

        let remaining = gateway
            .health()
            .state("openai")
            .cooldown_remaining_ms
            .expect("cooling down");
        assert!(remaining > 16_000 && remaining <= 17_000);
    }

    #[tokio::test]
    async fn test_server_error_is_retried_then_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal upstream failure"))
            .expect(2)
            .mount(&server)
            .await;

        let gateway = gateway(
            vec![
                ProviderConfig::new("openai", "openai", "gpt-4o-mini")
                    .with_api_key("sk-test")
                    .with_base_url(server.uri()),
            ],
            1,
        );

        let err = assert_err!(gateway.orchestrator().dispatch(&request()).await);
        assert_exhausted(&err, &[("openai", ErrorCategory::InvalidResponse)]);
        assert_eq!(err.user_message(), "AI service temporarily unavailable");
        assert_eq!(gateway.health().state("openai").consecutive_failures, 2);
    }

    #[tokio::test]
    async fn test_malformed_success_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount(&server)
            .await;

        let gateway = gateway(
            vec![
                ProviderConfig::new("anthropic", "anthropic", "claude-3-5-haiku-latest")
                    .with_api_key("sk-ant-test")
                    .with_base_url(server.uri()),
            ],
            0,
        );

        let err = assert_err!(gateway.orchestrator().dispatch(&request()).await);
        assert_exhausted(&err, &[("anthropic", ErrorCategory::InvalidResponse)]);
    }

    #[tokio::test]
    async fn test_slow_backend_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(openai_body("late"))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let gateway = gateway(
            vec![
                ProviderConfig::new("openai", "openai", "gpt-4o-mini")
                    .with_api_key("sk-test")
                    .with_base_url(server.uri())
                    .with_timeout(Duration::from_millis(200)),
            ],
            0,
        );

        let err = assert_err!(gateway.orchestrator().dispatch(&request()).await);
        assert_exhausted(&err, &[("openai", ErrorCategory::Timeout)]);
    }

    #[tokio::test]
    async fn test_refused_connection_is_unavailable() {
        // Nothing listens on a port whose listener was just dropped
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let uri = format!("http://127.0.0.1:{}", port);

        let gateway = gateway(
            vec![
                ProviderConfig::new("openai", "openai", "gpt-4o-mini")
                    .with_api_key("sk-test")
                    .with_base_url(uri),
            ],
            1,
        );

        let err = assert_err!(gateway.orchestrator().dispatch(&request()).await);
        assert_exhausted(&err, &[("openai", ErrorCategory::Unavailable)]);
    }
}
