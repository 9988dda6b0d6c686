use compass_core::config::{LLMConfig, DEFAULT_OLLAMA_MODEL};
use compass_core::llm::{OpenAIClient, Provider, StreamChunk};
use compass_core::{LLMError, LLM};
use httpmock::prelude::*;
use serde_json::json;
use tokio::sync::mpsc;

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }]
    })
}

mod openai {
    use super::*;

    #[tokio::test]
    async fn test_complete() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/chat/completions")
                    .header("authorization", "Bearer test-key")
                    .body_contains("\"model\":\"llama3-8b-8192\"")
                    .body_contains("\"role\":\"user\"");
                then.status(200).json_body(completion("hi there"));
            })
            .await;

        let client = OpenAIClient::new(server.url("/v1"), "test-key", "llama3-8b-8192");
        let reply = client.complete("hello").await.unwrap();

        assert_eq!(reply, "hi there");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_complete_with_system_sends_both_messages() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/chat/completions")
                    .body_contains("\"role\":\"system\"")
                    .body_contains("You are terse.");
                then.status(200).json_body(completion("ok"));
            })
            .await;

        let client = OpenAIClient::new(server.base_url(), "k", "m");
        let reply = client.complete_with_system("You are terse.", "hi").await.unwrap();

        assert_eq!(reply, "ok");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_key_omits_authorization() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions").matches(|req| {
                    req.headers
                        .as_ref()
                        .map_or(true, |headers| !headers.iter().any(|(name, _)| name.eq_ignore_ascii_case("authorization")))
                });
                then.status(200).json_body(completion("local"));
            })
            .await;

        let client = OpenAIClient::new(server.base_url(), "", DEFAULT_OLLAMA_MODEL);
        assert_eq!(client.complete("hi").await.unwrap(), "local");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rate_limited() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions");
                then.status(429).body("slow down");
            })
            .await;

        let client = OpenAIClient::new(server.base_url(), "k", "m");
        let result = client.complete("hi").await;
        assert!(matches!(result, Err(LLMError::RateLimited)));
    }

    #[tokio::test]
    async fn test_api_error_keeps_status_and_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions");
                then.status(500).body("model overloaded");
            })
            .await;

        let client = OpenAIClient::new(server.base_url(), "k", "m");
        match client.complete("hi").await {
            Err(LLMError::ApiError { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "model overloaded");
            }
            other => panic!("expected ApiError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions");
                then.status(200).body("not json");
            })
            .await;

        let client = OpenAIClient::new(server.base_url(), "k", "m");
        assert!(matches!(client.complete("hi").await, Err(LLMError::ParseError(_))));
    }

    #[tokio::test]
    async fn test_stream_complete() {
        let body = concat!(
            "data: {\"choices\":[{\"index\":0,\"delta\":{\"role\":\"assistant\"}}]}\n\n",
            "data: {\"choices\":[{\"index\":0,\"delta\":{\"content\":\"Hel\"}}]}\n\n",
            "data: {\"choices\":[{\"index\":0,\"delta\":{\"content\":\"lo\"}}]}\n\n",
            "data: [DONE]\n\n",
        );

        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/chat/completions")
                    .body_contains("\"stream\":true");
                then.status(200)
                    .header("content-type", "text/event-stream")
                    .body(body);
            })
            .await;

        let client = OpenAIClient::new(server.base_url(), "k", "m");
        assert!(client.supports_streaming());

        let (tx, mut rx) = mpsc::unbounded_channel();
        client.stream_complete("system", "hi", tx).await.unwrap();

        let mut chunks = Vec::new();
        while let Some(chunk) = rx.recv().await {
            chunks.push(chunk);
        }

        let text: String = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(text, "Hello");
        assert_eq!(chunks.last(), Some(&StreamChunk::done()));
        assert_eq!(chunks.iter().filter(|c| c.is_final).count(), 1);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_stream_error_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions");
                then.status(401).body("bad key");
            })
            .await;

        let client = OpenAIClient::new(server.base_url(), "k", "m");
        let (tx, _rx) = mpsc::unbounded_channel();
        let result = client.stream_complete("system", "hi", tx).await;
        assert!(matches!(result, Err(LLMError::ApiError { status: 401, .. })));
    }
}

mod provider {
    use super::*;

    #[test]
    fn test_from_default_config() {
        let provider = Provider::from_config(&LLMConfig::default()).unwrap();
        assert_eq!(provider.name(), "groq");
    }

    #[test]
    fn test_compatible_uses_base_url() {
        let config = LLMConfig {
            provider: "openai-compatible".to_string(),
            base_url: Some("http://localhost:8000/v1".to_string()),
            model: Some("local-model".to_string()),
            ..LLMConfig::default()
        };

        let provider = Provider::from_config(&config).unwrap();
        assert!(matches!(
            provider,
            Provider::Compatible { ref base_url, ref model, .. }
                if base_url == "http://localhost:8000/v1" && model == "local-model"
        ));
        assert!(provider.build().is_ok());
    }

    #[tokio::test]
    async fn test_groq_honours_base_url_override() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/openai/v1/chat/completions")
                    .header("authorization", "Bearer gsk-test")
                    .body_contains("\"model\":\"llama3-8b-8192\"");
                then.status(200).json_body(completion("routed"));
            })
            .await;

        let config = LLMConfig {
            base_url: Some(server.url("/openai/v1")),
            api_key: Some("gsk-test".to_string()),
            ..LLMConfig::default()
        };
        let llm = Provider::from_config(&config).unwrap().build().unwrap();

        assert_eq!(llm.complete("hello").await.unwrap(), "routed");
        mock.assert_async().await;
    }

    #[test]
    fn test_provider_name_is_case_insensitive() {
        let config = LLMConfig {
            provider: "Ollama".to_string(),
            ..LLMConfig::default()
        };
        assert_eq!(Provider::from_config(&config).unwrap().name(), "ollama");
    }

    #[test]
    fn test_unknown_provider() {
        let config = LLMConfig {
            provider: "telegraph".to_string(),
            ..LLMConfig::default()
        };
        assert!(matches!(
            Provider::from_config(&config),
            Err(LLMError::UnknownProvider(_))
        ));
    }
}
