//! services/api/src/adapters/coaching_llm.rs
//!
//! This module contains the adapter for the coaching LLM.
//! It implements the `CoachingService` port from the `core` crate using any
//! OpenAI-compatible chat-completion endpoint (Gemini by default).

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs},
    Client,
};
use async_trait::async_trait;
use mindreflect_core::ports::{CoachingService, PortError, PortResult};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `CoachingService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiCoachingAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiCoachingAdapter {
    /// Creates a new `OpenAiCoachingAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }

    /// Builds a client for `api_base` authenticated with `api_key`.
    pub fn client_for(api_base: &str, api_key: &str) -> Client<OpenAIConfig> {
        let config = OpenAIConfig::new()
            .with_api_base(api_base.trim_end_matches('/'))
            .with_api_key(api_key);
        Client::with_config(config)
    }
}

//=========================================================================================
// `CoachingService` Trait Implementation
//=========================================================================================

#[async_trait]
impl CoachingService for OpenAiCoachingAdapter {
    /// Sends the rendered prompt as a single user message.
    async fn generate(&self, prompt: &str) -> PortResult<String> {
        let messages = vec![ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?
            .into()];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| {
                PortError::InvalidResponse(
                    "Coaching LLM response contained no text content.".to_string(),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn completion_body(content: &str) -> String {
        serde_json::json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "created": 1_700_000_000,
            "model": "gemini-2.5-pro",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }],
            "usage": { "prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15 }
        })
        .to_string()
    }

    #[tokio::test]
    async fn returns_trimmed_first_choice() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .match_body(Matcher::PartialJson(serde_json::json!({ "model": "gemini-2.5-pro" })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body("  It sounds like today asked a lot of you.  "))
            .create_async()
            .await;

        let client = OpenAiCoachingAdapter::client_for(&format!("{}/", server.url()), "test-key");
        let adapter = OpenAiCoachingAdapter::new(client, "gemini-2.5-pro".to_string());
        let message = adapter.generate("Journal Entry:\nrough day").await.unwrap();

        mock.assert_async().await;
        assert_eq!(message, "It sounds like today asked a lot of you.");
    }

    #[tokio::test]
    async fn empty_content_is_an_invalid_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body("   "))
            .create_async()
            .await;

        let client = OpenAiCoachingAdapter::client_for(&server.url(), "test-key");
        let adapter = OpenAiCoachingAdapter::new(client, "gemini-2.5-pro".to_string());
        let err = adapter.generate("prompt").await.unwrap_err();
        assert!(matches!(err, PortError::InvalidResponse(_)));
    }
}
