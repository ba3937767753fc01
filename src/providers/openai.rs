use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

use async_openai::types::chat::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest,
    CreateChatCompletionRequestArgs,
};

use crate::config::{Config, DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::error::{JustBeginError, Result};
use crate::interfaces::providers::{
    ChatMessage, ChatRole, CompletionProvider, CompletionRequest,
};

/// Chat-completions client for OpenAI and API-compatible servers.
#[derive(Clone)]
pub struct OpenAiProvider {
    model: String,
    api_key: String,
    base_url: String,
    http: reqwest::Client,
}

impl OpenAiProvider {
    pub fn new(api_key: String, model: Option<String>, base_url: Option<String>) -> Self {
        Self::with_http_client(api_key, model, base_url, reqwest::Client::new())
    }

    fn with_http_client(
        api_key: String,
        model: Option<String>,
        base_url: Option<String>,
        http: reqwest::Client,
    ) -> Self {
        let model = model.unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        Self {
            model,
            api_key,
            base_url,
            http,
        }
    }

    /// Builds the provider from configuration. Returns `Ok(None)` when no
    /// credential is configured.
    pub fn from_config(config: &Config) -> Result<Option<Self>> {
        let Some(api_key) = config.api_key() else {
            return Ok(None);
        };

        let mut builder = reqwest::Client::builder()
            .user_agent(format!("just-begin/{}", env!("CARGO_PKG_VERSION")));
        if let Some(secs) = config.openai.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| JustBeginError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Some(Self::with_http_client(
            api_key.to_string(),
            Some(config.model().to_string()),
            Some(config.base_url().to_string()),
            http,
        )))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_message(message: &ChatMessage) -> Result<ChatCompletionRequestMessage> {
        let built = match message.role {
            ChatRole::System => ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(message.content.as_str())
                    .build()
                    .map_err(|e| JustBeginError::Runtime(e.to_string()))?,
            ),
            ChatRole::User => ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessageArgs::default()
                    .content(ChatCompletionRequestUserMessageContent::Text(
                        message.content.clone(),
                    ))
                    .build()
                    .map_err(|e| JustBeginError::Runtime(e.to_string()))?,
            ),
            ChatRole::Assistant => ChatCompletionRequestMessage::Assistant(
                ChatCompletionRequestAssistantMessageArgs::default()
                    .content(message.content.as_str())
                    .build()
                    .map_err(|e| JustBeginError::Runtime(e.to_string()))?,
            ),
        };
        Ok(built)
    }

    fn build_request(&self, request: &CompletionRequest) -> Result<CreateChatCompletionRequest> {
        let messages = request
            .messages
            .iter()
            .map(Self::build_message)
            .collect::<Result<Vec<_>>>()?;

        let mut builder = CreateChatCompletionRequestArgs::default();
        builder.model(self.model.clone());
        builder.messages(messages);
        builder.temperature(request.temperature);
        if let Some(max_tokens) = request.max_tokens {
            builder.max_completion_tokens(max_tokens);
        }

        builder
            .build()
            .map_err(|e| JustBeginError::Runtime(e.to_string()))
    }

    fn extract_text_from_value(response: &Value) -> Option<String> {
        response
            .get("choices")
            .and_then(|v| v.get(0))
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(|content| content.as_str())
            .map(|text| text.to_string())
    }

    /// Upstream error bodies are forwarded as-is when they are JSON.
    fn upstream_payload(body: &str) -> Value {
        serde_json::from_str::<Value>(body)
            .ok()
            .filter(|value| value.is_object())
            .unwrap_or_else(|| json!({"error": {"message": body.trim()}}))
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let payload = self.build_request(request)?;
        let url = format!("{}/chat/completions", self.base_url);
        tracing::debug!(
            model = %self.model,
            messages = request.messages.len(),
            max_tokens = ?request.max_tokens,
            "Sending chat completion"
        );

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| JustBeginError::Http(format!("Chat completion transport failed: {e}")))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| JustBeginError::Http(format!("Chat completion read failed: {e}")))?;

        if !status.is_success() {
            let payload = Self::upstream_payload(&body);
            tracing::error!(status = status.as_u16(), %payload, "Chat completion failed");
            return Err(JustBeginError::Upstream {
                status: status.as_u16(),
                payload,
            });
        }

        let value: Value = serde_json::from_str(&body).map_err(|e| {
            JustBeginError::Serialization(format!("Chat completion decode failed: {e}"))
        })?;
        match Self::extract_text_from_value(&value) {
            Some(text) => Ok(text),
            None => {
                tracing::warn!(model = %self.model, "Chat completion returned no choice");
                Err(JustBeginError::EmptyCompletion)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::OpenAiProvider;
    use crate::config::{Config, OpenAiConfig};
    use crate::interfaces::providers::{ChatMessage, CompletionRequest};
    use serde_json::json;

    #[test]
    fn extracts_first_choice_content() {
        let value = json!({
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "first"}},
                {"index": 1, "message": {"role": "assistant", "content": "second"}}
            ]
        });
        assert_eq!(
            OpenAiProvider::extract_text_from_value(&value).as_deref(),
            Some("first")
        );
        assert_eq!(
            OpenAiProvider::extract_text_from_value(&json!({"choices": []})),
            None
        );
        assert_eq!(
            OpenAiProvider::extract_text_from_value(&json!({
                "choices": [{"index": 0, "message": {"role": "assistant", "content": null}}]
            })),
            None
        );
    }

    #[test]
    fn wraps_non_json_error_bodies() {
        assert_eq!(
            OpenAiProvider::upstream_payload("Bad Gateway\n"),
            json!({"error": {"message": "Bad Gateway"}})
        );
        let forwarded = OpenAiProvider::upstream_payload(r#"{"error":{"message":"quota"}}"#);
        assert_eq!(forwarded["error"]["message"], "quota");
    }

    #[test]
    fn request_carries_role_order_and_limits() {
        let provider = OpenAiProvider::new("key".to_string(), None, None);
        let request = provider
            .build_request(&CompletionRequest {
                messages: vec![
                    ChatMessage::system("advisor"),
                    ChatMessage::user("bakery"),
                    ChatMessage::assistant("ask"),
                ],
                temperature: 0.7,
                max_tokens: Some(4000),
            })
            .unwrap();
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "gpt-3.5-turbo");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["role"], "user");
        assert_eq!(value["messages"][1]["content"], "bakery");
        assert_eq!(value["messages"][2]["role"], "assistant");
        assert_eq!(value["max_completion_tokens"], 4000);
    }

    #[test]
    fn no_provider_without_key() {
        let config = Config::default();
        assert!(OpenAiProvider::from_config(&config).unwrap().is_none());

        let config = Config {
            openai: OpenAiConfig {
                api_key: Some("sk-test".to_string()),
                model: Some("gpt-4o-mini".to_string()),
                base_url: None,
                timeout_secs: Some(10),
            },
            ..Config::default()
        };
        let provider = OpenAiProvider::from_config(&config).unwrap().unwrap();
        assert_eq!(provider.model(), "gpt-4o-mini");
    }
}
