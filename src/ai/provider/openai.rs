//! OpenAI API Provider
//!
//! LLM provider using an OpenAI-compatible Chat Completions API in JSON mode.
//! The response schema travels in the system message.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::{
    ErrorClassifier, LlmProvider, LlmResponse, ProviderConfig, ResponseMetadata, ResponseTiming,
    TokenUsage, build_schema_instruction, missing_key_error,
};
use crate::ai::validation::extract_json_from_response;
use crate::constants::llm as defaults;
use crate::types::{Result, RoastError, truncate_chars};

const PROVIDER: &str = "openai";

/// OpenAI API Provider with secure API key handling
pub struct OpenAiProvider {
    /// API key stored securely - never exposed in logs or debug output
    api_key: Option<SecretString>,
    api_base: String,
    model: String,
    temperature: f32,
    max_tokens: usize,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl OpenAiProvider {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let api_base = config
            .api_base
            .unwrap_or_else(|| defaults::OPENAI_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        let model = config
            .model
            .unwrap_or_else(|| defaults::OPENAI_DEFAULT_MODEL.to_string());

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RoastError::LlmApi(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key: config.api_key.map(SecretString::from),
            api_base,
            model,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            client,
        })
    }

    fn api_key(&self) -> Result<&SecretString> {
        self.api_key
            .as_ref()
            .ok_or_else(|| missing_key_error(PROVIDER, "OPENAI_API_KEY"))
    }

    fn build_request(&self, prompt: &str, schema: &Value) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: build_schema_instruction(schema),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            temperature: self.temperature,
            max_tokens: Some(self.max_tokens),
            response_format: Some(ResponseFormat {
                format_type: "json_object".to_string(),
            }),
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn generate(&self, prompt: &str, schema: &Value) -> Result<LlmResponse> {
        let api_key = self.api_key()?;
        info!(
            "Generating with OpenAI (model: {}, temperature: {})",
            self.model, self.temperature
        );

        let start_time = Instant::now();
        let request = self.build_request(prompt, schema);
        let url = format!("{}/chat/completions", self.api_base);

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| RoastError::Llm(ErrorClassifier::classify_transport(&e, PROVIDER)))?;

        let elapsed = start_time.elapsed();

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RoastError::Llm(ErrorClassifier::classify_http_status(
                status.as_u16(),
                truncate_chars(&body, 500),
                PROVIDER,
            )));
        }

        let response_body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| RoastError::LlmApi(format!("Failed to parse OpenAI response: {}", e)))?;

        let usage = response_body
            .usage
            .map(|u| TokenUsage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        let content_str = response_body
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| RoastError::LlmApi("No content in OpenAI response".to_string()))?;

        debug!("Received response from OpenAI, parsing JSON");
        let content = extract_json_from_response(content_str)?;

        Ok(LlmResponse {
            content,
            usage,
            timing: ResponseTiming::from_duration(elapsed),
            metadata: ResponseMetadata {
                model: self.model.clone(),
                provider: PROVIDER.to_string(),
            },
        })
    }

    fn name(&self) -> &str {
        PROVIDER
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn health_check(&self) -> Result<bool> {
        let Ok(api_key) = self.api_key() else {
            warn!("OpenAI API key is not configured");
            return Ok(false);
        };
        let url = format!("{}/models", self.api_base);

        let response = self
            .client
            .get(&url)
            .bearer_auth(api_key.expose_secret())
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => {
                info!("OpenAI API is available");
                Ok(true)
            }
            Ok(resp) => {
                warn!("OpenAI API check failed: {}", resp.status());
                Ok(false)
            }
            Err(e) => {
                warn!("OpenAI API check failed: {}", e);
                Ok(false)
            }
        }
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    usage: Option<UsageInfo>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UsageInfo {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ErrorCategory;
    use serde_json::json;

    fn provider(api_key: Option<&str>) -> OpenAiProvider {
        OpenAiProvider::new(ProviderConfig {
            provider: PROVIDER.to_string(),
            api_key: api_key.map(String::from),
            api_base: Some("https://llm.example.com/v1/".to_string()),
            ..ProviderConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_request_shape() {
        let provider = provider(Some("sk-test"));
        let request = provider.build_request("review this", &json!({"type": "object"}));
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "system");
        assert!(body["messages"][0]["content"].as_str().unwrap().contains("\"object\""));
        assert_eq!(body["messages"][1]["content"], "review this");
        assert_eq!(body["response_format"]["type"], "json_object");
        assert_eq!(provider.api_base, "https://llm.example.com/v1");
    }

    #[test]
    fn test_response_parsing() {
        let body: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{"message": {"role": "assistant", "content": "{\"verdict\":\"Ship It\"}"}}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 5, "total_tokens": 17}
        }))
        .unwrap();
        assert_eq!(body.usage.unwrap().prompt_tokens, 12);
        assert_eq!(
            body.choices[0].message.content.as_deref(),
            Some("{\"verdict\":\"Ship It\"}")
        );
    }

    #[tokio::test]
    async fn test_missing_key_is_auth_error() {
        let provider = provider(None);
        let err = provider.generate("p", &Value::Null).await.unwrap_err();
        match err {
            RoastError::Llm(llm) => assert_eq!(llm.category, ErrorCategory::Auth),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!provider.health_check().await.unwrap());
    }

    #[test]
    fn test_debug_redacts_key() {
        let debug = format!("{:?}", provider(Some("sk-secret")));
        assert!(!debug.contains("sk-secret"));
    }
}
