//! Gemini API Provider
//!
//! LLM provider using the Generative Language `generateContent` endpoint.
//! The response schema is enforced server-side through
//! `generationConfig.responseSchema`, so the prompt carries no schema text.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::{
    ErrorClassifier, LlmProvider, LlmResponse, ProviderConfig, ResponseMetadata, ResponseTiming,
    TokenUsage, missing_key_error,
};
use crate::ai::validation::extract_json_from_response;
use crate::constants::llm as defaults;
use crate::types::{Result, RoastError, truncate_chars};

const PROVIDER: &str = "gemini";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini API Provider with secure API key handling
pub struct GeminiProvider {
    api_key: Option<SecretString>,
    api_base: String,
    model: String,
    temperature: f32,
    max_tokens: usize,
    client: reqwest::Client,
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl GeminiProvider {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let api_base = config
            .api_base
            .unwrap_or_else(|| defaults::GEMINI_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        let model = config
            .model
            .unwrap_or_else(|| defaults::GEMINI_DEFAULT_MODEL.to_string());
        let model = model.strip_prefix("models/").unwrap_or(&model).to_string();

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
            .ok_or_else(|| missing_key_error(PROVIDER, "GOOGLE_API_KEY"))
    }

    fn model_url(&self) -> String {
        format!("{}/models/{}", self.api_base, self.model)
    }

    fn build_request(&self, prompt: &str, schema: &Value) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_tokens,
                response_mime_type: "application/json".to_string(),
                response_schema: (!schema.is_null()).then(|| to_gemini_schema(schema)),
            },
        }
    }
}

/// Convert a JSON Schema into the OpenAPI subset Gemini accepts
///
/// Type names are upper-cased and keywords Gemini rejects are dropped.
/// Property names are left untouched.
pub fn to_gemini_schema(schema: &Value) -> Value {
    let Value::Object(map) = schema else {
        return schema.clone();
    };

    let mut out = Map::new();
    for (key, value) in map {
        let converted = match key.as_str() {
            "$schema" | "additionalProperties" | "title" => continue,
            "type" => match value.as_str() {
                Some(name) => Value::String(name.to_uppercase()),
                None => value.clone(),
            },
            "properties" => match value {
                Value::Object(props) => Value::Object(
                    props
                        .iter()
                        .map(|(name, prop)| (name.clone(), to_gemini_schema(prop)))
                        .collect(),
                ),
                other => other.clone(),
            },
            "items" => to_gemini_schema(value),
            _ => value.clone(),
        };
        out.insert(key.clone(), converted);
    }
    Value::Object(out)
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn generate(&self, prompt: &str, schema: &Value) -> Result<LlmResponse> {
        let api_key = self.api_key()?;
        info!(
            "Generating with Gemini (model: {}, temperature: {})",
            self.model, self.temperature
        );

        let start_time = Instant::now();
        let request = self.build_request(prompt, schema);
        let url = format!("{}:generateContent", self.model_url());

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, api_key.expose_secret())
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

        let response_body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| RoastError::LlmApi(format!("Failed to parse Gemini response: {}", e)))?;

        let usage = response_body
            .usage_metadata
            .as_ref()
            .map(|u| TokenUsage {
                input_tokens: u.prompt_token_count,
                output_tokens: u.candidates_token_count,
            })
            .unwrap_or_default();

        let text = response_body.text()?;
        debug!("Received response from Gemini, parsing JSON");
        let content = extract_json_from_response(&text)?;

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
            warn!("Gemini API key is not configured");
            return Ok(false);
        };

        let response = self
            .client
            .get(self.model_url())
            .header(API_KEY_HEADER, api_key.expose_secret())
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => {
                info!("Gemini API is available (model: {})", self.model);
                Ok(true)
            }
            Ok(resp) => {
                warn!("Gemini API check failed: {}", resp.status());
                Ok(false)
            }
            Err(e) => {
                warn!("Gemini API check failed: {}", e);
                Ok(false)
            }
        }
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: usize,
    response_mime_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
    prompt_feedback: Option<PromptFeedback>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate
    fn text(&self) -> Result<String> {
        if let Some(reason) = self
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            return Err(RoastError::LlmApi(format!("Prompt blocked by Gemini: {}", reason)));
        }

        let candidate = self
            .candidates
            .first()
            .ok_or_else(|| RoastError::LlmApi("No candidates in Gemini response".to_string()))?;

        let text: String = candidate
            .content
            .iter()
            .flat_map(|c| c.parts.iter())
            .filter_map(|p| p.text.as_deref())
            .collect();

        if text.trim().is_empty() {
            return Err(RoastError::LlmApi(format!(
                "No content in Gemini response (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            )));
        }
        Ok(text)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}
