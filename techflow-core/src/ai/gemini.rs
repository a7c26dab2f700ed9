use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    DraftError, DraftGenerator, DraftRequest, GeneratedDraft, build_draft_prompt,
    parse_draft_response,
};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone)]
pub struct DraftConfig {
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Gemini draft generator: one request, one response, no retry or backoff.
/// Failures are surfaced once to the initiating user action.
pub struct GeminiDraftClient {
    client: Client,
    api_key: Option<SecretString>,
    base_url: String,
    config: DraftConfig,
}

impl GeminiDraftClient {
    pub fn new(api_key: Option<SecretString>, config: DraftConfig) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string(), config)
    }

    pub fn with_base_url(
        api_key: Option<SecretString>,
        base_url: String,
        config: DraftConfig,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            api_key,
            base_url,
            config,
        }
    }

    async fn call_api(&self, prompt: &str) -> Result<String, DraftError> {
        let api_key = self.api_key.as_ref().ok_or(DraftError::MissingApiKey)?;

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
            },
        };

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url,
            self.config.model,
            api_key.expose_secret()
        );

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|err| DraftError::Api(err.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DraftError::Api(format!("API returned {status}: {body}")));
        }

        let api_response: GenerateContentResponse = response
            .json()
            .await
            .map_err(|err| DraftError::InvalidFormat(err.to_string()))?;

        let text = api_response
            .candidates
            .into_iter()
            .flat_map(|candidate| candidate.content.parts)
            .map(|part| part.text)
            .collect::<Vec<_>>()
            .join("");

        if text.is_empty() {
            return Err(DraftError::InvalidFormat("empty response".to_string()));
        }
        Ok(text)
    }
}

#[async_trait]
impl DraftGenerator for GeminiDraftClient {
    async fn generate(&self, request: DraftRequest) -> Result<GeneratedDraft, DraftError> {
        let prompt = build_draft_prompt(&request);
        debug!(title = %request.title, model = %self.config.model, "requesting AI draft");
        let text = self.call_api(&prompt).await?;
        parse_draft_response(&text)
    }
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<Part>,
}
