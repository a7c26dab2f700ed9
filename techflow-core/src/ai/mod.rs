//! One-shot draft generation against a generative-text API. The result is
//! merged into the caller's pending form state; nothing here touches the
//! persistence store.

pub mod gemini;

pub use gemini::{DraftConfig, GeminiDraftClient};

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::post::Category;

#[derive(Debug, Error)]
pub enum DraftError {
    /// Raised before any network call when no API credential is configured.
    #[error("AI credential is not configured (set GEMINI_API_KEY)")]
    MissingApiKey,

    #[error("AI request failed: {0}")]
    Api(String),

    #[error("AI response is not in the expected format: {0}")]
    InvalidFormat(String),
}

#[derive(Debug, Clone)]
pub struct DraftRequest {
    pub title: String,
    pub category: Category,
    pub keywords: String,
}

/// Structured output the model is asked to produce.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeneratedDraft {
    pub content: String,
    pub excerpt: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[async_trait]
pub trait DraftGenerator: Send + Sync {
    async fn generate(&self, request: DraftRequest) -> Result<GeneratedDraft, DraftError>;
}

pub(crate) fn build_draft_prompt(request: &DraftRequest) -> String {
    format!(
        r#"You are a professional tech blogger. Write a high-quality, engaging blog post about "{title}".
Category: {category}
Keywords/Focus: {keywords}

The output must be a JSON object with the following structure:
{{
  "content": "Full blog post content in Markdown format. Use headings, lists, and code blocks where appropriate.",
  "excerpt": "A compelling 1-2 sentence summary of the post.",
  "tags": ["tag1", "tag2", "tag3", "tag4", "tag5"]
}}

Ensure the content is informative, technical but accessible, and structured well.
Respond with ONLY the JSON object."#,
        title = request.title,
        category = request.category,
        keywords = request.keywords,
    )
}

pub(crate) fn parse_draft_response(response: &str) -> Result<GeneratedDraft, DraftError> {
    serde_json::from_str(extract_json(response))
        .map_err(|err| DraftError::InvalidFormat(err.to_string()))
}

// Some models wrap the JSON payload in a markdown fence despite the
// response-shape hint.
fn extract_json(response: &str) -> &str {
    let trimmed = response.trim();
    if let Some(rest) = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
    {
        if let Some(end) = rest.rfind("```") {
            return rest[..end].trim();
        }
    }
    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request() -> DraftRequest {
        DraftRequest {
            title: "Rust on the Edge".to_string(),
            category: Category::CloudComputing,
            keywords: "wasm, latency".to_string(),
        }
    }

    #[test]
    fn prompt_embeds_title_category_and_keywords() {
        let prompt = build_draft_prompt(&sample_request());
        assert!(prompt.contains("\"Rust on the Edge\""));
        assert!(prompt.contains("Category: Cloud Computing"));
        assert!(prompt.contains("Keywords/Focus: wasm, latency"));
        assert!(prompt.contains("\"tags\""));
    }

    #[test]
    fn parse_accepts_plain_json() {
        let draft = parse_draft_response(
            r##"{"content":"# Hi","excerpt":"sum","tags":["a","b"]}"##,
        )
        .expect("must parse");
        assert_eq!(draft.content, "# Hi");
        assert_eq!(draft.tags, vec!["a", "b"]);
    }

    #[test]
    fn parse_unwraps_fenced_json() {
        let raw = "```json\n{\"content\":\"# Hi\",\"excerpt\":\"sum\",\"tags\":[]}\n```";
        let draft = parse_draft_response(raw).expect("must parse");
        assert_eq!(draft.excerpt, "sum");
    }

    #[test]
    fn parse_defaults_missing_tags() {
        let draft = parse_draft_response(r#"{"content":"c","excerpt":"e"}"#)
            .expect("must parse");
        assert!(draft.tags.is_empty());
    }

    #[test]
    fn parse_rejects_non_json() {
        let err = parse_draft_response("sorry, I cannot help with that")
            .expect_err("must fail");
        assert!(matches!(err, DraftError::InvalidFormat(_)));
    }
}
