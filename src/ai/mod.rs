mod gemini;
mod groq;

pub use gemini::GeminiProvider;
pub use groq::GroqProvider;

use crate::config::{AiBackend, AiConfig};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;

const SHORT_ANSWER_LIMIT: usize = 200;

/// Provider-independent answer pair. Every reply to the user is built
/// from one of these, whatever the backing model returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiAnswer {
    pub short_answer: String,
    pub detailed_answer: String,
}
impl AiAnswer {
    /// Shown to the user whenever the provider fails. The real error
    /// detail only goes to the logs.
    pub fn fallback() -> Self {
        Self {
            short_answer: "AI error".to_string(),
            detailed_answer: "Please try again later.".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AiError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("provider returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
}

/// One completion call per question. Adapters translate their provider's
/// wire format and normalize the model text into an AiAnswer.
#[async_trait]
pub trait AiProvider: Send + Sync {
    async fn complete(&self, question: &str, language: &str) -> Result<AiAnswer, AiError>;
}

pub fn create_provider(config: &AiConfig, client: reqwest::Client) -> Arc<dyn AiProvider> {
    match config.backend {
        AiBackend::Gemini => Arc::new(GeminiProvider::new(config.clone(), client)),
        AiBackend::Groq => Arc::new(GroqProvider::new(config.clone(), client)),
    }
}

pub(crate) fn build_prompt(question: &str, language: &str) -> String {
    format!(
        "You are a study assistant.\n\
         Answer in {language}.\n\
         Give a short answer and then a detailed explanation.\n\
         Respond with strict JSON: {{\"short_answer\": \"...\", \"detailed_answer\": \"...\"}}.\n\
         \n\
         Question: {question}\n"
    )
}

#[derive(Deserialize)]
struct StructuredAnswer {
    short_answer: String,
    detailed_answer: String,
}

/// Models regularly wrap JSON output in a markdown fence even when asked
/// for strict JSON.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // The opening fence line may carry a language tag.
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

/// Turns raw model text into an AiAnswer. Structured JSON output is used
/// directly; anything else becomes the detailed answer, with the short
/// answer derived as the first non-empty line capped at 200 characters.
pub(crate) fn normalize_answer(text: &str) -> AiAnswer {
    if let Ok(parsed) = serde_json::from_str::<StructuredAnswer>(strip_code_fence(text)) {
        if !parsed.short_answer.is_empty() && !parsed.detailed_answer.is_empty() {
            return AiAnswer {
                short_answer: parsed.short_answer,
                detailed_answer: parsed.detailed_answer,
            };
        }
    }

    AiAnswer {
        short_answer: derive_short_answer(text),
        detailed_answer: text.to_string(),
    }
}

fn derive_short_answer(text: &str) -> String {
    let line = text
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("");

    line.chars().take(SHORT_ANSWER_LIMIT).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_question_and_language() {
        let prompt = build_prompt("What is gravity?", "Hindi");
        assert!(prompt.contains("Question: What is gravity?"));
        assert!(prompt.contains("Answer in Hindi."));
        assert!(prompt.contains("short_answer"));
        assert!(prompt.contains("detailed_answer"));
    }

    #[test]
    fn test_structured_json_is_used_directly() {
        let text = r#"{"short_answer": "A force.", "detailed_answer": "Gravity attracts masses."}"#;
        let answer = normalize_answer(text);
        assert_eq!(answer.short_answer, "A force.");
        assert_eq!(answer.detailed_answer, "Gravity attracts masses.");
    }

    #[test]
    fn test_fenced_json_is_unwrapped() {
        let text = "```json\n{\"short_answer\": \"A force.\", \"detailed_answer\": \"Long form.\"}\n```";
        let answer = normalize_answer(text);
        assert_eq!(answer.short_answer, "A force.");
        assert_eq!(answer.detailed_answer, "Long form.");
    }

    #[test]
    fn test_plain_text_uses_first_line_as_short_answer() {
        let text = "Gravity is a force.\n\nIt attracts any two masses towards each other.";
        let answer = normalize_answer(text);
        assert_eq!(answer.short_answer, "Gravity is a force.");
        assert_eq!(answer.detailed_answer, text);
    }

    #[test]
    fn test_leading_blank_lines_are_skipped() {
        let text = "\n\n  \nShort line.\nRest of it.";
        let answer = normalize_answer(text);
        assert_eq!(answer.short_answer, "Short line.");
    }

    #[test]
    fn test_long_first_line_is_truncated() {
        let text = "x".repeat(500);
        let answer = normalize_answer(&text);
        assert_eq!(answer.short_answer.chars().count(), SHORT_ANSWER_LIMIT);
        assert_eq!(answer.detailed_answer, text);
    }

    #[test]
    fn test_json_with_empty_fields_falls_through_to_plain_text() {
        let text = r#"{"short_answer": "", "detailed_answer": ""}"#;
        let answer = normalize_answer(text);
        assert_eq!(answer.detailed_answer, text);
        assert!(!answer.short_answer.is_empty());
    }

    #[test]
    fn test_fallback_has_both_fields_populated() {
        let fallback = AiAnswer::fallback();
        assert!(!fallback.short_answer.is_empty());
        assert!(!fallback.detailed_answer.is_empty());
    }
}
