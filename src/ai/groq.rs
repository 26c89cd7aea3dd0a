use super::{build_prompt, normalize_answer, AiAnswer, AiError, AiProvider};
use crate::config::AiConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const COMPLETIONS_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Adapter for the OpenAI-compatible chat-completions API (bearer key auth,
/// `choices[0].message.content` result shape).
pub struct GroqProvider {
    config: AiConfig,
    client: Client,
}
impl GroqProvider {
    pub fn new(config: AiConfig, client: Client) -> Self {
        Self { config, client }
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: String,
}

#[async_trait]
impl AiProvider for GroqProvider {
    async fn complete(&self, question: &str, language: &str) -> Result<AiAnswer, AiError> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: build_prompt(question, language),
            }],
        };

        let response = self
            .client
            .post(COMPLETIONS_URL)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Status { status, body });
        }

        let parsed: ChatResponse = response.json().await?;
        let text = parsed
            .choices
            .first()
            .map(|choice| choice.message.content.trim())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| AiError::MalformedResponse("no choice content".to_string()))?;

        Ok(normalize_answer(text))
    }
}
