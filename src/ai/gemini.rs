use super::{build_prompt, normalize_answer, AiAnswer, AiError, AiProvider};
use crate::config::AiConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Adapter for the hosted generation API (`models/<model>:generateContent`,
/// query-string key auth, `candidates[0].content.parts[0].text` result shape).
pub struct GeminiProvider {
    config: AiConfig,
    client: Client,
}
impl GeminiProvider {
    pub fn new(config: AiConfig, client: Client) -> Self {
        Self { config, client }
    }

    fn generate_url(&self) -> String {
        format!("{BASE_URL}/{}:generateContent", self.config.model)
    }
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}
impl GenerateRequest {
    fn single_prompt(prompt: String) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        }
    }
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[async_trait]
impl AiProvider for GeminiProvider {
    async fn complete(&self, question: &str, language: &str) -> Result<AiAnswer, AiError> {
        let request = GenerateRequest::single_prompt(build_prompt(question, language));

        let response = self
            .client
            .post(self.generate_url())
            .query(&[("key", self.config.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Status { status, body });
        }

        let parsed: GenerateResponse = response.json().await?;
        let text = parsed
            .candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .and_then(|content| content.parts.first())
            .map(|part| part.text.trim())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| AiError::MalformedResponse("no candidate text".to_string()))?;

        Ok(normalize_answer(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_shape() {
        let request = GenerateRequest::single_prompt("prompt text".to_string());
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "contents": [{ "parts": [{ "text": "prompt text" }] }] })
        );
    }

    #[test]
    fn test_response_text_path() {
        let response: GenerateResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "the answer" }], "role": "model" },
                "finishReason": "STOP"
            }]
        }))
        .unwrap();

        assert_eq!(response.candidates[0].content.as_ref().unwrap().parts[0].text, "the answer");
    }
}
