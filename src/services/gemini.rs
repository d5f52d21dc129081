use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

/// Errors from the AI chat completion service
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// System instruction shipped with every chat request
const SYSTEM_INSTRUCTION: &str = "\
You are \"EduGuide AI\", an intelligent educational assistant inside a Student Information System.

Your tasks:
- Guide students academically
- Explain concepts
- Answer college-related queries
- Help with career, placements, courses
- Provide structured suggestions
- Be friendly and supportive";

/// Thin client for the generative AI chat endpoint
pub struct GeminiClient {
    base_url: String,
    api_key: String,
    model: String,
    client: Client,
}

impl GeminiClient {
    pub fn new(base_url: String, api_key: String, model: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            api_key,
            model,
            client,
        }
    }

    /// Forward one user message and return the assistant's reply text
    pub async fn ask(&self, message: &str) -> Result<String, ChatError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url.trim_end_matches('/'),
            self.model,
            self.api_key
        );

        let payload = json!({
            "contents": [
                {
                    "role": "user",
                    "parts": [{ "text": message }]
                }
            ],
            "systemInstruction": {
                "role": "system",
                "parts": [{ "text": SYSTEM_INSTRUCTION }]
            }
        });

        let response = self.client.post(&url).json(&payload).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("AI service error {}: {}", status, body);
            return Err(ChatError::ApiError(format!("{}", status)));
        }

        let body: Value = response.json().await?;

        body.pointer("/candidates/0/content/parts/0/text")
            .and_then(|t| t.as_str())
            .map(str::to_owned)
            .ok_or_else(|| ChatError::InvalidResponse("Missing candidate text".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = GeminiClient::new(
            "https://generativelanguage.googleapis.com".to_string(),
            "test_key".to_string(),
            "gemini-2.0-flash".to_string(),
        );

        assert_eq!(client.model, "gemini-2.0-flash");
    }
}
