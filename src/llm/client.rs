use crate::error::{ItineraryError, Result};
use crate::llm::types::*;
use reqwest::Client;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Thin client for the Gemini REST API. The API key is explicit
/// configuration handed to the constructor; nothing here reads the
/// environment or keeps global state.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: GEMINI_BASE_URL.to_string(),
        }
    }

    pub(crate) async fn generate_content(
        &self,
        model: &str,
        system_prompt: &str,
        messages: Vec<Content>,
        response_schema: Option<serde_json::Value>,
        response_mime_type: &str,
    ) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        );

        let system_content = Some(Content {
            role: "user".to_string(),
            parts: vec![Part::Text {
                text: system_prompt.to_string(),
            }],
        });

        let payload = GenerateContentRequest {
            contents: messages,
            system_instruction: system_content,
            generation_config: GenerationConfig {
                response_mime_type: response_mime_type.to_string(),
                response_schema,
            },
        };

        let res = self.client.post(&url).json(&payload).send().await?;
        let status = res.status();

        if !status.is_success() {
            let err_text = res.text().await?;
            return Err(ItineraryError::GenerationFailed(format!(
                "Gemini API Error (status {}): {}",
                status, err_text
            )));
        }

        let body: GenerateContentResponse = res.json().await?;

        let part = body
            .candidates
            .ok_or_else(|| ItineraryError::GenerationFailed("No candidates returned".to_string()))?
            .first()
            .ok_or_else(|| ItineraryError::GenerationFailed("Empty candidates list".to_string()))?
            .content
            .parts
            .first()
            .ok_or_else(|| ItineraryError::GenerationFailed("No parts in content".to_string()))?
            .clone();

        match part {
            Part::Text { text } => Ok(text),
        }
    }
}
