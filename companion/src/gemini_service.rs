use crate::config::GeminiSettings;
use crate::error::{CompanionError, Result};
use crate::models::*;
use async_trait::async_trait;
use reqwest::Client;

/// Sends a rendered prompt to a generative model and returns its text.
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    async fn invoke(&self, prompt: &str) -> Result<String>;

    fn model_name(&self) -> &str;
}

pub struct GeminiService {
    client: Client,
    settings: GeminiSettings,
}

impl GeminiService {
    pub fn new(settings: GeminiSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| CompanionError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, settings })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.settings.base_url, self.settings.model
        )
    }

    fn build_request(&self, prompt: &str) -> GeminiRequest {
        let generation_config = match (self.settings.temperature, self.settings.max_output_tokens) {
            (None, None) => None,
            (temperature, max_output_tokens) => Some(GeminiGenerationConfig {
                temperature,
                max_output_tokens,
            }),
        };

        GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config,
        }
    }
}

#[async_trait]
impl ModelInvoker for GeminiService {
    async fn invoke(&self, prompt: &str) -> Result<String> {
        log::info!(
            "Calling {} with a {}-character prompt",
            self.settings.model,
            prompt.chars().count()
        );

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.settings.api_key.as_str())])
            .json(&self.build_request(prompt))
            .send()
            .await
            .map_err(|e| CompanionError::RemoteService(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CompanionError::RemoteService(format!(
                "Gemini API error ({status}): {error_text}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| CompanionError::RemoteService(e.without_url().to_string()))?;
        answer_from_body(&body)
    }

    fn model_name(&self) -> &str {
        &self.settings.model
    }
}

/// Concatenates the text parts of the first candidate.
pub fn answer_from_body(body: &str) -> Result<String> {
    let gemini_response: GeminiResponse = serde_json::from_str(body).map_err(|e| {
        CompanionError::RemoteService(format!("unexpected Gemini response: {e}"))
    })?;

    if let Some(reason) = gemini_response
        .prompt_feedback
        .as_ref()
        .and_then(|feedback| feedback.block_reason.as_deref())
    {
        return Err(CompanionError::RemoteService(format!(
            "prompt was blocked by the model: {reason}"
        )));
    }

    let candidate = gemini_response
        .candidates
        .first()
        .ok_or_else(|| CompanionError::RemoteService("model returned no candidates".to_string()))?;

    let answer: String = candidate
        .content
        .as_ref()
        .map(|content| content.parts.iter().map(|p| p.text.as_str()).collect())
        .unwrap_or_default();

    if answer.trim().is_empty() {
        let reason = candidate.finish_reason.as_deref().unwrap_or("unknown");
        return Err(CompanionError::RemoteService(format!(
            "model returned an empty answer (finish reason: {reason})"
        )));
    }

    Ok(answer)
}
