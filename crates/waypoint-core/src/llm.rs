//! Completion client for OpenAI-compatible chat endpoints.

use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    error::{EngineError, Result},
    models::ChatMessage,
    services::{CompletionOptions, LanguageModel},
};

/// Base URL used when none is configured.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// `LanguageModel` over `POST {base}/chat/completions`.
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleModel {
    client: reqwest::Client,
    api_base: String,
    api_key: Option<String>,
}

impl OpenAiCompatibleModel {
    pub fn new(api_base: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.into(),
            api_key,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }
}

/// Request body for one non-streaming completion.
pub fn build_request_body(
    messages: &[ChatMessage],
    model: &str,
    options: &CompletionOptions,
) -> Value {
    json!({
        "model": model,
        "messages": messages,
        "temperature": options.temperature,
        "stream": false,
    })
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Content of the first choice in a completion response body.
pub fn parse_completion(body: &str) -> Result<String> {
    let response: CompletionResponse =
        serde_json::from_str(body).map_err(|e| EngineError::LanguageModel {
            message: format!("Failed to parse response: {e}"),
        })?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .ok_or_else(|| EngineError::LanguageModel {
            message: "response has no message content".to_string(),
        })
}

/// Maps a non-success HTTP status to an error.
pub fn http_error(status: u16, body: &str) -> EngineError {
    let message = match status {
        401 => "Invalid API key".to_string(),
        403 => "Access denied".to_string(),
        404 => format!("Model or endpoint not found: {body}"),
        429 => format!("Rate limited: {body}"),
        400 => format!("Invalid request: {body}"),
        500..=599 => format!("Server error {status}: {body}"),
        _ => format!("HTTP {status}: {body}"),
    };
    EngineError::LanguageModel { message }
}

#[async_trait]
impl LanguageModel for OpenAiCompatibleModel {
    async fn complete(
        &self,
        prompt: &[ChatMessage],
        model: &str,
        options: &CompletionOptions,
    ) -> Result<String> {
        let body = build_request_body(prompt, model, options);
        debug!("completion request to {} ({model})", self.endpoint());

        let mut request = self.client.post(self.endpoint()).json(&body);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| EngineError::LanguageModel {
                message: e.to_string(),
            })?;
        let status = response.status().as_u16();
        let body_text = response
            .text()
            .await
            .map_err(|e| EngineError::LanguageModel {
                message: e.to_string(),
            })?;

        if !(200..300).contains(&status) {
            return Err(http_error(status, &body_text));
        }
        parse_completion(&body_text)
    }
}
