use reqwest::Client;
use serde::Deserialize;

use crate::{llm::TextGenerator, narrator::SpeechSynthesizer};

/// OpenAI client usable both as a notes generator (chat completions) and as
/// a narrator voice (`audio/speech`).
#[derive(Debug, Clone)]
pub struct OpenAIClient {
    client: Client,
    api_key: String,
    base_url: String,
    chat_model: String,
    speech_model: String,
    voice: String,
}

#[derive(Debug, thiserror::Error)]
pub enum OpenAIError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("No content in response")]
    EmptyResponse,
}

impl OpenAIClient {
    const SYSTEM_PROMPT: &str = include_str!("./prompts/system_0.txt");

    pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";
    pub const DEFAULT_SPEECH_MODEL: &str = "tts-1";
    pub const DEFAULT_VOICE: &str = "alloy";

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".into(),
            chat_model: Self::DEFAULT_CHAT_MODEL.into(),
            speech_model: Self::DEFAULT_SPEECH_MODEL.into(),
            voice: Self::DEFAULT_VOICE.into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_chat_model(mut self, model: impl Into<String>) -> Self {
        self.chat_model = model.into();
        self
    }

    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }

    pub async fn send_completion_request(
        &self,
        user_content: impl Into<String>,
    ) -> Result<CompletionResponse, OpenAIError> {
        let body = serde_json::json!({
            "model": self.chat_model,
            "messages": [
                {
                    "role": "system",
                    "content": Self::SYSTEM_PROMPT.trim()
                },
                {
                    "role": "user",
                    "content": user_content.into()
                }
            ]
        });

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(OpenAIError::Api { status, message });
        }

        Ok(resp.json::<CompletionResponse>().await?)
    }

    pub async fn send_speech_request(&self, input: &str) -> Result<Vec<u8>, OpenAIError> {
        let body = serde_json::json!({
            "model": self.speech_model,
            "voice": self.voice,
            "input": input,
            "response_format": "mp3"
        });

        let resp = self
            .client
            .post(format!("{}/audio/speech", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(OpenAIError::Api { status, message });
        }

        Ok(resp.bytes().await?.to_vec())
    }
}

#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    pub id: String,
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    pub index: u32,
    pub message: CompletionMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionMessage {
    pub role: String,
    pub content: Option<String>,
}

impl TextGenerator for OpenAIClient {
    type Error = OpenAIError;

    fn model(&self) -> &str {
        &self.chat_model
    }

    async fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        let response = self
            .send_completion_request(prompt)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to generate completion"))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(OpenAIError::EmptyResponse)
    }
}

impl SpeechSynthesizer for OpenAIClient {
    type Error = OpenAIError;

    /// The speech endpoint detects the language from the input text.
    async fn synthesize(&self, text: &str, _language_code: &str) -> Result<Vec<u8>, Self::Error> {
        let audio = self.send_speech_request(text).await?;
        if audio.is_empty() {
            return Err(OpenAIError::EmptyResponse);
        }
        Ok(audio)
    }
}
