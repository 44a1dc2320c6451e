use std::ops::Deref;

use crate::narrator::SpeechSynthesizer;

/// Google Translate's speech endpoint, the voice used by the notes form.
#[derive(Debug, Clone, Default)]
pub struct GoogleTts(pub reqwest::Client);

#[derive(Debug, thiserror::Error)]
pub enum TtsError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error: {status}")]
    Api { status: u16 },
    #[error("Nothing to synthesize")]
    EmptyInput,
}

impl Deref for GoogleTts {
    type Target = reqwest::Client;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl GoogleTts {
    const TTS_URL: &str = "https://translate.google.com/translate_tts";

    /// Longest text a single `translate_tts` request accepts.
    const MAX_REQUEST_CHARS: usize = 200;

    async fn request_part(
        &self,
        part: &str,
        language_code: &str,
        idx: usize,
        total: usize,
    ) -> Result<Vec<u8>, TtsError> {
        let idx = idx.to_string();
        let total = total.to_string();
        let textlen = part.chars().count().to_string();

        let resp = self
            .get(Self::TTS_URL)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", language_code),
                ("q", part),
                ("idx", idx.as_str()),
                ("total", total.as_str()),
                ("textlen", textlen.as_str()),
            ])
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            return Err(TtsError::Api {
                status: resp.status().as_u16(),
            });
        }

        Ok(resp.bytes().await?.to_vec())
    }
}

impl SpeechSynthesizer for GoogleTts {
    type Error = TtsError;

    /// Splits `text` into request-sized parts and returns their MP3 frames
    /// back to back.
    async fn synthesize(&self, text: &str, language_code: &str) -> Result<Vec<u8>, Self::Error> {
        let parts = pack_words(text, Self::MAX_REQUEST_CHARS);
        if parts.is_empty() {
            return Err(TtsError::EmptyInput);
        }

        let mut audio = Vec::new();
        for (idx, part) in parts.iter().enumerate() {
            let bytes = self
                .request_part(part, language_code, idx, parts.len())
                .await?;
            audio.extend_from_slice(&bytes);
        }
        Ok(audio)
    }
}

/// Greedily packs whitespace-separated words into parts of at most
/// `max_chars` characters. Words longer than `max_chars` are hard split.
fn pack_words(text: &str, max_chars: usize) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word = word;
        while word.chars().count() > max_chars {
            if !current.is_empty() {
                parts.push(std::mem::take(&mut current));
            }
            let split_at = word
                .char_indices()
                .nth(max_chars)
                .map_or(word.len(), |(idx, _)| idx);
            parts.push(word[..split_at].to_string());
            word = &word[split_at..];
        }

        let needed = usize::from(!current.is_empty()) + word.chars().count();
        if current.chars().count() + needed > max_chars {
            parts.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        parts.push(current);
    }
    parts
}
