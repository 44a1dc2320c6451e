use std::ops::Deref;

use serde_json::Value;

use crate::translator::TranslationProvider;

/// Google Translate through the keyless `translate_a/single` endpoint.
#[derive(Debug, Clone, Default)]
pub struct GoogleTranslate(pub reqwest::Client);

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Unexpected response shape")]
    Malformed,
}

impl Deref for GoogleTranslate {
    type Target = reqwest::Client;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl GoogleTranslate {
    const TRANSLATE_URL: &str = "https://translate.googleapis.com/translate_a/single";

    /// Longest request body the endpoint reliably accepts.
    const MAX_QUERY_CHARS: usize = 4500;

    async fn translate_batch(&self, text: &str, target: &str) -> Result<String, TranslateError> {
        let resp = self
            .post(Self::TRANSLATE_URL)
            .query(&[("client", "gtx"), ("sl", "auto"), ("tl", target), ("dt", "t")])
            .form(&[("q", text)])
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(TranslateError::Api { status, message });
        }

        let body = resp.json::<Value>().await?;
        parse_translation(&body).ok_or(TranslateError::Malformed)
    }
}

impl TranslationProvider for GoogleTranslate {
    type Error = TranslateError;

    async fn translate(&self, text: &str, target_language_code: &str) -> Result<String, Self::Error> {
        let mut translated = Vec::new();
        for batch in line_batches(text, Self::MAX_QUERY_CHARS) {
            translated.push(self.translate_batch(&batch, target_language_code).await?);
        }
        Ok(translated.join("\n"))
    }
}

/// The endpoint answers `[[["translated", "source", ...], ...], ...]`; the
/// translation is the concatenation of each sentence's first element.
fn parse_translation(body: &Value) -> Option<String> {
    let sentences = body.get(0)?.as_array()?;
    let text = sentences
        .iter()
        .filter_map(|sentence| sentence.get(0)?.as_str())
        .collect::<String>();

    (!text.is_empty()).then_some(text)
}

/// Packs whole lines into batches of at most `max_chars` characters. A single
/// longer line becomes its own batch.
fn line_batches(text: &str, max_chars: usize) -> Vec<String> {
    let mut batches = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0;

    for line in text.lines() {
        let line_chars = line.chars().count();
        if !current.is_empty() && current_chars + 1 + line_chars > max_chars {
            batches.push(std::mem::take(&mut current));
            current_chars = 0;
        }
        if !current.is_empty() {
            current.push('\n');
            current_chars += 1;
        }
        current.push_str(line);
        current_chars += line_chars;
    }

    if !current.is_empty() {
        batches.push(current);
    }
    batches
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_translation_joins_sentences() {
        let body = json!([
            [
                ["नमस्ते। ", "Hello. ", null, null, 10],
                ["आप कैसे हैं?", "How are you?", null, null, 10]
            ],
            null,
            "en"
        ]);

        assert_eq!(
            parse_translation(&body).as_deref(),
            Some("नमस्ते। आप कैसे हैं?")
        );
    }

    #[test]
    fn test_parse_translation_rejects_unexpected_shape() {
        assert!(parse_translation(&json!({"error": "nope"})).is_none());
        assert!(parse_translation(&json!([[]])).is_none());
    }

    #[test]
    fn test_line_batches_respect_limit_and_keep_lines() {
        let text = "- one\n- two\n- three\n- four";
        let batches = line_batches(text, 12);
        assert_eq!(batches, vec!["- one\n- two", "- three", "- four"]);
        assert_eq!(batches.join("\n"), text);
    }

    #[test]
    fn test_line_batches_single_long_line() {
        let long = "x".repeat(20);
        assert_eq!(line_batches(&long, 5), vec![long.clone()]);
        assert_eq!(line_batches("short", 100), vec!["short"]);
    }
}
