use std::sync::{Arc, Mutex};
use yt_notes::SpeechSynthesizer;

/// Synthesizes `text` as the bytes `<text>` so merged output shows chunk order.
#[derive(Clone, Default)]
pub struct MockSynthesizer {
    pub calls: Arc<Mutex<Vec<(String, String)>>>,
    pub fail_on: Vec<usize>,
}

impl MockSynthesizer {
    pub fn failing_on(calls: &[usize]) -> Self {
        Self {
            fail_on: calls.to_vec(),
            ..Default::default()
        }
    }
}

impl SpeechSynthesizer for MockSynthesizer {
    type Error = anyhow::Error;

    async fn synthesize(&self, text: &str, language_code: &str) -> Result<Vec<u8>, Self::Error> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((text.to_string(), language_code.to_string()));
            calls.len() - 1
        };
        if self.fail_on.contains(&call) {
            return Err(anyhow::anyhow!("speech service unavailable"));
        }
        Ok(format!("<{text}>").into_bytes())
    }
}
