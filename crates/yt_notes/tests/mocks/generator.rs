use std::sync::{Arc, Mutex};
use yt_notes::TextGenerator;

/// Replies with `replies` in call order, repeating the last one once they run out.
#[derive(Clone)]
pub struct MockGenerator {
    pub replies: Vec<String>,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_on: Option<usize>,
}

impl MockGenerator {
    pub fn new(replies: &[&str]) -> Self {
        Self {
            replies: replies.iter().map(|r| r.to_string()).collect(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_on: None,
        }
    }

    pub fn failing_on(replies: &[&str], call: usize) -> Self {
        Self {
            fail_on: Some(call),
            ..Self::new(replies)
        }
    }
}

impl TextGenerator for MockGenerator {
    type Error = anyhow::Error;

    fn model(&self) -> &str {
        "mock-gemini"
    }

    async fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(prompt.to_string());
            calls.len() - 1
        };
        if self.fail_on == Some(call) {
            return Err(anyhow::anyhow!("quota exceeded"));
        }
        Ok(self
            .replies
            .get(call)
            .or(self.replies.last())
            .cloned()
            .unwrap_or_default())
    }
}
