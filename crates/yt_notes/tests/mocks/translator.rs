use std::sync::{Arc, Mutex};
use yt_notes::TranslationProvider;

#[derive(Clone)]
pub struct MockTranslator {
    pub translation: String,
    pub calls: Arc<Mutex<Vec<(String, String)>>>,
    pub fail_with: Option<String>,
}

impl MockTranslator {
    pub fn new(translation: &str) -> Self {
        Self {
            translation: translation.to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            translation: String::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: Some(msg.to_string()),
        }
    }
}

impl TranslationProvider for MockTranslator {
    type Error = anyhow::Error;

    async fn translate(&self, text: &str, target_language_code: &str) -> Result<String, Self::Error> {
        self.calls
            .lock()
            .unwrap()
            .push((text.to_string(), target_language_code.to_string()));
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        Ok(self.translation.clone())
    }
}
