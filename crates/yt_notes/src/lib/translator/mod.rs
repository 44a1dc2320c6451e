pub mod google;

use std::{fmt::Display, future::Future};

use crate::error::TranslationError;

pub trait TranslationProvider {
    type Error: Display;

    fn translate(
        &self,
        text: &str,
        target_language_code: &str,
    ) -> impl Future<Output = Result<String, Self::Error>>;
}

#[derive(Debug, Clone)]
pub struct Translator<P> {
    provider: P,
}

impl<P: TranslationProvider> Translator<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Translates `text` into `target_language_code`. Blank text is rejected
    /// without contacting the provider.
    #[tracing::instrument(skip(self, text), fields(chars = text.len()))]
    pub async fn translate(
        &self,
        text: &str,
        target_language_code: &str,
    ) -> Result<String, TranslationError> {
        if text.trim().is_empty() {
            tracing::warn!("Text is empty. Cannot translate.");
            return Err(TranslationError::EmptyInput);
        }

        self.provider
            .translate(text, target_language_code)
            .await
            .map_err(|e| TranslationError::TranslationFailed {
                target: target_language_code.to_string(),
                reason: e.to_string(),
            })
            .inspect_err(|e| tracing::error!(error = %e, "Error translating text"))
    }
}
