pub mod gemini;
pub mod openai;
pub mod summarizer;

use std::{fmt::Display, future::Future};

/// A generative text model: one prompt in, one completion out.
pub trait TextGenerator {
    type Error: Display;

    fn model(&self) -> &str;

    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, Self::Error>>;
}
