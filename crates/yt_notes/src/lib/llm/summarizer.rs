use crate::{
    chunker::{chunk_by_words, DEFAULT_WORDS_PER_CHUNK},
    error::SummaryError,
    llm::TextGenerator,
    types::Summary,
};

/// Bullet point notes prompt prepended to every transcript chunk.
pub const DEFAULT_INSTRUCTIONS: &str = include_str!("./prompts/notes.txt");

/// Summarizes a transcript chunk by chunk with a fixed instruction template.
#[derive(Debug, Clone)]
pub struct Summarizer<G> {
    generator: G,
    instructions: String,
    words_per_chunk: usize,
}

impl<G: TextGenerator> Summarizer<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            instructions: DEFAULT_INSTRUCTIONS.trim().to_string(),
            words_per_chunk: DEFAULT_WORDS_PER_CHUNK,
        }
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into().trim().to_string();
        self
    }

    pub fn with_words_per_chunk(mut self, words_per_chunk: usize) -> Self {
        self.words_per_chunk = words_per_chunk;
        self
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Runs the model over each chunk in order and joins the outputs with
    /// newlines. A failure on any chunk discards everything produced so far.
    #[tracing::instrument(skip_all, fields(model = self.generator.model(), words_per_chunk = self.words_per_chunk))]
    pub async fn summarize(&self, transcript: &str) -> Result<Summary, SummaryError> {
        let mut outputs = Vec::new();

        for (chunk_idx, chunk) in chunk_by_words(transcript, self.words_per_chunk).enumerate() {
            let prompt = format!("{}\n\n{}", self.instructions, chunk);
            let output = self
                .generator
                .generate(&prompt)
                .await
                .map_err(|e| SummaryError::GenerationFailed {
                    chunk: chunk_idx,
                    reason: e.to_string(),
                })
                .inspect_err(|e| tracing::error!(error = %e, "Error generating summary"))?;

            tracing::debug!(chunk = chunk_idx, chars = output.len(), "Summarized chunk");
            outputs.push(output);
        }

        Ok(Summary {
            text: outputs.join("\n"),
            chunks: outputs.len(),
        })
    }
}
