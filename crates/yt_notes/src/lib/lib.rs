pub mod chunker;
pub mod error;
pub mod llm;
pub mod narrator;
mod pipeline;
pub mod tracing;
pub mod translator;
pub mod types;
pub mod yt;

pub use error::{
    InputError, MergeError, NarrationError, PipelineError, PipelineWarning, SummaryError,
    TranscriptError, TranslationError,
};
pub use llm::{gemini, openai, summarizer::Summarizer, TextGenerator};
pub use narrator::{AudioMerger, Narrator, SpeechSynthesizer};
pub use pipeline::{
    builder::{ChunkingConfig, NotesPipelineBuilder},
    NotesOutput, NotesPipeline, PipelineOutcome, PipelineRun, PipelineStage,
};
pub use translator::{TranslationProvider, Translator};
pub use types::{AudioArtifact, Language, Summary, Transcript, VideoId};
pub use yt::{TranscriptFetcher, TranscriptProvider};
