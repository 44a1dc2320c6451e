use std::path::PathBuf;

/// Failure to turn user input into something the pipeline can work with.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Malformed URL: {0}")]
    MalformedUrl(#[from] url::ParseError),
    #[error("Unsupported host: {0:?}")]
    UnsupportedHost(String),
    #[error("URL has no 'v' query parameter")]
    MissingVideoParam,
    #[error("URL has no video id in its path")]
    MissingVideoPath,
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptError {
    #[error("Transcripts are disabled for video {video_id}")]
    TranscriptsDisabled { video_id: String },
    #[error("No transcript found for video {video_id} in languages {languages:?}")]
    NoTranscriptFound {
        video_id: String,
        languages: Vec<String>,
    },
    #[error("Could not retrieve a transcript for video {video_id}: {reason}")]
    RetrievalFailed { video_id: String, reason: String },
    #[error("Unexpected error while getting transcript: {0}")]
    Unknown(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SummaryError {
    #[error("Generation failed on chunk {chunk}: {reason}")]
    GenerationFailed { chunk: usize, reason: String },
    #[error("Model returned an empty summary")]
    EmptySummary,
}

#[derive(Debug, thiserror::Error)]
pub enum TranslationError {
    #[error("Text is empty, cannot translate")]
    EmptyInput,
    #[error("Translation to {target} failed: {reason}")]
    TranslationFailed { target: String, reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to persist merged audio: {0}")]
    Persist(#[from] tempfile::PathPersistError),
    #[error("FFmpeg error: {0}")]
    Ffmpeg(String),
    #[error("No segments to merge")]
    Empty,
}

#[derive(Debug, thiserror::Error)]
pub enum NarrationError {
    #[error("None of the {attempted} audio chunks could be synthesized")]
    NoSegments { attempted: usize },
    #[error("Failed to export audio to {path}: {source}")]
    Export {
        path: PathBuf,
        #[source]
        source: MergeError,
    },
    #[error("Failed to prepare audio workspace: {0}")]
    Workspace(#[from] std::io::Error),
}

/// The reason a pipeline run ended in `Aborted`.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Transcript(#[from] TranscriptError),
    #[error("Transcript for video {video_id} is empty")]
    EmptyTranscript { video_id: String },
    #[error(transparent)]
    Summary(#[from] SummaryError),
}

/// Failures while reading a YouTube watch page.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("YouTube is rate limiting requests (recaptcha page)")]
    RateLimited,
    #[error("Video is unavailable: {0}")]
    VideoUnavailable(String),
    #[error("Captions are disabled")]
    CaptionsDisabled,
    #[error("Parse error: {0}")]
    ParseError(&'static str),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PageError {
    pub(crate) fn into_transcript_error(self, video_id: &str) -> TranscriptError {
        let video_id = video_id.to_string();
        match self {
            PageError::CaptionsDisabled => TranscriptError::TranscriptsDisabled { video_id },
            PageError::RateLimited | PageError::VideoUnavailable(_) => {
                TranscriptError::RetrievalFailed {
                    video_id,
                    reason: self.to_string(),
                }
            }
            PageError::ParseError(_) | PageError::Json(_) => {
                TranscriptError::Unknown(self.to_string())
            }
        }
    }
}

/// Non-fatal problems reported alongside a finished run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineWarning {
    #[error("Notes could not be translated, no localized notes or audio produced: {0}")]
    TranslationFailed(#[source] TranslationError),
    #[error("Skipped {count} audio chunk(s) that could not be synthesized", count = .0.len())]
    AudioChunksSkipped(Vec<usize>),
    #[error("Audio could not be generated: {0}")]
    NarrationFailed(#[source] NarrationError),
}
