pub mod builder;

use std::{fmt, path::PathBuf};

use crate::{
    error::{PipelineError, PipelineWarning, SummaryError},
    llm::{summarizer::Summarizer, TextGenerator},
    narrator::{AudioMerger, Narrator, SpeechSynthesizer},
    translator::{TranslationProvider, Translator},
    types::{AudioArtifact, Language, VideoId},
    yt::{parse_video_id, TranscriptFetcher, TranscriptProvider},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Idle,
    IdentifyingVideo,
    FetchingTranscript,
    Summarizing,
    Translating,
    Narrating,
    Done,
    Aborted,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Idle => "idle",
            PipelineStage::IdentifyingVideo => "identifying video",
            PipelineStage::FetchingTranscript => "fetching transcript",
            PipelineStage::Summarizing => "summarizing",
            PipelineStage::Translating => "translating",
            PipelineStage::Narrating => "narrating",
            PipelineStage::Done => "done",
            PipelineStage::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// Everything a successful run delivers to the user.
#[derive(Debug)]
pub struct NotesOutput {
    pub video_id: VideoId,
    pub requested_language: Language,
    /// Language of `summary`; the untranslated native language when
    /// translation failed
    pub language: Language,
    pub summary: String,
    pub audio: Option<AudioArtifact>,
    pub warnings: Vec<PipelineWarning>,
}

impl NotesOutput {
    pub fn is_localized(&self) -> bool {
        self.language == self.requested_language
    }
}

#[derive(Debug)]
pub enum PipelineOutcome {
    Done(NotesOutput),
    Aborted {
        stage: PipelineStage,
        error: PipelineError,
    },
}

/// Result of one pipeline run together with the stages it went through.
#[derive(Debug)]
pub struct PipelineRun {
    pub stages: Vec<PipelineStage>,
    pub outcome: PipelineOutcome,
}

impl PipelineRun {
    pub fn final_stage(&self) -> PipelineStage {
        match self.outcome {
            PipelineOutcome::Done(_) => PipelineStage::Done,
            PipelineOutcome::Aborted { .. } => PipelineStage::Aborted,
        }
    }

    pub fn output(&self) -> Option<&NotesOutput> {
        match &self.outcome {
            PipelineOutcome::Done(output) => Some(output),
            PipelineOutcome::Aborted { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&PipelineError> {
        match &self.outcome {
            PipelineOutcome::Done(_) => None,
            PipelineOutcome::Aborted { error, .. } => Some(error),
        }
    }
}

/// Video URL in, notes and narration out.
///
/// Stages run strictly in sequence and each one only starts when the output
/// it depends on is available: identify the video, fetch its transcript,
/// summarize, translate (skipped for the native language), narrate.
#[derive(Debug)]
pub struct NotesPipeline<P, G, T, S, M> {
    output_dir: PathBuf,
    transcript_languages: Vec<String>,
    fetcher: TranscriptFetcher<P>,
    summarizer: Summarizer<G>,
    translator: Translator<T>,
    narrator: Narrator<S, M>,
}

impl<P, G, T, S, M> NotesPipeline<P, G, T, S, M>
where
    P: TranscriptProvider,
    G: TextGenerator,
    T: TranslationProvider,
    S: SpeechSynthesizer,
    M: AudioMerger,
{
    #[tracing::instrument(skip(self))]
    pub async fn run(&self, url: &str, language: Language) -> PipelineRun {
        let mut stages = vec![PipelineStage::Idle];

        let outcome = match self.execute(url, language, &mut stages).await {
            Ok(output) => {
                tracing::info!(
                    video_id = %output.video_id,
                    language = %output.language,
                    audio = output.audio.is_some(),
                    warnings = output.warnings.len(),
                    "Pipeline finished"
                );
                stages.push(PipelineStage::Done);
                PipelineOutcome::Done(output)
            }
            Err(error) => {
                let stage = stages.last().copied().unwrap_or(PipelineStage::Idle);
                tracing::error!(%stage, error = %error, "Pipeline aborted");
                stages.push(PipelineStage::Aborted);
                PipelineOutcome::Aborted { stage, error }
            }
        };

        PipelineRun { stages, outcome }
    }

    async fn execute(
        &self,
        url: &str,
        language: Language,
        stages: &mut Vec<PipelineStage>,
    ) -> Result<NotesOutput, PipelineError> {
        enter(stages, PipelineStage::IdentifyingVideo);
        let video_id = parse_video_id(url)
            .inspect_err(|e| tracing::warn!(error = %e, url, "Error extracting video ID"))?;

        enter(stages, PipelineStage::FetchingTranscript);
        let transcript = self
            .fetcher
            .fetch(&video_id, &self.transcript_languages)
            .await?;
        if transcript.is_empty() {
            return Err(PipelineError::EmptyTranscript {
                video_id: video_id.to_string(),
            });
        }

        enter(stages, PipelineStage::Summarizing);
        let summary = self.summarizer.summarize(&transcript.text).await?;
        if summary.text.trim().is_empty() {
            return Err(SummaryError::EmptySummary.into());
        }

        let mut warnings = Vec::new();

        let text = if language.is_native() {
            summary.text
        } else {
            enter(stages, PipelineStage::Translating);
            let translated = self.translator.translate(&summary.text, language.code()).await;
            match translated {
                Ok(translated) => translated,
                Err(e) => {
                    tracing::warn!(error = %e, "No localized notes, skipping narration");
                    return Ok(NotesOutput {
                        video_id,
                        requested_language: language,
                        language: Language::NATIVE,
                        summary: summary.text,
                        audio: None,
                        warnings: vec![PipelineWarning::TranslationFailed(e)],
                    });
                }
            }
        };

        enter(stages, PipelineStage::Narrating);
        let output_path = language.artifact_path(&self.output_dir);
        let audio = match self
            .narrator
            .narrate(&text, language.code(), &output_path)
            .await
        {
            Ok(artifact) => {
                if !artifact.skipped.is_empty() {
                    warnings.push(PipelineWarning::AudioChunksSkipped(artifact.skipped.clone()));
                }
                Some(artifact)
            }
            Err(e) => {
                warnings.push(PipelineWarning::NarrationFailed(e));
                None
            }
        };

        Ok(NotesOutput {
            video_id,
            requested_language: language,
            language,
            summary: text,
            audio,
            warnings,
        })
    }
}

fn enter(stages: &mut Vec<PipelineStage>, stage: PipelineStage) {
    tracing::debug!(%stage, "Entering stage");
    stages.push(stage);
}
