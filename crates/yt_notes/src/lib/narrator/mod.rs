//! # Narrator
//!
//! Converts text to one MP3 artifact: the text is sliced with
//! [`chunk_by_chars`], each slice is synthesized to its own segment file
//! inside a per-call temporary directory, and an [`AudioMerger`] stitches the
//! segments together in chunk order.
//!
//! Segment files are owned by [`SegmentFile`] guards which delete the file on
//! drop, and the directory itself is a [`tempfile::TempDir`], so no
//! intermediate audio outlives a `narrate` call whatever its outcome.

pub mod google_tts;
pub mod merge;

use std::{
    fmt::Display,
    future::Future,
    path::{Path, PathBuf},
};

use crate::{
    chunker::{chunk_by_chars, DEFAULT_CHARS_PER_CHUNK},
    error::{MergeError, NarrationError},
    types::AudioArtifact,
};

pub trait SpeechSynthesizer {
    type Error: Display;

    /// Returns MP3 encoded speech for `text`.
    fn synthesize(
        &self,
        text: &str,
        language_code: &str,
    ) -> impl Future<Output = Result<Vec<u8>, Self::Error>>;
}

pub trait AudioMerger {
    /// Merges `segments` in the given order into a single MP3 at `output`.
    ///
    /// Implementations take ownership of the segments and should drop each
    /// one as soon as it has been consumed.
    fn merge(
        &self,
        segments: Vec<SegmentFile>,
        output: &Path,
    ) -> impl Future<Output = Result<(), MergeError>>;
}

/// A synthesized chunk on disk. The file is removed when the guard drops.
#[derive(Debug)]
pub struct SegmentFile {
    index: usize,
    path: PathBuf,
}

impl SegmentFile {
    /// Writes `audio` to `dir` under a name derived from the chunk ordinal.
    pub async fn create(dir: &Path, index: usize, audio: &[u8]) -> std::io::Result<Self> {
        let path = dir.join(format!("segment_{index:04}.mp3"));
        tokio::fs::write(&path, audio).await?;
        Ok(Self { index, path })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for SegmentFile {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::trace!(path = ?self.path, "Removed audio segment"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(error = ?e, path = ?self.path, "Failed to clean up audio segment")
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Narrator<S, M> {
    synthesizer: S,
    merger: M,
    chars_per_chunk: usize,
    workspace_root: PathBuf,
}

impl<S: SpeechSynthesizer, M: AudioMerger> Narrator<S, M> {
    pub fn new(synthesizer: S, merger: M) -> Self {
        Self {
            synthesizer,
            merger,
            chars_per_chunk: DEFAULT_CHARS_PER_CHUNK,
            workspace_root: std::env::temp_dir(),
        }
    }

    pub fn with_chars_per_chunk(mut self, chars_per_chunk: usize) -> Self {
        self.chars_per_chunk = chars_per_chunk;
        self
    }

    /// Directory under which per-call segment directories are created.
    pub fn with_workspace_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.workspace_root = root.into();
        self
    }

    /// Synthesizes `text` chunk by chunk and exports the merged audio to
    /// `output`. Chunks that fail are skipped; the call only fails when no
    /// chunk succeeded or the export itself fails.
    #[tracing::instrument(skip(self, text), fields(chars = text.len(), chars_per_chunk = self.chars_per_chunk))]
    pub async fn narrate(
        &self,
        text: &str,
        language_code: &str,
        output: &Path,
    ) -> Result<AudioArtifact, NarrationError> {
        tokio::fs::create_dir_all(&self.workspace_root).await?;
        let workspace = tempfile::Builder::new()
            .prefix("narration-")
            .tempdir_in(&self.workspace_root)?;

        let mut segments = Vec::new();
        let mut skipped = Vec::new();
        let mut attempted = 0;

        for (chunk_idx, chunk) in chunk_by_chars(text, self.chars_per_chunk).enumerate() {
            attempted += 1;

            let audio = match self.synthesizer.synthesize(chunk, language_code).await {
                Ok(audio) => audio,
                Err(e) => {
                    tracing::warn!(chunk = chunk_idx, error = %e, "Skipping audio chunk");
                    skipped.push(chunk_idx);
                    continue;
                }
            };

            // a local write failure is not a synthesis failure
            let segment = SegmentFile::create(workspace.path(), chunk_idx, &audio)
                .await
                .inspect_err(|e| tracing::error!(error = %e, "Failed to write audio segment"))?;
            segments.push(segment);
        }

        if segments.is_empty() {
            tracing::error!(attempted, "No audio chunks could be synthesized");
            return Err(NarrationError::NoSegments { attempted });
        }

        let merged = segments.len();
        self.merger
            .merge(segments, output)
            .await
            .map_err(|source| NarrationError::Export {
                path: output.to_path_buf(),
                source,
            })
            .inspect_err(|e| tracing::error!(error = %e, "Error generating audio"))?;

        tracing::info!(path = ?output, merged, skipped = skipped.len(), "Exported narration");

        Ok(AudioArtifact {
            path: output.to_path_buf(),
            segments: merged,
            skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_segment_file_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let segment = SegmentFile::create(dir.path(), 7, b"audio").await.unwrap();
        let path = segment.path().to_path_buf();

        assert_eq!(segment.index(), 7);
        assert_eq!(std::fs::read(&path).unwrap(), b"audio");

        drop(segment);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_segment_file_tolerates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let segment = SegmentFile::create(dir.path(), 0, b"audio").await.unwrap();
        std::fs::remove_file(segment.path()).unwrap();
        drop(segment);
    }

    /// Synthesizes fine but wipes the per-call workspace first, so writing
    /// the segment fails locally.
    struct WorkspaceWiper {
        root: PathBuf,
    }

    impl SpeechSynthesizer for WorkspaceWiper {
        type Error = std::io::Error;

        async fn synthesize(&self, text: &str, _language_code: &str) -> Result<Vec<u8>, Self::Error> {
            for entry in std::fs::read_dir(&self.root)? {
                std::fs::remove_dir_all(entry?.path())?;
            }
            Ok(text.as_bytes().to_vec())
        }
    }

    #[tokio::test]
    async fn test_segment_write_failure_is_workspace_error() {
        let root = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let synthesizer = WorkspaceWiper {
            root: root.path().to_path_buf(),
        };

        let narrator = Narrator::new(synthesizer, merge::FrameConcat).with_workspace_root(root.path());
        let result = narrator
            .narrate("some text", "en", &out.path().join("summary_audio_en.mp3"))
            .await;

        assert!(matches!(result, Err(NarrationError::Workspace(_))));
        assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
    }
}
