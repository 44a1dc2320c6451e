use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use itertools::Itertools;
use serde::Deserialize;

use crate::error::InputError;

/// Canonical YouTube video identifier, only obtainable through
/// [`crate::yt::parse_video_id`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    const THUMBNAIL_BASE_URL: &str = "http://img.youtube.com/vi";

    pub(crate) fn new(id: impl Into<String>) -> Self {
        VideoId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn thumbnail_url(&self) -> String {
        format!("{}/{}/0.jpg", Self::THUMBNAIL_BASE_URL, self.0)
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VideoId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A single caption cue as returned by a transcript provider.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CaptionRecord {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

#[derive(Debug, Clone)]
pub struct Transcript {
    pub video_id: VideoId,
    pub text: String,
    pub fragments: usize,
}

impl Transcript {
    /// Joins caption text with single spaces, keeping source order.
    pub fn from_captions(video_id: VideoId, captions: &[CaptionRecord]) -> Self {
        Transcript {
            video_id,
            text: captions.iter().map(|c| c.text.as_str()).join(" "),
            fragments: captions.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub text: String,
    pub chunks: usize,
}

/// Merged narration written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioArtifact {
    pub path: PathBuf,
    /// Number of segments merged into the artifact
    pub segments: usize,
    /// Ordinals of chunks whose synthesis was skipped
    pub skipped: Vec<usize>,
}

impl AudioArtifact {
    pub fn name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }
}

/// Languages offered for the notes and narration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    English,
    Hindi,
    Telugu,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::English, Language::Hindi, Language::Telugu];

    /// Language the summaries are generated in.
    pub const NATIVE: Language = Language::English;

    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
            Language::Telugu => "te",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "Hindi",
            Language::Telugu => "Telugu",
        }
    }

    pub fn is_native(&self) -> bool {
        *self == Self::NATIVE
    }

    pub fn artifact_name(&self) -> String {
        format!("summary_audio_{}.mp3", self.code())
    }

    pub fn artifact_path(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(self.artifact_name())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = InputError;

    /// Accepts either the display name or the language code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|l| l.name().eq_ignore_ascii_case(needle) || l.code().eq_ignore_ascii_case(needle))
            .ok_or_else(|| InputError::UnsupportedLanguage(needle.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_parses_names_and_codes() {
        assert_eq!("Hindi".parse::<Language>().unwrap(), Language::Hindi);
        assert_eq!("te".parse::<Language>().unwrap(), Language::Telugu);
        assert_eq!(" english ".parse::<Language>().unwrap(), Language::English);
        assert!(matches!(
            "French".parse::<Language>(),
            Err(InputError::UnsupportedLanguage(_))
        ));
    }

    #[test]
    fn test_artifact_name_uses_code() {
        assert_eq!(Language::Hindi.artifact_name(), "summary_audio_hi.mp3");
        assert_eq!(
            Language::English.artifact_path(Path::new("/tmp/out")),
            PathBuf::from("/tmp/out/summary_audio_en.mp3")
        );
    }

    #[test]
    fn test_transcript_joins_captions_in_order() {
        let captions = ["hello there", "general", "kenobi"]
            .iter()
            .enumerate()
            .map(|(i, t)| CaptionRecord {
                text: t.to_string(),
                start: i as f64,
                duration: 1.0,
            })
            .collect::<Vec<_>>();

        let transcript = Transcript::from_captions(VideoId::new("abc"), &captions);
        assert_eq!(transcript.text, "hello there general kenobi");
        assert_eq!(transcript.fragments, 3);
        assert!(!transcript.is_empty());
    }

    #[test]
    fn test_thumbnail_url() {
        assert_eq!(
            VideoId::new("abc123").thumbnail_url(),
            "http://img.youtube.com/vi/abc123/0.jpg"
        );
    }
}
