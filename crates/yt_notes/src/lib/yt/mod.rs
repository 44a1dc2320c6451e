pub mod parser;
pub mod scraper;

use std::future::Future;

use url::Url;

use crate::{
    error::{InputError, TranscriptError},
    types::{CaptionRecord, Transcript, VideoId},
};

/// Parses a YouTube URL into its video id.
///
/// Recognized forms are `youtube.com/...?v=<id>` (with or without `www.`) and
/// `youtu.be/<id>`.
pub fn parse_video_id(url: &str) -> Result<VideoId, InputError> {
    let url = Url::parse(url.trim())?;

    match url.host_str() {
        Some("youtube.com" | "www.youtube.com") => url
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(VideoId::new)
            .ok_or(InputError::MissingVideoParam),
        Some("youtu.be") => url
            .path_segments()
            .and_then(|mut segments| segments.next())
            .filter(|segment| !segment.is_empty())
            .map(VideoId::new)
            .ok_or(InputError::MissingVideoPath),
        host => Err(InputError::UnsupportedHost(
            host.unwrap_or_default().to_string(),
        )),
    }
}

/// Lenient form of [`parse_video_id`]: `None` means no video is selected yet.
pub fn extract_video_id(url: &str) -> Option<VideoId> {
    parse_video_id(url)
        .inspect_err(|e| tracing::warn!(error = %e, url, "Error extracting video ID"))
        .ok()
}

/// Caption languages requested when none are configured.
pub const DEFAULT_TRANSCRIPT_LANGUAGES: [&str; 1] = ["en"];

pub trait TranscriptProvider {
    /// Returns the caption cues of the first available track matching
    /// `languages`, in order of preference.
    fn fetch_captions(
        &self,
        video_id: &VideoId,
        languages: &[String],
    ) -> impl Future<Output = Result<Vec<CaptionRecord>, TranscriptError>>;
}

/// Turns provider caption cues into a single [`Transcript`].
#[derive(Debug, Clone)]
pub struct TranscriptFetcher<P> {
    provider: P,
}

impl<P: TranscriptProvider> TranscriptFetcher<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    #[tracing::instrument(skip(self), fields(video_id = %video_id))]
    pub async fn fetch(
        &self,
        video_id: &VideoId,
        preferred_languages: &[String],
    ) -> Result<Transcript, TranscriptError> {
        let captions = self
            .provider
            .fetch_captions(video_id, preferred_languages)
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Failed to fetch transcript"))?;

        let transcript = Transcript::from_captions(video_id.clone(), &captions);
        tracing::info!(
            fragments = transcript.fragments,
            chars = transcript.text.len(),
            "Fetched transcript"
        );

        Ok(transcript)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_urls_yield_v_param() {
        for (url, expected) in [
            ("https://www.youtube.com/watch?v=abc123", "abc123"),
            ("https://youtube.com/watch?v=XyZ_-09", "XyZ_-09"),
            ("https://www.youtube.com/watch?list=PL1&v=dQw4w9WgXcQ&t=42", "dQw4w9WgXcQ"),
            ("  https://www.youtube.com/watch?v=padded  ", "padded"),
        ] {
            assert_eq!(parse_video_id(url).unwrap().as_str(), expected, "{url}");
        }
    }

    #[test]
    fn test_short_urls_yield_first_path_segment() {
        for (url, expected) in [
            ("https://youtu.be/abc123", "abc123"),
            ("https://youtu.be/abc123?t=10", "abc123"),
            ("https://youtu.be/abc123/extra", "abc123"),
        ] {
            assert_eq!(parse_video_id(url).unwrap().as_str(), expected, "{url}");
        }
    }

    #[test]
    fn test_missing_video_param() {
        assert!(matches!(
            parse_video_id("https://www.youtube.com/watch?list=PL1"),
            Err(InputError::MissingVideoParam)
        ));
        assert!(matches!(
            parse_video_id("https://www.youtube.com/watch?v="),
            Err(InputError::MissingVideoParam)
        ));
        assert!(matches!(
            parse_video_id("https://youtu.be/"),
            Err(InputError::MissingVideoPath)
        ));
    }

    #[test]
    fn test_other_hosts_and_garbage_yield_none() {
        for url in [
            "https://vimeo.com/watch?v=abc123",
            "https://m.youtube.com/watch?v=abc123",
            "https://example.com/abc123",
            "not a url",
            "",
        ] {
            assert!(extract_video_id(url).is_none(), "{url}");
        }

        assert!(matches!(
            parse_video_id("https://vimeo.com/123"),
            Err(InputError::UnsupportedHost(host)) if host == "vimeo.com"
        ));
        assert!(matches!(
            parse_video_id("nope"),
            Err(InputError::MalformedUrl(_))
        ));
    }
}
