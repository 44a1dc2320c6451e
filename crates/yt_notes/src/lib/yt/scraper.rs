use std::ops::Deref;

use crate::{
    error::TranscriptError,
    types::{CaptionRecord, VideoId},
    yt::{
        parser::{parse_timedtext, select_track, WatchPage},
        TranscriptProvider,
    },
};

/// Reads captions straight from the YouTube watch page and its `timedtext`
/// track endpoint.
#[derive(Debug, Clone, Default)]
pub struct CaptionScraper(pub reqwest::Client);

impl Deref for CaptionScraper {
    type Target = reqwest::Client;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl CaptionScraper {
    const WATCH_URL: &str = "https://www.youtube.com/watch";

    async fn get_text(&self, url: &str, query: &[(&str, &str)]) -> Result<String, reqwest::Error> {
        self.get(url)
            .query(query)
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }
}

impl TranscriptProvider for CaptionScraper {
    #[tracing::instrument(skip(self), fields(video_id = %video_id))]
    async fn fetch_captions(
        &self,
        video_id: &VideoId,
        languages: &[String],
    ) -> Result<Vec<CaptionRecord>, TranscriptError> {
        let retrieval_failed = |e: reqwest::Error| TranscriptError::RetrievalFailed {
            video_id: video_id.to_string(),
            reason: e.to_string(),
        };

        let html = self
            .get_text(Self::WATCH_URL, &[("v", video_id.as_str())])
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to load watch page"))
            .map_err(retrieval_failed)?;

        let tracks = WatchPage::from(html)
            .caption_tracks()
            .map_err(|e| e.into_transcript_error(video_id.as_str()))?;
        tracing::debug!(count = tracks.len(), "Found caption tracks");

        let track = select_track(&tracks, languages).ok_or_else(|| {
            TranscriptError::NoTranscriptFound {
                video_id: video_id.to_string(),
                languages: languages.to_vec(),
            }
        })?;
        tracing::debug!(
            language = %track.language_code,
            generated = track.is_generated(),
            "Selected caption track"
        );

        let xml = self
            .get_text(&track.transcript_url(), &[])
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to load caption track"))
            .map_err(retrieval_failed)?;

        read_track(video_id, &xml)
    }
}

/// Cues of a fetched track body. A body with content but no readable cue is
/// a retrieval failure, not an empty transcript.
fn read_track(video_id: &VideoId, xml: &str) -> Result<Vec<CaptionRecord>, TranscriptError> {
    let cues = parse_timedtext(xml);
    if cues.is_empty() && !xml.trim().is_empty() {
        tracing::error!(bytes = xml.len(), "Caption track held no readable cues");
        return Err(TranscriptError::RetrievalFailed {
            video_id: video_id.to_string(),
            reason: "caption track held no readable cues".to_string(),
        });
    }

    Ok(cues)
}
