use std::sync::{Arc, Mutex};
use yt_notes::{types::CaptionRecord, TranscriptError, TranscriptProvider, VideoId};

#[derive(Clone)]
pub struct MockTranscriptProvider {
    pub captions: Vec<CaptionRecord>,
    pub calls: Arc<Mutex<Vec<(String, Vec<String>)>>>,
    pub disabled: bool,
}

impl MockTranscriptProvider {
    pub fn new(lines: &[&str]) -> Self {
        let captions = lines
            .iter()
            .enumerate()
            .map(|(i, text)| CaptionRecord {
                text: text.to_string(),
                start: i as f64 * 2.5,
                duration: 2.5,
            })
            .collect();

        Self {
            captions,
            calls: Arc::new(Mutex::new(Vec::new())),
            disabled: false,
        }
    }

    pub fn disabled() -> Self {
        Self {
            disabled: true,
            ..Self::new(&[])
        }
    }
}

impl TranscriptProvider for MockTranscriptProvider {
    async fn fetch_captions(
        &self,
        video_id: &VideoId,
        languages: &[String],
    ) -> Result<Vec<CaptionRecord>, TranscriptError> {
        self.calls
            .lock()
            .unwrap()
            .push((video_id.to_string(), languages.to_vec()));
        if self.disabled {
            return Err(TranscriptError::TranscriptsDisabled {
                video_id: video_id.to_string(),
            });
        }
        Ok(self.captions.clone())
    }
}
