//! # Watch page parser
//!
//! Extracts caption track listings from a YouTube watch page and turns the
//! `timedtext` XML of a track into [`CaptionRecord`]s.

use std::{borrow::Cow, ops::Deref, sync::LazyLock};

use regex::{Captures, Regex};
use serde::Deserialize;
use url::Url;

use crate::{error::PageError, types::CaptionRecord};

static CAPTIONS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)"captions":\s*(\{.*?\}),\s*"videoDetails""#).unwrap()
});

static PLAYABILITY_REASON_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""playabilityStatus":\s*\{\s*"status":\s*"([A-Z_]+)"(?:,\s*"reason":\s*"([^"]*)")?"#)
        .unwrap()
});

static TEXT_CUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<text\s+start="([^"]*)"(?:\s+dur="([^"]*)")?[^>]*>(.*?)</text>"#).unwrap()
});

static SRV3_CUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<p\s+t="([0-9]+)"(?:\s+d="([0-9]+)")?[^>]*>(.*?)</p>"#).unwrap()
});

static ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|amp|lt|gt|quot|apos|nbsp);").unwrap());

static MARKUP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Captions {
    player_captions_tracklist_renderer: Option<TracklistRenderer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TracklistRenderer {
    #[serde(default)]
    caption_tracks: Vec<CaptionTrack>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionTrack {
    pub base_url: String,
    pub language_code: String,
    /// `Some("asr")` for auto-generated tracks
    pub kind: Option<String>,
}

impl CaptionTrack {
    pub fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }

    /// `base_url` without a `fmt` override, so the endpoint answers with the
    /// default timedtext layout.
    pub fn transcript_url(&self) -> String {
        let Ok(mut url) = Url::parse(&self.base_url) else {
            return self.base_url.clone();
        };

        let kept = url
            .query_pairs()
            .filter(|(key, _)| key != "fmt")
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect::<Vec<_>>();
        if kept.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(kept);
        }

        url.to_string()
    }
}

pub struct WatchPage(String);

impl Deref for WatchPage {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<String> for WatchPage {
    fn from(value: String) -> Self {
        WatchPage(value)
    }
}

impl WatchPage {
    pub fn new(html: String) -> Self {
        WatchPage(html)
    }

    /// Lists the caption tracks advertised by the page's player response.
    pub fn caption_tracks(&self) -> Result<Vec<CaptionTrack>, PageError> {
        let Some(captions_json) = CAPTIONS_RE.captures(self).and_then(|cap| cap.get(1)) else {
            return Err(self.missing_captions_reason());
        };

        let captions = serde_json::from_str::<Captions>(captions_json.as_str())?;
        let tracks = captions
            .player_captions_tracklist_renderer
            .map(|renderer| renderer.caption_tracks)
            .unwrap_or_default();

        if tracks.is_empty() {
            return Err(PageError::CaptionsDisabled);
        }

        Ok(tracks)
    }

    fn missing_captions_reason(&self) -> PageError {
        if self.contains(r#"class="g-recaptcha""#) {
            return PageError::RateLimited;
        }

        match PLAYABILITY_REASON_RE.captures(self) {
            Some(cap) if &cap[1] != "OK" => PageError::VideoUnavailable(
                cap.get(2)
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_else(|| cap[1].to_string()),
            ),
            Some(_) => PageError::CaptionsDisabled,
            None => PageError::ParseError("No playabilityStatus found in watch page"),
        }
    }
}

/// Picks the first track matching `languages` in preference order, favouring
/// manually created tracks over generated ones for the same language.
pub fn select_track<'a>(tracks: &'a [CaptionTrack], languages: &[String]) -> Option<&'a CaptionTrack> {
    languages.iter().find_map(|lang| {
        let mut candidates = tracks.iter().filter(|t| t.language_code == *lang);
        let first = candidates.clone().find(|t| !t.is_generated());
        first.or_else(|| candidates.next())
    })
}

/// Parses the `timedtext` XML document of a caption track.
///
/// Both the legacy `<text start dur>` layout (seconds) and the `srv3`
/// `<p t d>` layout (milliseconds) are understood.
pub fn parse_timedtext(xml: &str) -> Vec<CaptionRecord> {
    let cues = TEXT_CUE_RE
        .captures_iter(xml)
        .filter_map(|cap| {
            caption_record(
                cap.get(3)?.as_str(),
                cap[1].parse().unwrap_or_default(),
                cap.get(2)
                    .and_then(|m| m.as_str().parse().ok())
                    .unwrap_or_default(),
            )
        })
        .collect::<Vec<_>>();
    if !cues.is_empty() {
        return cues;
    }

    SRV3_CUE_RE
        .captures_iter(xml)
        .filter_map(|cap| {
            let millis = |m: Option<regex::Match>| {
                m.and_then(|m| m.as_str().parse::<f64>().ok())
                    .unwrap_or_default()
                    / 1000.0
            };
            caption_record(cap.get(3)?.as_str(), millis(cap.get(1)), millis(cap.get(2)))
        })
        .collect()
}

fn caption_record(raw: &str, start: f64, duration: f64) -> Option<CaptionRecord> {
    // cue text arrives XML-escaped on top of HTML entities
    let decoded = unescape_entities(&unescape_entities(raw)).into_owned();
    let text = MARKUP_RE.replace_all(&decoded, "").trim().to_string();
    if text.is_empty() {
        return None;
    }

    Some(CaptionRecord {
        text,
        start,
        duration,
    })
}

fn unescape_entities(text: &str) -> Cow<'_, str> {
    ENTITY_RE.replace_all(text, |cap: &Captures| {
        let entity = &cap[1];
        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            "nbsp" => Some(' '),
            _ => entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
                .map(|hex| u32::from_str_radix(hex, 16))
                .unwrap_or_else(|| entity[1..].parse())
                .ok()
                .and_then(char::from_u32),
        };
        decoded.map_or_else(|| cap[0].to_string(), String::from)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_with_captions(captions: &str) -> WatchPage {
        WatchPage::new(format!(
            r#"<html><script>var ytInitialPlayerResponse = {{"playabilityStatus":{{"status":"OK"}},"captions":{captions},"videoDetails":{{"videoId":"abc123"}}}};</script></html>"#
        ))
    }

    fn track(lang: &str, kind: Option<&str>) -> CaptionTrack {
        CaptionTrack {
            base_url: format!("https://www.youtube.com/api/timedtext?lang={lang}"),
            language_code: lang.to_string(),
            kind: kind.map(String::from),
        }
    }

    #[test]
    fn test_extracts_caption_tracks() {
        let page = page_with_captions(
            r#"{"playerCaptionsTracklistRenderer":{"captionTracks":[
                {"baseUrl":"https://www.youtube.com/api/timedtext?v=abc123&lang=en","name":{"simpleText":"English"},"languageCode":"en"},
                {"baseUrl":"https://www.youtube.com/api/timedtext?v=abc123&lang=hi&kind=asr","languageCode":"hi","kind":"asr"}
            ],"audioTracks":[]}}"#,
        );

        let tracks = page.caption_tracks().expect("Failed to extract caption tracks");
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].language_code, "en");
        assert!(!tracks[0].is_generated());
        assert!(tracks[1].is_generated());
        assert!(tracks[1].base_url.contains("lang=hi"));
    }

    #[test]
    fn test_page_without_captions_means_disabled() {
        let page = WatchPage::new(
            r#"<script>var ytInitialPlayerResponse = {"playabilityStatus":{"status":"OK"},"videoDetails":{}};</script>"#
                .to_string(),
        );
        assert!(matches!(page.caption_tracks(), Err(PageError::CaptionsDisabled)));
    }

    #[test]
    fn test_empty_track_list_means_disabled() {
        let page = page_with_captions(r#"{"playerCaptionsTracklistRenderer":{"captionTracks":[]}}"#);
        assert!(matches!(page.caption_tracks(), Err(PageError::CaptionsDisabled)));
    }

    #[test]
    fn test_unplayable_video_reports_reason() {
        let page = WatchPage::new(
            r#"{"playabilityStatus":{"status":"ERROR","reason":"Video unavailable"}}"#.to_string(),
        );
        match page.caption_tracks() {
            Err(PageError::VideoUnavailable(reason)) => assert_eq!(reason, "Video unavailable"),
            other => panic!("Expected VideoUnavailable, got {other:?}"),
        }
    }

    #[test]
    fn test_recaptcha_page_is_rate_limited() {
        let page = WatchPage::new(r#"<div class="g-recaptcha"></div>"#.to_string());
        assert!(matches!(page.caption_tracks(), Err(PageError::RateLimited)));
    }

    #[test]
    fn test_unrecognized_page_is_parse_error() {
        let page = WatchPage::new("<html><body>nothing</body></html>".to_string());
        assert!(matches!(page.caption_tracks(), Err(PageError::ParseError(_))));
    }

    #[test]
    fn test_transcript_url_drops_format_override() {
        let mut srv3 = track("en", None);
        srv3.base_url =
            "https://www.youtube.com/api/timedtext?v=abc123&lang=en&fmt=srv3&sig=X1".to_string();
        assert_eq!(
            srv3.transcript_url(),
            "https://www.youtube.com/api/timedtext?v=abc123&lang=en&sig=X1"
        );

        let plain = track("hi", None);
        assert_eq!(plain.transcript_url(), plain.base_url);
    }

    #[test]
    fn test_select_track_prefers_language_order_then_manual() {
        let tracks = vec![
            track("hi", None),
            track("en", Some("asr")),
            track("en", None),
        ];

        let en = select_track(&tracks, &["en".to_string(), "hi".to_string()]).unwrap();
        assert_eq!(en.language_code, "en");
        assert!(!en.is_generated());

        let hi = select_track(&tracks, &["te".to_string(), "hi".to_string()]).unwrap();
        assert_eq!(hi.language_code, "hi");

        assert!(select_track(&tracks, &["te".to_string()]).is_none());
    }

    #[test]
    fn test_select_track_falls_back_to_generated() {
        let tracks = vec![track("en", Some("asr"))];
        let en = select_track(&tracks, &["en".to_string()]).unwrap();
        assert!(en.is_generated());
    }

    #[test]
    fn test_parse_timedtext() {
        let xml = r##"<?xml version="1.0" encoding="utf-8" ?><transcript>
            <text start="0.12" dur="2.5">Hey there &amp;amp; welcome</text>
            <text start="2.62" dur="1.8">it&amp;#39;s <font color="#E5E5E5">great</font></text>
            <text start="4.42" dur="0.5"></text>
            <text start="4.92">&amp;gt;&amp;gt; music</text>
        </transcript>"##;

        let cues = parse_timedtext(xml);
        assert_eq!(cues.len(), 3);
        assert_eq!(cues[0].text, "Hey there & welcome");
        assert_eq!(cues[0].start, 0.12);
        assert_eq!(cues[0].duration, 2.5);
        assert_eq!(cues[1].text, "it's great");
        assert_eq!(cues[2].text, ">> music");
        assert_eq!(cues[2].duration, 0.0);
    }

    #[test]
    fn test_parse_srv3_timedtext() {
        let xml = r#"<?xml version="1.0" encoding="utf-8" ?><timedtext format="3"><body>
            <p t="120" d="2500">Hey there welcome</p>
            <p t="2620" d="1800"><s ac="0">it&amp;#39;s</s><s t="400"> great</s></p>
            <p t="4420" d="500"></p>
            <p t="4920">bye</p>
        </body></timedtext>"#;

        let cues = parse_timedtext(xml);
        assert_eq!(cues.len(), 3);
        assert_eq!(cues[0].text, "Hey there welcome");
        assert_eq!(cues[0].start, 0.12);
        assert_eq!(cues[0].duration, 2.5);
        assert_eq!(cues[1].text, "it's great");
        assert_eq!(cues[2].text, "bye");
        assert_eq!(cues[2].duration, 0.0);
    }

    #[test]
    fn test_unreadable_timedtext_yields_no_cues() {
        assert!(parse_timedtext("<html>error</html>").is_empty());
        assert!(parse_timedtext("").is_empty());
    }

    #[test]
    fn test_unescape_leaves_unknown_entities() {
        assert_eq!(unescape_entities("a &bogus; b &#x41;"), "a &bogus; b A");
    }
}
