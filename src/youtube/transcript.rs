//! Caption transcripts scraped from YouTube's innertube player API.

use super::{extract_video_id, watch_url, Transcript, TranscriptFetcher, TranscriptSegment};
use crate::config::YoutubeSettings;
use crate::error::{NotesError, Result};
use async_trait::async_trait;
use regex::{Captures, Regex};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use serde::Deserialize;
use std::sync::LazyLock;
use tracing::{debug, info, instrument};

const PLAYER_URL: &str = "https://www.youtube.com/youtubei/v1/player";
const ANDROID_CLIENT_VERSION: &str = "20.10.38";
const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

static API_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""INNERTUBE_API_KEY":\s*"([a-zA-Z0-9_-]+)""#).expect("Invalid regex")
});

static TEXT_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<text\s+start="([^"]*)"(?:\s+dur="([^"]*)")?[^>]*>(.*?)</text>"#)
        .expect("Invalid regex")
});

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("Invalid regex"));

static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|amp|lt|gt|quot|apos|nbsp);").expect("Invalid regex")
});

/// Transcript fetcher backed by YouTube's caption tracks.
pub struct YoutubeTranscriptFetcher {
    client: reqwest::Client,
    preferred_languages: Vec<String>,
}

impl YoutubeTranscriptFetcher {
    pub fn new(settings: &YoutubeSettings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            preferred_languages: settings.preferred_languages.clone(),
        })
    }

    /// Read the innertube API key embedded in the watch page.
    async fn fetch_api_key(&self, video_id: &str) -> Result<String> {
        let html = self
            .client
            .get(watch_url(video_id))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(unreachable_video)?
            .text()
            .await
            .map_err(unreachable_video)?;

        if html.contains("class=\"g-recaptcha\"") {
            return Err(NotesError::TranscriptUnavailable(
                "YouTube is rate limiting transcript requests. Please try again later.".to_string(),
            ));
        }

        API_KEY
            .captures(&html)
            .map(|caps| caps[1].to_string())
            .ok_or_else(|| {
                NotesError::TranscriptUnavailable(format!(
                    "Video {} is unavailable. It may be private, deleted, or restricted.",
                    video_id
                ))
            })
    }

    async fn fetch_player(&self, video_id: &str, api_key: &str) -> Result<PlayerResponse> {
        let body = serde_json::json!({
            "context": {
                "client": {
                    "clientName": "ANDROID",
                    "clientVersion": ANDROID_CLIENT_VERSION,
                }
            },
            "videoId": video_id,
        });

        self.client
            .post(PLAYER_URL)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(unreachable_video)?
            .json::<PlayerResponse>()
            .await
            .map_err(unreachable_video)
    }

    async fn fetch_segments(&self, track: &CaptionTrack) -> Result<Vec<TranscriptSegment>> {
        let url = timed_text_url(&track.base_url)?;
        let xml = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(unreachable_video)?
            .text()
            .await
            .map_err(unreachable_video)?;

        Ok(parse_timed_text(&xml))
    }
}

#[async_trait]
impl TranscriptFetcher for YoutubeTranscriptFetcher {
    #[instrument(skip(self))]
    async fn fetch_transcript(&self, url: &str) -> Result<Transcript> {
        let video_id = extract_video_id(url).ok_or_else(|| {
            NotesError::InvalidInput(format!("Invalid YouTube video ID or URL: {}", url))
        })?;

        let api_key = self.fetch_api_key(&video_id).await?;
        let player = self.fetch_player(&video_id, &api_key).await?;

        if let Some(status) = &player.playability_status {
            if status.status != "OK" {
                let reason = status.reason.as_deref().unwrap_or("unknown reason");
                return Err(NotesError::TranscriptUnavailable(format!(
                    "Video {} is unavailable: {}",
                    video_id, reason
                )));
            }
        }

        let tracks = player.caption_tracks();
        if tracks.is_empty() {
            return Err(NotesError::TranscriptUnavailable(format!(
                "Transcripts are disabled for video {}. Subtitles may be disabled by the owner.",
                video_id
            )));
        }

        let track = select_track(tracks, &self.preferred_languages).ok_or_else(|| {
            NotesError::TranscriptUnavailable(format!("No transcript available for video {}", video_id))
        })?;
        debug!(
            "Using caption track {} (generated: {})",
            track.language_code,
            track.is_generated()
        );

        let segments = self.fetch_segments(track).await?;
        if segments.is_empty() {
            return Err(NotesError::TranscriptUnavailable(format!(
                "The transcript for video {} is empty.",
                video_id
            )));
        }

        info!("Fetched {} caption segments for {}", segments.len(), video_id);

        Ok(Transcript {
            video_id,
            language: track.display_name(),
            language_code: track.language_code.clone(),
            is_generated: track.is_generated(),
            segments,
        })
    }
}

fn unreachable_video(e: reqwest::Error) -> NotesError {
    NotesError::TranscriptUnavailable(format!(
        "Could not retrieve transcript for this video: {}",
        e
    ))
}

// === Player response ===

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerResponse {
    playability_status: Option<PlayabilityStatus>,
    captions: Option<Captions>,
}

impl PlayerResponse {
    fn caption_tracks(&self) -> &[CaptionTrack] {
        self.captions
            .as_ref()
            .and_then(|c| c.tracklist.as_ref())
            .map(|t| t.caption_tracks.as_slice())
            .unwrap_or(&[])
    }
}

#[derive(Debug, Deserialize)]
struct PlayabilityStatus {
    status: String,
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Captions {
    #[serde(rename = "playerCaptionsTracklistRenderer")]
    tracklist: Option<Tracklist>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Tracklist {
    #[serde(default)]
    caption_tracks: Vec<CaptionTrack>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionTrack {
    base_url: String,
    #[serde(default)]
    language_code: String,
    name: Option<TrackName>,
    /// `asr` for speech-recognition tracks.
    kind: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrackName {
    simple_text: Option<String>,
    #[serde(default)]
    runs: Vec<TextRun>,
}

#[derive(Debug, Clone, Deserialize)]
struct TextRun {
    text: String,
}

impl CaptionTrack {
    fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }

    fn display_name(&self) -> String {
        self.name
            .as_ref()
            .and_then(|n| {
                n.simple_text
                    .clone()
                    .or_else(|| n.runs.first().map(|r| r.text.clone()))
            })
            .unwrap_or_else(|| self.language_code.clone())
    }
}

/// Caption URL without its `fmt` parameter, so the legacy `<text>` format is
/// served.
fn timed_text_url(base_url: &str) -> Result<url::Url> {
    let mut url = url::Url::parse(base_url).map_err(|e| {
        NotesError::TranscriptUnavailable(format!("Invalid caption track URL: {}", e))
    })?;
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != "fmt")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    url.query_pairs_mut().clear().extend_pairs(kept);
    Ok(url)
}

/// Pick the caption track to use: preferred languages in order, manual
/// tracks before generated ones, else the first listed track.
fn select_track<'a>(tracks: &'a [CaptionTrack], preferred: &[String]) -> Option<&'a CaptionTrack> {
    for generated in [false, true] {
        for lang in preferred {
            if let Some(track) = tracks
                .iter()
                .find(|t| t.is_generated() == generated && t.language_code.eq_ignore_ascii_case(lang))
            {
                return Some(track);
            }
        }
    }

    tracks.first()
}

// === Timed text ===

/// Parse YouTube timed-text XML into segments, dropping empty entries.
fn parse_timed_text(xml: &str) -> Vec<TranscriptSegment> {
    TEXT_ELEMENT
        .captures_iter(xml)
        .filter_map(|caps| {
            let start = caps[1].parse::<f64>().unwrap_or(0.0);
            let duration = caps
                .get(2)
                .and_then(|m| m.as_str().parse::<f64>().ok())
                .unwrap_or(0.0);

            // Caption text is HTML escaped inside XML, so it is decoded twice.
            let text = decode_entities(&caps[3]);
            let text = TAG.replace_all(&text, "");
            let text = decode_entities(&text);
            let text = text.split_whitespace().collect::<Vec<_>>().join(" ");

            if text.is_empty() {
                None
            } else {
                Some(TranscriptSegment::new(text, start, duration))
            }
        })
        .collect()
}

/// Decode the XML/HTML entities that appear in caption text.
fn decode_entities(input: &str) -> String {
    ENTITY
        .replace_all(input, |caps: &Captures| {
            let entity = &caps[1];
            let decoded = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some(' '),
                _ if entity.starts_with("#x") || entity.starts_with("#X") => {
                    u32::from_str_radix(&entity[2..], 16).ok().and_then(char::from_u32)
                }
                _ => entity[1..].parse::<u32>().ok().and_then(char::from_u32),
            };
            decoded
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
