//! YouTube access for ytnotes.
//!
//! Provides trait-based interfaces for the two things the pipeline needs from
//! YouTube: caption transcripts and descriptive metadata.

mod metadata;
mod transcript;

pub use metadata::YtDlpMetadataFetcher;
pub use transcript::YoutubeTranscriptFetcher;

use crate::error::Result;
use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static VIDEO_ID: LazyLock<Regex> = LazyLock::new(|| {
    // Matches various YouTube URL formats and bare video IDs
    Regex::new(
        r"(?x)
        (?:
            # Full YouTube URLs
            (?:https?://)?
            (?:www\.|m\.)?
            (?:
                youtube\.com/watch\?(?:[^\s\#]*&)?v=
                | youtu\.be/
                | youtube\.com/(?:embed|v|shorts|live)/
            )
            ([a-zA-Z0-9_-]{11})
        )
        |
        # Bare video ID (11 characters)
        ^([a-zA-Z0-9_-]{11})$
    ",
    )
    .expect("Invalid regex")
});

/// Extract the 11-character video ID from a YouTube URL or bare ID.
pub fn extract_video_id(input: &str) -> Option<String> {
    let caps = VIDEO_ID.captures(input.trim())?;

    // Try group 1 (URL format) then group 2 (bare ID)
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_string())
}

/// Canonical watch URL for a video ID.
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

/// One timed caption entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Caption text.
    pub text: String,
    /// Start time in seconds.
    pub start: f64,
    /// Duration in seconds.
    pub duration: f64,
}

impl TranscriptSegment {
    pub fn new(text: impl Into<String>, start: f64, duration: f64) -> Self {
        Self {
            text: text.into(),
            start,
            duration,
        }
    }
}

/// The caption track of a video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    /// Video ID this transcript belongs to.
    pub video_id: String,
    /// Human-readable language name of the track (e.g. "English").
    pub language: String,
    /// Language code of the track (e.g. "en").
    pub language_code: String,
    /// Whether the track was generated by speech recognition.
    pub is_generated: bool,
    /// Caption segments, oldest first.
    pub segments: Vec<TranscriptSegment>,
}

impl Transcript {
    /// All segment texts joined with single spaces, in order.
    pub fn full_text(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Whether the track is in English.
    pub fn is_english(&self) -> bool {
        let code = self.language_code.to_lowercase();
        code.is_empty() || code == "en" || code.starts_with("en-")
    }
}

/// Descriptive attributes of a video. Every field is best-effort.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub duration_seconds: Option<u32>,
    /// Publication date as `YYYY-MM-DD`.
    pub publish_date: Option<String>,
    pub view_count: Option<u64>,
    pub description: Option<String>,
    pub video_id: Option<String>,
}

impl VideoMetadata {
    /// Duration formatted as M:SS (or H:MM:SS for long videos).
    pub fn formatted_duration(&self) -> Option<String> {
        self.duration_seconds.map(format_duration)
    }
}

/// Format seconds as M:SS or H:MM:SS.
pub fn format_duration(total_seconds: u32) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// Source of caption transcripts.
#[async_trait]
pub trait TranscriptFetcher: Send + Sync {
    /// Fetch the caption track for a video URL or ID.
    ///
    /// Fails with `TranscriptUnavailable` when the video has no usable captions.
    async fn fetch_transcript(&self, url: &str) -> Result<Transcript>;
}

/// Source of video metadata.
#[async_trait]
pub trait MetadataFetcher: Send + Sync {
    /// Fetch descriptive metadata for a video URL or ID.
    async fn fetch_metadata(&self, url: &str) -> Result<VideoMetadata>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_video_id() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            extract_video_id("https://youtube.com/embed/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            extract_video_id("https://m.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/shorts/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            extract_video_id("  dQw4w9WgXcQ  "),
            Some("dQw4w9WgXcQ".to_string())
        );

        assert_eq!(extract_video_id("not-a-video-id"), None);
        assert_eq!(extract_video_id("https://vimeo.com/123456789"), None);
        assert_eq!(extract_video_id(""), None);
    }

    #[test]
    fn test_full_text_joins_in_order() {
        let transcript = Transcript {
            video_id: "dQw4w9WgXcQ".to_string(),
            language: "English".to_string(),
            language_code: "en".to_string(),
            is_generated: false,
            segments: vec![
                TranscriptSegment::new("Hello world", 0.0, 2.0),
                TranscriptSegment::new("this is", 2.0, 1.5),
                TranscriptSegment::new("a test", 3.5, 1.0),
            ],
        };

        assert_eq!(transcript.full_text(), "Hello world this is a test");
        assert!(transcript.is_english());
    }

    #[test]
    fn test_is_english() {
        let mut transcript = Transcript {
            video_id: String::new(),
            language: "Hindi".to_string(),
            language_code: "hi".to_string(),
            is_generated: true,
            segments: Vec::new(),
        };
        assert!(!transcript.is_english());

        transcript.language_code = "en-GB".to_string();
        assert!(transcript.is_english());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(65), "1:05");
        assert_eq!(format_duration(3665), "1:01:05");
    }
}
