//! Request and response bodies.

use crate::notes::NoteStyle;
use crate::pdf::VideoDetails;
use crate::pipeline::GeneratedNotes;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct NotesRequest {
    #[serde(default)]
    pub url: String,
    /// Style value; the configured default when absent.
    #[serde(default)]
    pub style: Option<String>,
}

/// Successful note generation. Metadata fields are empty strings when the
/// metadata lookup failed.
#[derive(Debug, Serialize, Deserialize)]
pub struct NotesResponse {
    pub success: bool,
    pub notes: String,
    pub video_title: String,
    pub video_author: String,
    pub video_duration: String,
    pub publish_date: String,
    pub view_count: String,
    pub description: String,
    pub video_id: String,
    pub transcript_language: String,
    pub transcript_language_code: String,
}

impl From<GeneratedNotes> for NotesResponse {
    fn from(generated: GeneratedNotes) -> Self {
        let metadata = generated.metadata;
        Self {
            success: true,
            notes: generated.notes,
            video_duration: metadata.formatted_duration().unwrap_or_default(),
            view_count: metadata
                .view_count
                .map(|v| v.to_string())
                .unwrap_or_default(),
            video_title: metadata.title.unwrap_or_default(),
            video_author: metadata.author.unwrap_or_default(),
            publish_date: metadata.publish_date.unwrap_or_default(),
            description: metadata.description.unwrap_or_default(),
            video_id: metadata.video_id.unwrap_or_default(),
            transcript_language: generated.transcript_language,
            transcript_language_code: generated.transcript_language_code,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PdfRequest {
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub youtube_url: Option<String>,
    /// Printed under the title when present.
    #[serde(default)]
    pub metadata: Option<VideoDetails>,
}

#[derive(Debug, Deserialize)]
pub struct TranscriptQuery {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TranscriptResponse {
    pub transcript: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub version: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StyleInfo {
    pub value: String,
    pub name: String,
}

impl From<NoteStyle> for StyleInfo {
    fn from(style: NoteStyle) -> Self {
        Self {
            value: style.as_str().to_string(),
            name: style.display_name().to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StylesResponse {
    pub styles: Vec<StyleInfo>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}
