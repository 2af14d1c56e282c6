//! In-memory stand-ins for the external services, used by unit tests.

use crate::error::{NotesError, Result};
use crate::notes::LanguageModel;
use crate::youtube::{
    MetadataFetcher, Transcript, TranscriptFetcher, TranscriptSegment, VideoMetadata,
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// A transcript with the given segment texts, in English.
pub fn sample_transcript(texts: &[&str]) -> Transcript {
    Transcript {
        video_id: "dQw4w9WgXcQ".to_string(),
        language: "English".to_string(),
        language_code: "en".to_string(),
        is_generated: false,
        segments: texts
            .iter()
            .enumerate()
            .map(|(i, text)| TranscriptSegment::new(*text, i as f64 * 2.0, 2.0))
            .collect(),
    }
}

pub struct FakeTranscriptFetcher {
    transcript: Option<Transcript>,
    calls: AtomicUsize,
}

impl FakeTranscriptFetcher {
    pub fn returning(transcript: Transcript) -> Self {
        Self {
            transcript: Some(transcript),
            calls: AtomicUsize::new(0),
        }
    }

    /// Behaves like a video with captions disabled.
    pub fn disabled() -> Self {
        Self {
            transcript: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranscriptFetcher for FakeTranscriptFetcher {
    async fn fetch_transcript(&self, _url: &str) -> Result<Transcript> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.transcript.clone().ok_or_else(|| {
            NotesError::TranscriptUnavailable(
                "Transcripts are disabled for this video.".to_string(),
            )
        })
    }
}

pub struct FakeMetadataFetcher {
    metadata: Option<VideoMetadata>,
    calls: AtomicUsize,
}

impl FakeMetadataFetcher {
    pub fn returning(metadata: VideoMetadata) -> Self {
        Self {
            metadata: Some(metadata),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            metadata: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataFetcher for FakeMetadataFetcher {
    async fn fetch_metadata(&self, _url: &str) -> Result<VideoMetadata> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.metadata
            .clone()
            .ok_or_else(|| NotesError::MetadataUnavailable("yt-dlp failed".to_string()))
    }
}

pub struct FakeLanguageModel {
    reply: std::result::Result<String, String>,
    prompts: Mutex<Vec<String>>,
}

impl FakeLanguageModel {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl LanguageModel for FakeLanguageModel {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone().map_err(NotesError::Generation)
    }

    fn model_name(&self) -> &str {
        "fake/model"
    }
}
