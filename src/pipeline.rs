//! Note generation pipeline.
//!
//! Coordinates one request from video URL to notes: transcript, then
//! metadata, then the language model.

use crate::config::{Prompts, Settings};
use crate::error::{NotesError, Result};
use crate::notes::{LanguageModel, NoteStyle, NotesGenerator, OpenRouterModel};
use crate::youtube::{
    extract_video_id, MetadataFetcher, TranscriptFetcher, VideoMetadata, YoutubeTranscriptFetcher,
    YtDlpMetadataFetcher,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// The request pipeline behind note generation.
pub struct NotesPipeline {
    transcripts: Arc<dyn TranscriptFetcher>,
    metadata: Arc<dyn MetadataFetcher>,
    generator: NotesGenerator,
}

impl NotesPipeline {
    /// Create a pipeline with the production adapters.
    ///
    /// Fails with a configuration error when no API key is available.
    pub fn new(settings: &Settings) -> Result<Self> {
        let api_key = settings.api_key()?;

        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let model: Arc<dyn LanguageModel> = Arc::new(OpenRouterModel::new(&settings.llm, &api_key)?);
        info!("Using model {}", settings.llm.model);

        Ok(Self {
            transcripts: Arc::new(YoutubeTranscriptFetcher::new(&settings.youtube)?),
            metadata: Arc::new(YtDlpMetadataFetcher::new(&settings.youtube)),
            generator: NotesGenerator::new(model, prompts, settings.notes.max_transcript_chars),
        })
    }

    /// Create a pipeline with custom components.
    pub fn with_components(
        transcripts: Arc<dyn TranscriptFetcher>,
        metadata: Arc<dyn MetadataFetcher>,
        generator: NotesGenerator,
    ) -> Self {
        Self {
            transcripts,
            metadata,
            generator,
        }
    }

    /// Generate notes for a video.
    #[instrument(skip(self), fields(url = %url, style = %style))]
    pub async fn generate_notes(&self, url: &str, style: NoteStyle) -> Result<GeneratedNotes> {
        let video_id = validate_url(url)?;

        info!("Fetching transcript for {}", video_id);
        let transcript = self.transcripts.fetch_transcript(url).await?;
        let text = transcript.full_text();
        info!(
            "Transcript has {} segments ({} chars, {})",
            transcript.segments.len(),
            text.chars().count(),
            transcript.language_code
        );

        // Metadata is cosmetic; note generation continues without it.
        let metadata = match self.metadata.fetch_metadata(url).await {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!("Metadata unavailable for {}: {}", video_id, e);
                VideoMetadata {
                    video_id: Some(video_id.clone()),
                    ..VideoMetadata::default()
                }
            }
        };

        let language = (!transcript.is_english()).then_some(transcript.language.as_str());
        let notes = self.generator.generate(&text, style, language).await?;

        Ok(GeneratedNotes {
            notes,
            metadata,
            transcript_language: transcript.language,
            transcript_language_code: transcript.language_code,
        })
    }

    /// Fetch a video's transcript as plain text.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn transcript_text(&self, url: &str) -> Result<String> {
        validate_url(url)?;
        let transcript = self.transcripts.fetch_transcript(url).await?;
        Ok(transcript.full_text())
    }
}

fn validate_url(url: &str) -> Result<String> {
    if url.trim().is_empty() {
        return Err(NotesError::InvalidInput("Missing YouTube URL".to_string()));
    }
    extract_video_id(url)
        .ok_or_else(|| NotesError::InvalidInput(format!("Invalid YouTube URL: {}", url.trim())))
}

/// Output of the pipeline for one video.
#[derive(Debug, Clone)]
pub struct GeneratedNotes {
    /// Notes text, verbatim from the model.
    pub notes: String,
    /// Best-effort metadata; empty when unavailable.
    pub metadata: VideoMetadata,
    pub transcript_language: String,
    pub transcript_language_code: String,
}
