//! Study-note generation from transcripts.
//!
//! The prompt is built locally; the completion itself comes from a
//! [`LanguageModel`], normally the OpenRouter-backed [`OpenRouterModel`].

mod openrouter;

pub use openrouter::OpenRouterModel;

use crate::config::Prompts;
use crate::error::{NotesError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Marker appended to transcripts cut at the length limit.
pub const TRUNCATION_MARKER: &str = "... [truncated]";

/// Tone and format of the generated notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NoteStyle {
    #[default]
    Comprehensive,
    Summary,
    Detailed,
    BulletPoints,
}

impl NoteStyle {
    /// Every supported style, in display order.
    pub const ALL: [NoteStyle; 4] = [
        NoteStyle::Comprehensive,
        NoteStyle::Summary,
        NoteStyle::Detailed,
        NoteStyle::BulletPoints,
    ];

    /// Wire value, as accepted in requests.
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteStyle::Comprehensive => "comprehensive",
            NoteStyle::Summary => "summary",
            NoteStyle::Detailed => "detailed",
            NoteStyle::BulletPoints => "bullet_points",
        }
    }

    /// Name shown to users.
    pub fn display_name(&self) -> &'static str {
        match self {
            NoteStyle::Comprehensive => "Comprehensive",
            NoteStyle::Summary => "Summary",
            NoteStyle::Detailed => "Detailed",
            NoteStyle::BulletPoints => "Bullet Points",
        }
    }
}

impl std::str::FromStr for NoteStyle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        NoteStyle::ALL
            .into_iter()
            .find(|style| style.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| {
                format!(
                    "Unknown note style: {}. Expected one of: {}",
                    s,
                    NoteStyle::ALL
                        .iter()
                        .map(|s| s.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            })
    }
}

impl std::fmt::Display for NoteStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A hosted text-completion model.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Submit a single prompt and return the first completion's text.
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Model identifier, for logging.
    fn model_name(&self) -> &str;
}

/// Builds note prompts and submits them to a language model.
pub struct NotesGenerator {
    model: Arc<dyn LanguageModel>,
    prompts: Prompts,
    max_transcript_chars: usize,
}

impl NotesGenerator {
    pub fn new(model: Arc<dyn LanguageModel>, prompts: Prompts, max_transcript_chars: usize) -> Self {
        Self {
            model,
            prompts,
            max_transcript_chars,
        }
    }

    /// Render the prompt for a transcript.
    ///
    /// `language` names the caption language when it is not English.
    pub fn build_prompt(&self, transcript: &str, style: NoteStyle, language: Option<&str>) -> String {
        let transcript = truncate_transcript(transcript, self.max_transcript_chars);

        let language_note = match language {
            Some(language) => {
                let mut vars = HashMap::new();
                vars.insert("language".to_string(), language.to_string());
                self.prompts
                    .render_with_custom(&self.prompts.notes.language_note, &vars)
            }
            None => String::new(),
        };

        let mut vars = HashMap::new();
        vars.insert("style".to_string(), style.as_str().to_string());
        vars.insert("transcript".to_string(), transcript.into_owned());
        vars.insert("language_note".to_string(), language_note);
        vars.insert("guidance".to_string(), self.guidance(style).to_string());

        self.prompts
            .render_with_custom(&self.prompts.notes.template, &vars)
    }

    fn guidance(&self, style: NoteStyle) -> &str {
        let guidance = &self.prompts.notes.guidance;
        match style {
            NoteStyle::Comprehensive => &guidance.comprehensive,
            NoteStyle::Summary => &guidance.summary,
            NoteStyle::Detailed => &guidance.detailed,
            NoteStyle::BulletPoints => &guidance.bullet_points,
        }
    }

    /// Generate notes for a transcript in the given style.
    #[instrument(skip(self, transcript), fields(chars = transcript.len(), style = %style))]
    pub async fn generate(
        &self,
        transcript: &str,
        style: NoteStyle,
        language: Option<&str>,
    ) -> Result<String> {
        let prompt = self.build_prompt(transcript, style, language);
        info!("Requesting {} notes from {}", style, self.model.model_name());

        let notes = self.model.complete(&prompt).await?;
        if notes.trim().is_empty() {
            return Err(NotesError::Generation(
                "No response content received from API".to_string(),
            ));
        }

        debug!("Generated {} characters of notes", notes.len());
        Ok(notes)
    }
}

/// Cap a transcript at `max_chars` characters, marking the cut.
pub fn truncate_transcript(transcript: &str, max_chars: usize) -> Cow<'_, str> {
    match transcript.char_indices().nth(max_chars) {
        Some((idx, _)) => {
            warn!(
                "Transcript exceeds {} characters, truncating before generation",
                max_chars
            );
            Cow::Owned(format!("{}{}", &transcript[..idx], TRUNCATION_MARKER))
        }
        None => Cow::Borrowed(transcript),
    }
}
