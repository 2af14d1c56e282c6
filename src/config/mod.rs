//! Configuration module for ytnotes.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{NotesPrompts, Prompts, StyleGuidance};
pub use settings::{
    GeneralSettings, LlmSettings, NotesSettings, PdfSettings, PromptSettings, ServerSettings,
    Settings, YoutubeSettings,
};
