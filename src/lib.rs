//! ytnotes - Study notes from YouTube videos
//!
//! A small web service and CLI that turns a YouTube video into structured
//! study notes: it fetches the video's captions, asks a hosted language model
//! (OpenRouter, OpenAI-compatible) to summarize them in a chosen style, and
//! renders the result as a downloadable PDF.
//!
//! # Architecture
//!
//! - `youtube` - Video ID parsing, caption transcripts, yt-dlp metadata
//! - `notes` - Note styles, prompt building, the language model seam
//! - `pdf` - Notes layout and PDF rendering
//! - `pipeline` - Request pipeline from URL to notes
//! - `api` - axum HTTP API
//! - `config` - Settings and prompt templates
//!
//! # Example
//!
//! ```rust,no_run
//! use ytnotes::config::Settings;
//! use ytnotes::notes::NoteStyle;
//! use ytnotes::pipeline::NotesPipeline;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let pipeline = NotesPipeline::new(&settings)?;
//!
//!     let result = pipeline
//!         .generate_notes("https://youtu.be/dQw4w9WgXcQ", NoteStyle::Summary)
//!         .await?;
//!     println!("{}", result.notes);
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod notes;
pub mod openai;
pub mod pdf;
pub mod pipeline;
pub mod youtube;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{NotesError, Result};
