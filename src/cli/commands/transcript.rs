//! Transcript command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::youtube::{TranscriptFetcher, YoutubeTranscriptFetcher};
use anyhow::Result;

/// Print a video's caption transcript.
pub async fn run_transcript(url: &str, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Transcript, &settings) {
        Output::error(&e.to_string());
        return Err(e.into());
    }

    let fetcher = YoutubeTranscriptFetcher::new(&settings.youtube)?;

    let spinner = Output::spinner("Fetching transcript...");
    let result = fetcher.fetch_transcript(url).await;
    spinner.finish_and_clear();
    let transcript = result?;

    Output::info(&format!(
        "{} segments, {}{}",
        transcript.segments.len(),
        transcript.language,
        if transcript.is_generated {
            " (auto-generated)"
        } else {
            ""
        }
    ));
    println!("{}", transcript.full_text());

    Ok(())
}
