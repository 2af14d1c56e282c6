//! Notes command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::notes::NoteStyle;
use crate::pdf::{NotesDocument, PdfRenderer, VideoDetails};
use crate::pipeline::NotesPipeline;
use anyhow::Result;

/// Generate notes for a video and print or save them.
pub async fn run_notes(
    url: &str,
    style: Option<&str>,
    output: Option<&str>,
    pdf: Option<&str>,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Notes, &settings) {
        Output::error(&e.to_string());
        Output::info("Run 'ytnotes doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let style = match style {
        Some(value) => value.parse::<NoteStyle>().map_err(|e| anyhow::anyhow!(e))?,
        None => settings.notes.default_style,
    };

    let pipeline = NotesPipeline::new(&settings)?;

    let spinner = Output::spinner(&format!("Generating {} notes...", style.display_name()));
    let result = pipeline.generate_notes(url, style).await;
    spinner.finish_and_clear();
    let generated = result?;

    let title = generated
        .metadata
        .title
        .clone()
        .unwrap_or_else(|| "YouTube Notes".to_string());
    Output::success(&format!("Generated notes for '{}'", title));
    if let Some(author) = &generated.metadata.author {
        Output::info(&format!("Channel: {}", author));
    }
    if let Some(duration) = generated.metadata.formatted_duration() {
        Output::info(&format!("Duration: {}", duration));
    }

    match output {
        Some(path) => {
            std::fs::write(path, &generated.notes)?;
            Output::success(&format!("Notes written to {}", path));
        }
        None => println!("{}", generated.notes),
    }

    if let Some(path) = pdf {
        let renderer = PdfRenderer::new(&settings.pdf);
        let details = VideoDetails::from(&generated.metadata);
        let bytes = renderer.render(&NotesDocument {
            title: &title,
            notes: &generated.notes,
            source_url: Some(url),
            details: Some(&details),
        })?;
        std::fs::write(path, bytes)?;
        Output::success(&format!("PDF written to {}", path));
    }

    Ok(())
}
