//! PDF command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::pdf::{download_filename, NotesDocument, PdfRenderer};
use anyhow::{Context, Result};

/// Render a notes file to PDF.
pub fn run_pdf(
    file: &str,
    title: &str,
    url: Option<&str>,
    output: Option<&str>,
    settings: &Settings,
) -> Result<()> {
    let notes = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read notes from {}", file))?;

    if notes.trim().is_empty() || title.trim().is_empty() {
        anyhow::bail!("Missing notes or title");
    }

    let renderer = PdfRenderer::new(&settings.pdf);
    let document = NotesDocument {
        title,
        notes: &notes,
        source_url: url,
        details: None,
    };
    let pages = renderer.layout(&document).pages.len();
    let bytes = renderer.render(&document)?;

    let path = output
        .map(str::to_string)
        .unwrap_or_else(|| download_filename(title));
    std::fs::write(&path, bytes)?;

    Output::success(&format!("Wrote {} ({} page(s))", path, pages));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_pdf_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let notes_path = dir.path().join("notes.md");
        let pdf_path = dir.path().join("notes.pdf");
        std::fs::write(&notes_path, "# Heading\n- one\n- two\n").unwrap();

        run_pdf(
            notes_path.to_str().unwrap(),
            "My Notes",
            None,
            pdf_path.to_str(),
            &Settings::default(),
        )
        .unwrap();

        let bytes = std::fs::read(&pdf_path).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_run_pdf_rejects_empty_notes() {
        let dir = tempfile::tempdir().unwrap();
        let notes_path = dir.path().join("empty.md");
        std::fs::write(&notes_path, "  \n").unwrap();

        let err = run_pdf(
            notes_path.to_str().unwrap(),
            "Title",
            None,
            None,
            &Settings::default(),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Missing notes or title");
    }
}
