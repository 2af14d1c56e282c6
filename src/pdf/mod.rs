//! PDF rendering of generated notes.
//!
//! Rendering happens in two steps: [`PdfRenderer::layout`] places every line
//! on a page (pure and deterministic), then [`PdfRenderer::render`] draws the
//! layout with `printpdf` into an in-memory buffer.

mod layout;

pub use layout::{classify_line, Layout, LineKind, Page, PlacedLine};

use crate::config::PdfSettings;
use crate::error::{NotesError, Result};
use crate::youtube::VideoMetadata;
use printpdf::lopdf::{Object, StringFormat};
use printpdf::{BuiltinFont, Line, Mm, PdfDocument, Point};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use tracing::{debug, instrument};

/// A4 portrait.
pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;

/// Distance of the underline below the text baseline.
const UNDERLINE_OFFSET_MM: f32 = 1.2;
const UNDERLINE_THICKNESS_PT: f32 = 0.6;

/// Notes to render.
#[derive(Debug, Clone, Copy)]
pub struct NotesDocument<'a> {
    pub title: &'a str,
    pub notes: &'a str,
    /// Video the notes came from, printed under the title.
    pub source_url: Option<&'a str>,
    /// Video details printed under the source line.
    pub details: Option<&'a VideoDetails>,
}

/// Descriptive lines shown under the title. Empty values are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VideoDetails {
    #[serde(default)]
    pub video_author: Option<String>,
    #[serde(default)]
    pub video_duration: Option<String>,
    #[serde(default)]
    pub publish_date: Option<String>,
    /// Accepts a number or a numeric string.
    #[serde(default, deserialize_with = "string_or_number")]
    pub view_count: Option<String>,
}

impl VideoDetails {
    /// Label and value pairs in display order.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        let present = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let mut rows = Vec::new();
        if let Some(author) = present(&self.video_author) {
            rows.push(("Author", author));
        }
        if let Some(duration) = present(&self.video_duration) {
            rows.push(("Duration", duration));
        }
        if let Some(date) = present(&self.publish_date) {
            rows.push(("Published", date));
        }
        if let Some(views) = present(&self.view_count) {
            rows.push(("Views", group_thousands(&views)));
        }
        rows
    }
}

impl From<&VideoMetadata> for VideoDetails {
    fn from(metadata: &VideoMetadata) -> Self {
        Self {
            video_author: metadata.author.clone(),
            video_duration: metadata.formatted_duration(),
            publish_date: metadata.publish_date.clone(),
            view_count: metadata.view_count.map(|v| v.to_string()),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        match Option::<serde_json::Value>::deserialize(deserializer)? {
            Some(serde_json::Value::String(s)) => Some(s),
            Some(serde_json::Value::Number(n)) => Some(n.to_string()),
            _ => None,
        },
    )
}

/// `1234567` becomes `1,234,567`; anything that is not a plain integer is
/// returned unchanged.
fn group_thousands(value: &str) -> String {
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
        return value.to_string();
    }
    let digits: Vec<char> = value.chars().collect();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(*c);
    }
    out
}

/// Lays out and renders notes as PDF.
#[derive(Debug, Clone)]
pub struct PdfRenderer {
    margin_mm: f32,
}

impl PdfRenderer {
    pub fn new(settings: &PdfSettings) -> Self {
        Self {
            margin_mm: settings.margin_mm,
        }
    }

    /// Place every line of the document on pages.
    pub fn layout(&self, document: &NotesDocument<'_>) -> Layout {
        layout::layout(document, self.margin_mm)
    }

    /// Render the document to PDF bytes.
    #[instrument(skip(self, document), fields(title = %document.title))]
    pub fn render(&self, document: &NotesDocument<'_>) -> Result<Vec<u8>> {
        let layout = self.layout(document);
        debug!("Rendering {} page(s)", layout.pages.len());

        let document_id = document_id(document);
        let (doc, first_page, first_layer) = PdfDocument::new(
            layout::to_printable(document.title),
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "Notes",
        );
        let doc = doc.with_document_id(document_id.clone());
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| NotesError::Render(e.to_string()))?;

        let mut targets = vec![(first_page, first_layer)];
        for _ in 1..layout.pages.len() {
            targets.push(doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Notes"));
        }

        for ((page_index, layer_index), page) in targets.into_iter().zip(&layout.pages) {
            let layer = doc.get_page(page_index).get_layer(layer_index);
            layer.set_outline_thickness(UNDERLINE_THICKNESS_PT);

            for line in &page.lines {
                layer.use_text(
                    line.text.clone(),
                    line.font_size,
                    Mm(line.x_mm),
                    Mm(line.y_mm),
                    &font,
                );

                if line.underline {
                    let y = line.y_mm - UNDERLINE_OFFSET_MM;
                    layer.add_line(Line {
                        points: vec![
                            (Point::new(Mm(line.x_mm), Mm(y)), false),
                            (Point::new(Mm(line.x_mm + line.width_mm), Mm(y)), false),
                        ],
                        is_closed: false,
                    });
                }
            }
        }

        let bytes = doc
            .save_to_bytes()
            .map_err(|e| NotesError::Render(e.to_string()))?;
        pin_trailer_id(&bytes, &document_id)
    }
}

/// Stable 32-character identifier derived from the document content.
fn document_id(document: &NotesDocument<'_>) -> String {
    let digest = |salt: &str| {
        let mut hasher = DefaultHasher::new();
        salt.hash(&mut hasher);
        document.title.hash(&mut hasher);
        document.notes.hash(&mut hasher);
        document.source_url.hash(&mut hasher);
        document.details.hash(&mut hasher);
        hasher.finish()
    };
    format!("{:016X}{:016X}", digest("document"), digest("instance"))
}

/// printpdf fills the second trailer `/ID` entry with a random string; replace
/// both entries so identical input gives identical bytes.
fn pin_trailer_id(bytes: &[u8], document_id: &str) -> Result<Vec<u8>> {
    let mut pdf = printpdf::lopdf::Document::load_mem(bytes)
        .map_err(|e| NotesError::Render(e.to_string()))?;
    let id = Object::String(document_id.as_bytes().to_vec(), StringFormat::Literal);
    pdf.trailer.set("ID", Object::Array(vec![id.clone(), id]));

    let mut out = Vec::new();
    pdf.save_to(&mut out)
        .map_err(|e| NotesError::Render(e.to_string()))?;
    Ok(out)
}

impl Default for PdfRenderer {
    fn default() -> Self {
        Self::new(&PdfSettings::default())
    }
}

/// Download filename for a title: every character outside `[A-Za-z0-9]`
/// becomes `_`.
pub fn download_filename(title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{}.pdf", stem)
}
