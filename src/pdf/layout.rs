//! Line-based layout of markdown-ish notes.

use super::{NotesDocument, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};

const PT_TO_MM: f32 = 0.352_778;
/// Average Helvetica glyph width as a fraction of the font size.
const AVG_GLYPH_WIDTH: f32 = 0.5;
const LINE_SPACING: f32 = 1.4;

const TITLE_SIZE: f32 = 20.0;
const SOURCE_SIZE: f32 = 10.0;
const HEADING1_SIZE: f32 = 16.0;
const HEADING2_SIZE: f32 = 14.0;
const BODY_SIZE: f32 = 12.0;
const BULLET_INDENT_PT: f32 = 20.0;

/// How a line of notes is typeset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Title,
    Source,
    Heading1,
    Heading2,
    Bullet,
    Paragraph,
    Blank,
}

impl LineKind {
    fn font_size(&self) -> f32 {
        match self {
            LineKind::Title => TITLE_SIZE,
            LineKind::Source => SOURCE_SIZE,
            LineKind::Heading1 => HEADING1_SIZE,
            LineKind::Heading2 => HEADING2_SIZE,
            LineKind::Bullet | LineKind::Paragraph | LineKind::Blank => BODY_SIZE,
        }
    }

    fn underlined(&self) -> bool {
        matches!(self, LineKind::Title | LineKind::Heading1 | LineKind::Heading2)
    }

    fn indent_mm(&self) -> f32 {
        match self {
            LineKind::Bullet => BULLET_INDENT_PT * PT_TO_MM,
            _ => 0.0,
        }
    }

    fn centered(&self) -> bool {
        matches!(self, LineKind::Title | LineKind::Source)
    }
}

/// A run of text at a fixed position. Coordinates are from the bottom-left
/// corner of the page; `y_mm` is the baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub kind: LineKind,
    pub text: String,
    pub font_size: f32,
    pub x_mm: f32,
    pub y_mm: f32,
    /// Estimated rendered width.
    pub width_mm: f32,
    pub underline: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub lines: Vec<PlacedLine>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub pages: Vec<Page>,
}

/// Classify a line of notes and strip its heading marker.
///
/// Bullet lines keep their marker; they are only indented.
pub fn classify_line(line: &str) -> (LineKind, &str) {
    if line.trim().is_empty() {
        (LineKind::Blank, "")
    } else if let Some(rest) = line.strip_prefix("# ") {
        (LineKind::Heading1, rest)
    } else if let Some(rest) = line.strip_prefix("## ") {
        (LineKind::Heading2, rest)
    } else if line.starts_with("- ") || line.starts_with("* ") || line.starts_with("• ") {
        (LineKind::Bullet, line)
    } else {
        (LineKind::Paragraph, line)
    }
}

/// Replace characters the builtin fonts cannot show with ASCII equivalents,
/// dropping the rest.
pub(crate) fn to_printable(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '•' | '·' | '–' | '—' | '−' => out.push('-'),
            '‘' | '’' | '′' => out.push('\''),
            '“' | '”' | '″' => out.push('"'),
            '…' => out.push_str("..."),
            '\t' | '\u{a0}' => out.push(' '),
            c if c.is_ascii() && !c.is_ascii_control() => out.push(c),
            _ => {}
        }
    }
    out
}

fn line_height_mm(font_size: f32) -> f32 {
    font_size * LINE_SPACING * PT_TO_MM
}

fn text_width_mm(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * AVG_GLYPH_WIDTH * PT_TO_MM
}

/// Greedy word wrap by estimated width. Words wider than a whole line are
/// split.
fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word = word.to_string();
        while word.chars().count() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let split_at = word
                .char_indices()
                .nth(max_chars)
                .map(|(i, _)| i)
                .unwrap_or(word.len());
            let rest = word.split_off(split_at);
            lines.push(word);
            word = rest;
        }

        if word.is_empty() {
            continue;
        }

        let needed = current.chars().count() + usize::from(!current.is_empty()) + word.chars().count();
        if !current.is_empty() && needed > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

struct Cursor {
    margin: f32,
    y: f32,
    pages: Vec<Page>,
}

impl Cursor {
    fn new(margin: f32) -> Self {
        Self {
            margin,
            y: PAGE_HEIGHT_MM - margin,
            pages: vec![Page::default()],
        }
    }

    fn content_width(&self) -> f32 {
        PAGE_WIDTH_MM - 2.0 * self.margin
    }

    fn skip(&mut self, height: f32) {
        self.y -= height;
    }

    fn place(&mut self, kind: LineKind, text: &str) {
        let font_size = kind.font_size();
        let indent = kind.indent_mm();
        let char_width = font_size * AVG_GLYPH_WIDTH * PT_TO_MM;
        let max_chars = ((self.content_width() - indent) / char_width).floor() as usize;

        for piece in wrap(text, max_chars) {
            let height = line_height_mm(font_size);
            if self.y - height < self.margin {
                self.pages.push(Page::default());
                self.y = PAGE_HEIGHT_MM - self.margin;
            }
            self.y -= height;

            let width_mm = text_width_mm(&piece, font_size);
            let x_mm = if kind.centered() {
                ((PAGE_WIDTH_MM - width_mm) / 2.0).max(self.margin)
            } else {
                self.margin + indent
            };

            if let Some(page) = self.pages.last_mut() {
                page.lines.push(PlacedLine {
                    kind,
                    text: piece,
                    font_size,
                    x_mm,
                    y_mm: self.y,
                    width_mm,
                    underline: kind.underlined(),
                });
            }
        }
    }
}

/// Lay out a notes document on A4 pages.
pub(crate) fn layout(document: &NotesDocument<'_>, margin_mm: f32) -> Layout {
    let mut cursor = Cursor::new(margin_mm);

    cursor.place(LineKind::Title, &to_printable(document.title));
    if let Some(url) = document.source_url.filter(|u| !u.trim().is_empty()) {
        cursor.place(LineKind::Source, &format!("Source: {}", to_printable(url)));
    }
    if let Some(details) = document.details {
        for (label, value) in details.rows() {
            cursor.place(LineKind::Source, &format!("{}: {}", label, to_printable(&value)));
        }
    }
    cursor.skip(line_height_mm(BODY_SIZE));

    for raw in document.notes.lines() {
        let (kind, text) = classify_line(raw.trim_end());
        match kind {
            LineKind::Blank => cursor.skip(line_height_mm(BODY_SIZE) / 2.0),
            _ => cursor.place(kind, &to_printable(text)),
        }
    }

    Layout {
        pages: cursor.pages,
    }
}
