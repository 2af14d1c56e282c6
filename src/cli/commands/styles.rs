//! Styles command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::notes::NoteStyle;

/// List the note styles.
pub fn run_styles(settings: &Settings) {
    Output::header("Note styles");
    for style in NoteStyle::ALL {
        let marker = if style == settings.notes.default_style {
            " (default)"
        } else {
            ""
        };
        Output::list_item(&format!(
            "{} - {}{}",
            style.as_str(),
            style.display_name(),
            marker
        ));
    }
}
