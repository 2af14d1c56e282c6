//! Prompt templates for ytnotes.
//!
//! Prompts can be customized by placing a `notes.toml` file in the custom
//! prompts directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([A-Za-z0-9_]+)\s*\}\}").expect("Invalid regex"));

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub notes: NotesPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// Prompts for note generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotesPrompts {
    /// Main template. Receives `style`, `transcript`, `language_note` and
    /// `guidance`.
    pub template: String,
    /// Appended when the captions are not in English. Receives `language`.
    pub language_note: String,
    /// Per-style formatting instructions.
    pub guidance: StyleGuidance,
}

impl Default for NotesPrompts {
    fn default() -> Self {
        Self {
            template: r#"You are an expert note-taker and educator. Generate {{style}} study notes from this YouTube video transcript.{{language_note}}

Transcript:
{{transcript}}

{{guidance}}"#
                .to_string(),

            language_note: "\n\nIMPORTANT: The transcript is in {{language}}. Understand it, then write the notes in clear, fluent English only."
                .to_string(),

            guidance: StyleGuidance::default(),
        }
    }
}

/// Formatting instructions for each note style.
///
/// None of these may mention a style value, so that the rendered prompt names
/// the requested style once.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleGuidance {
    pub comprehensive: String,
    pub summary: String,
    pub detailed: String,
    pub bullet_points: String,
}

const FORMATTING_RULES: &str = r###"Formatting rules:
- Use "# " for the main heading and "## " for section headings
- Start list items with "- "
- Keep each line self-contained; do not nest lists
- Write everything in English"###;

impl Default for StyleGuidance {
    fn default() -> Self {
        Self {
            comprehensive: format!(
                r#"Cover the whole video with these sections:

# Overview
- Brief introduction to the main topic and its context

## Key Concepts
- Main ideas, core principles and important definitions

## Explanations
- Breakdown of each topic with the examples mentioned

## Practical Applications
- How to apply the knowledge, with concrete use cases

## Key Takeaways
- The most important points to remember

{FORMATTING_RULES}"#
            ),

            summary: format!(
                r#"Keep it short and focused:

# Main Topic
- What the video is about in one or two sentences

## Key Points
- The three to five most important takeaways, one line each

## In Brief
- Two or three sentences capturing the overall message and conclusion

{FORMATTING_RULES}"#
            ),

            detailed: format!(
                r###"Go deep and leave nothing important out:

# Introduction and Context
- Background, purpose of the video and intended audience

## Main Content
- One "## " section per topic, with explanations and examples

## Examples and Case Studies
- Every concrete example or scenario discussed

## Technical Details
- Definitions, formulas, requirements and step-by-step processes

## Common Mistakes
- What to avoid and why

## Conclusion
- Recap of all major points and suggested next steps

{FORMATTING_RULES}"###
            ),

            bullet_points: format!(
                r#"Write scannable, list-only notes:

# Main Topics
- One line per topic with a short description

## Key Concepts
- Concept: definition and explanation

## Important Facts
- One fact per line

## Examples
- One example per line

## Takeaways
- One takeaway per line

{FORMATTING_RULES}"#
            ),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let notes_path = custom_path.join("notes.toml");
            if notes_path.exists() {
                let content = std::fs::read_to_string(&notes_path)?;
                prompts.notes = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    ///
    /// Substitution is a single pass over the template: text inserted for one
    /// placeholder is never scanned for further placeholders. Unknown
    /// placeholders are left untouched.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        PLACEHOLDER
            .replace_all(template, |caps: &Captures| match vars.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}
