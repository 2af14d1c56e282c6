//! Configuration settings for ytnotes.

use crate::error::{NotesError, Result};
use crate::notes::NoteStyle;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub llm: LlmSettings,
    pub notes: NotesSettings,
    pub youtube: YoutubeSettings,
    pub pdf: PdfSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
    /// Origins allowed by CORS. `*` allows any origin.
    pub allowed_origins: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            allowed_origins: vec!["*".to_string()],
        }
    }
}

/// Hosted language model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Base URL of the OpenAI-compatible API.
    pub api_base: String,
    /// Model identifier.
    pub model: String,
    /// API key. Prefer the environment variable named by `api_key_env`.
    pub api_key: Option<String>,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    /// Timeout for a single completion request, in seconds.
    pub timeout_secs: u64,
    /// Sent as `HTTP-Referer` for provider attribution.
    pub referer: String,
    /// Sent as `X-Title` for provider attribution.
    pub app_title: String,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_base: "https://openrouter.ai/api/v1".to_string(),
            model: "mistralai/mistral-small-3.2-24b-instruct:free".to_string(),
            api_key: None,
            api_key_env: "OPENROUTER_API_KEY".to_string(),
            max_tokens: 2000,
            temperature: 0.7,
            top_p: 0.9,
            timeout_secs: 60,
            referer: "https://youtube-notes-generator.com".to_string(),
            app_title: "YouTube Notes Generator".to_string(),
        }
    }
}

impl LlmSettings {
    /// Completion request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Note generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotesSettings {
    /// Transcripts longer than this many characters are truncated before
    /// being sent to the model.
    pub max_transcript_chars: usize,
    /// Style used when a request does not name one.
    pub default_style: NoteStyle,
}

impl Default for NotesSettings {
    fn default() -> Self {
        Self {
            max_transcript_chars: 8000,
            default_style: NoteStyle::Comprehensive,
        }
    }
}

/// YouTube access settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YoutubeSettings {
    /// Caption languages to prefer, in order. Falls back to the first track.
    pub preferred_languages: Vec<String>,
    /// Timeout for each request to YouTube, in seconds.
    pub request_timeout_secs: u64,
    /// Timeout for the metadata lookup, in seconds.
    pub metadata_timeout_secs: u64,
    /// Path or name of the yt-dlp binary.
    pub ytdlp_path: String,
}

impl Default for YoutubeSettings {
    fn default() -> Self {
        Self {
            preferred_languages: ["en", "en-US", "en-GB", "en-CA", "en-AU"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            request_timeout_secs: 30,
            metadata_timeout_secs: 30,
            ytdlp_path: "yt-dlp".to_string(),
        }
    }
}

impl YoutubeSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn metadata_timeout(&self) -> Duration {
        Duration::from_secs(self.metadata_timeout_secs)
    }
}

/// PDF layout settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfSettings {
    /// Page margin on every side, in millimetres.
    pub margin_mm: f32,
}

impl Default for PdfSettings {
    fn default() -> Self {
        Self { margin_mm: 25.4 }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| NotesError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ytnotes")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Resolve the LLM API key from the config file or the environment.
    ///
    /// A missing key is a configuration error, reported before any request
    /// reaches the provider.
    pub fn api_key(&self) -> Result<String> {
        if let Some(key) = self.llm.api_key.as_ref().filter(|k| !k.trim().is_empty()) {
            return Ok(key.trim().to_string());
        }

        match std::env::var(&self.llm.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
            Ok(_) => Err(NotesError::Config(format!(
                "{} is empty. Set it with: export {}='sk-or-...'",
                self.llm.api_key_env, self.llm.api_key_env
            ))),
            Err(_) => Err(NotesError::Config(format!(
                "{} not set. Set it with: export {}='sk-or-...'",
                self.llm.api_key_env, self.llm.api_key_env
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.notes.max_transcript_chars, 8000);
        assert_eq!(settings.notes.default_style, NoteStyle::Comprehensive);
        assert_eq!(settings.llm.max_tokens, 2000);
        assert_eq!(settings.server.allowed_origins, vec!["*".to_string()]);
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[llm]
model = "some/other-model"

[notes]
default_style = "bullet_points"
"#,
        )
        .unwrap();

        let settings = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(settings.llm.model, "some/other-model");
        assert_eq!(settings.llm.timeout_secs, 60);
        assert_eq!(settings.notes.default_style, NoteStyle::BulletPoints);
        assert_eq!(settings.server.port, 8000);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let settings = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(settings.youtube.ytdlp_path, "yt-dlp");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut settings = Settings::default();
        settings.server.port = 9123;
        settings.save_to(&path).unwrap();

        let reloaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(reloaded.server.port, 9123);
    }

    #[test]
    fn test_api_key_from_config() {
        let mut settings = Settings::default();
        settings.llm.api_key = Some("  sk-or-test  ".to_string());
        assert_eq!(settings.api_key().unwrap(), "sk-or-test");
    }

    #[test]
    fn test_api_key_missing_is_config_error() {
        let mut settings = Settings::default();
        settings.llm.api_key_env = "YTNOTES_TEST_KEY_THAT_IS_NEVER_SET".to_string();
        let err = settings.api_key().unwrap_err();
        assert!(matches!(err, NotesError::Config(_)));
        assert!(err.to_string().contains("YTNOTES_TEST_KEY_THAT_IS_NEVER_SET"));
    }
}
