//! Doctor command - verify system requirements and configuration.

use crate::cli::preflight::check_tool;
use crate::cli::Output;
use crate::config::{Prompts, Settings};
use console::style;
use std::path::Path;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks. `config_path` is the `--config` override, if
/// any.
pub fn run_doctor(settings: &Settings, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config_path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(Settings::default_config_path);

    Output::header("ytnotes doctor");
    println!();
    println!("Checking system requirements and configuration...\n");

    let sections = [
        ("External Tools", vec![check_ytdlp(settings)]),
        (
            "Language Model",
            vec![
                check_api_key(settings),
                CheckResult::ok("Model", &settings.llm.model),
                CheckResult::ok("Endpoint", &settings.llm.api_base),
            ],
        ),
        (
            "Configuration",
            vec![check_config_file(&config_path), check_prompts(settings)],
        ),
    ];

    let mut checks = Vec::new();
    for (title, results) in sections {
        println!("{}", style(title).bold());
        for check in &results {
            check.print();
        }
        println!();
        checks.extend(results);
    }

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before generating notes.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! ytnotes is ready to use.");
    }

    Ok(())
}

/// yt-dlp only supplies metadata, so a missing binary is a warning.
fn check_ytdlp(settings: &Settings) -> CheckResult {
    match check_tool(&settings.youtube.ytdlp_path) {
        Ok(version) => CheckResult::ok("yt-dlp", &truncate(&version, 50)),
        Err(e) => CheckResult::warning(
            "yt-dlp",
            &format!("{} (video metadata will be empty)", e),
            install_hint_ytdlp(),
        ),
    }
}

fn check_api_key(settings: &Settings) -> CheckResult {
    let name = settings.llm.api_key_env.as_str();
    match settings.api_key() {
        Ok(key) => CheckResult::ok(name, &format!("configured ({})", mask_key(&key))),
        Err(e) => CheckResult::error(
            name,
            &e.to_string(),
            &format!("Set with: export {}='sk-or-...'", name),
        ),
    }
}

fn check_config_file(config_path: &Path) -> CheckResult {
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            &format!("{} not found, using defaults", config_path.display()),
            "Create with: ytnotes config init",
        )
    }
}

fn check_prompts(settings: &Settings) -> CheckResult {
    match Prompts::load(
        settings.prompts.custom_dir.as_deref(),
        Some(&settings.prompts.variables),
    ) {
        Ok(_) if settings.prompts.custom_dir.is_some() => {
            CheckResult::ok("Prompts", "custom prompts loaded")
        }
        Ok(_) => CheckResult::ok("Prompts", "built-in"),
        Err(e) => CheckResult::error(
            "Prompts",
            &e.to_string(),
            "Check notes.toml in prompts.custom_dir",
        ),
    }
}

/// Show the first and last few characters of a key.
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 12 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..7].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// Platform-specific install hint for yt-dlp.
fn install_hint_ytdlp() -> &'static str {
    if cfg!(target_os = "macos") {
        "Install with: brew install yt-dlp"
    } else if cfg!(target_os = "linux") {
        "Install with: pip install yt-dlp (or your package manager)"
    } else {
        "Install from: https://github.com/yt-dlp/yt-dlp"
    }
}
