//! Pre-flight checks before starting work that needs external services.
//!
//! Validates configuration up front so a command fails before any network
//! request rather than midway through.

use crate::config::Settings;
use crate::error::{NotesError, Result};
use std::process::Command;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// The server needs the model API key.
    Serve,
    /// Note generation needs the model API key.
    Notes,
    /// Transcript fetching talks only to YouTube and needs a usable timeout.
    Transcript,
}

/// Run pre-flight checks for the given operation.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Serve | Operation::Notes => {
            settings.api_key()?;
            check_youtube(settings)
        }
        Operation::Transcript => check_youtube(settings),
    }
}

fn check_youtube(settings: &Settings) -> Result<()> {
    if settings.youtube.request_timeout_secs == 0 {
        return Err(NotesError::Config(
            "youtube.request_timeout_secs must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

/// Check that an external tool runs. Returns its first line of version output.
pub fn check_tool(program: &str) -> Result<String> {
    match Command::new(program).arg("--version").output() {
        Ok(output) if output.status.success() => Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .next()
            .unwrap_or("installed")
            .trim()
            .to_string()),
        Ok(_) => Err(NotesError::ToolNotFound(format!(
            "{} is installed but not working correctly",
            program
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(NotesError::ToolNotFound(program.to_string()))
        }
        Err(e) => Err(NotesError::ToolNotFound(format!("{}: {}", program, e))),
    }
}
