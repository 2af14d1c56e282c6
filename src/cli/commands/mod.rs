//! CLI command implementations.

mod config;
mod doctor;
mod notes;
mod pdf;
mod serve;
mod styles;
mod transcript;

pub use config::run_config;
pub use doctor::run_doctor;
pub use notes::run_notes;
pub use pdf::run_pdf;
pub use serve::run_serve;
pub use styles::run_styles;
pub use transcript::run_transcript;
