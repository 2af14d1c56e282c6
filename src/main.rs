//! ytnotes CLI entry point.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use ytnotes::cli::{commands, Cli, Commands};
use ytnotes::config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first so the log level can come from it
    let config_path = cli.config.as_deref().map(Settings::expand_path);
    let settings = Settings::load_from(config_path.as_ref())?;

    let log_level = match cli.verbose {
        0 => settings.general.log_level.clone(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("ytnotes={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match &cli.command {
        Commands::Serve { host, port } => {
            commands::run_serve(host.clone(), *port, settings).await?;
        }

        Commands::Notes {
            url,
            style,
            output,
            pdf,
        } => {
            commands::run_notes(
                url,
                style.as_deref(),
                output.as_deref(),
                pdf.as_deref(),
                settings,
            )
            .await?;
        }

        Commands::Transcript { url } => {
            commands::run_transcript(url, settings).await?;
        }

        Commands::Pdf {
            file,
            title,
            url,
            output,
        } => {
            commands::run_pdf(file, title, url.as_deref(), output.as_deref(), &settings)?;
        }

        Commands::Styles => {
            commands::run_styles(&settings);
        }

        Commands::Doctor => {
            commands::run_doctor(&settings, config_path.as_deref())?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings, config_path)?;
        }
    }

    Ok(())
}
