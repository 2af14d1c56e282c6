//! HTTP API server for the web frontend.

use crate::api::{router, AppState};
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use std::sync::Arc;
use tracing::info;

/// Run the HTTP API server.
pub async fn run_serve(
    host: Option<String>,
    port: Option<u16>,
    mut settings: Settings,
) -> anyhow::Result<()> {
    if let Err(e) = preflight::check(Operation::Serve, &settings) {
        Output::error(&e.to_string());
        Output::info("Run 'ytnotes doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    if let Some(host) = host {
        settings.server.host = host;
    }
    if let Some(port) = port {
        settings.server.port = port;
    }

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let state = Arc::new(AppState::from_settings(settings)?);
    let app = router(state.clone());

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    Output::header("YouTube Notes Generator API");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    Output::kv("Model", &state.settings.llm.model);
    Output::kv(
        "CORS origins",
        &state.settings.server.allowed_origins.join(", "),
    );
    println!();
    println!("Endpoints:");
    Output::kv("Info", "GET  /");
    Output::kv("Health", "GET  /health");
    Output::kv("Styles", "GET  /styles");
    Output::kv("Generate notes", "POST /generate-notes");
    Output::kv("Generate PDF", "POST /generate-pdf");
    Output::kv("Download PDF", "POST /download-pdf");
    Output::kv("Transcript check", "GET  /test-youtube?url=...");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}
