//! HTTP API for the notes generator.
//!
//! Routes:
//! - `GET  /` API information
//! - `POST /generate-notes` notes for a video
//! - `POST /generate-pdf` (alias `/download-pdf`) notes as a PDF download
//! - `GET  /health`, `GET /styles`, `GET /test-youtube?url=`

mod handlers;
pub mod types;

use crate::config::Settings;
use crate::pdf::PdfRenderer;
use crate::pipeline::NotesPipeline;
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::warn;

/// Shared, read-only application state.
pub struct AppState {
    pub pipeline: NotesPipeline,
    pub renderer: PdfRenderer,
    pub settings: Settings,
}

impl AppState {
    /// Build the state with production components.
    pub fn from_settings(settings: Settings) -> crate::Result<Self> {
        let pipeline = NotesPipeline::new(&settings)?;
        Ok(Self::new(pipeline, settings))
    }

    pub fn new(pipeline: NotesPipeline, settings: Settings) -> Self {
        Self {
            renderer: PdfRenderer::new(&settings.pdf),
            pipeline,
            settings,
        }
    }
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.settings.server.allowed_origins);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/styles", get(handlers::styles))
        .route("/generate-notes", post(handlers::generate_notes))
        .route("/generate-pdf", post(handlers::generate_pdf))
        .route("/download-pdf", post(handlers::generate_pdf))
        .route("/test-youtube", get(handlers::test_youtube))
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .fallback(handlers::not_found)
        .layer(cors)
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if allowed_origins.is_empty() || allowed_origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}

#[cfg(test)]
mod tests {
    use super::types::{NotesResponse, StylesResponse};
    use super::*;
    use crate::config::Prompts;
    use crate::notes::NotesGenerator;
    use crate::testing::{
        sample_transcript, FakeLanguageModel, FakeMetadataFetcher, FakeTranscriptFetcher,
    };
    use crate::youtube::VideoMetadata;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use serde_json::Value;
    use tower::ServiceExt;

    struct Fixture {
        transcripts: Arc<FakeTranscriptFetcher>,
        metadata: Arc<FakeMetadataFetcher>,
        model: Arc<FakeLanguageModel>,
        app: Router,
    }

    fn fixture(transcripts: FakeTranscriptFetcher, metadata: FakeMetadataFetcher) -> Fixture {
        let transcripts = Arc::new(transcripts);
        let metadata = Arc::new(metadata);
        let model = Arc::new(FakeLanguageModel::replying("# Notes\n- point"));
        let generator = NotesGenerator::new(model.clone(), Prompts::default(), 8000);
        let pipeline =
            NotesPipeline::with_components(transcripts.clone(), metadata.clone(), generator);
        let app = router(Arc::new(AppState::new(pipeline, Settings::default())));
        Fixture {
            transcripts,
            metadata,
            model,
            app,
        }
    }

    fn default_fixture() -> Fixture {
        fixture(
            FakeTranscriptFetcher::returning(sample_transcript(&["hello", "world"])),
            FakeMetadataFetcher::returning(VideoMetadata {
                title: Some("A Talk".to_string()),
                duration_seconds: Some(95),
                view_count: Some(42),
                video_id: Some("dQw4w9WgXcQ".to_string()),
                ..VideoMetadata::default()
            }),
        )
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    const URL_BODY: &str = r#"{"url": "https://www.youtube.com/watch?v=dQw4w9WgXcQ", "style": "summary"}"#;

    #[tokio::test]
    async fn test_generate_notes() {
        let f = default_fixture();

        let response = f.app.oneshot(post_json("/generate-notes", URL_BODY)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: NotesResponse = serde_json::from_slice(&bytes).unwrap();
        assert!(body.success);
        assert_eq!(body.notes, "# Notes\n- point");
        assert_eq!(body.video_title, "A Talk");
        assert_eq!(body.video_duration, "1:35");
        assert_eq!(body.view_count, "42");
        assert_eq!(f.model.calls(), 1);
        assert!(f.model.prompts()[0].contains("hello world"));
    }

    #[tokio::test]
    async fn test_missing_url_is_bad_request() {
        let f = default_fixture();

        let response = f
            .app
            .oneshot(post_json("/generate-notes", r#"{"style": "summary"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Invalid input: Missing YouTube URL");
        assert_eq!(f.transcripts.calls(), 0);
        assert_eq!(f.metadata.calls(), 0);
        assert_eq!(f.model.calls(), 0);
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let f = default_fixture();

        let response = f
            .app
            .oneshot(post_json("/generate-notes", "{not json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["success"], false);
        assert_eq!(f.transcripts.calls(), 0);
    }

    #[tokio::test]
    async fn test_unknown_style_is_bad_request() {
        let f = default_fixture();

        let response = f
            .app
            .oneshot(post_json(
                "/generate-notes",
                r#"{"url": "dQw4w9WgXcQ", "style": "haiku"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().contains("haiku"));
        assert_eq!(f.transcripts.calls(), 0);
    }

    #[tokio::test]
    async fn test_disabled_captions_never_reach_the_model() {
        let f = fixture(
            FakeTranscriptFetcher::disabled(),
            FakeMetadataFetcher::returning(VideoMetadata::default()),
        );

        let response = f.app.oneshot(post_json("/generate-notes", URL_BODY)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Transcripts are disabled for this video.");
        assert_eq!(f.model.calls(), 0);
    }

    #[tokio::test]
    async fn test_metadata_failure_still_succeeds() {
        let f = fixture(
            FakeTranscriptFetcher::returning(sample_transcript(&["hello"])),
            FakeMetadataFetcher::failing(),
        );

        let response = f.app.oneshot(post_json("/generate-notes", URL_BODY)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["video_title"], "");
        assert_eq!(body["video_author"], "");
        assert_eq!(body["view_count"], "");
        assert_eq!(body["video_id"], "dQw4w9WgXcQ");
    }

    #[tokio::test]
    async fn test_generation_failure_is_server_error() {
        let transcripts = Arc::new(FakeTranscriptFetcher::returning(sample_transcript(&["x"])));
        let model = Arc::new(FakeLanguageModel::failing("upstream 502"));
        let generator = NotesGenerator::new(model, Prompts::default(), 8000);
        let pipeline = NotesPipeline::with_components(
            transcripts,
            Arc::new(FakeMetadataFetcher::failing()),
            generator,
        );
        let app = router(Arc::new(AppState::new(pipeline, Settings::default())));

        let response = app.oneshot(post_json("/generate-notes", URL_BODY)).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Failed to generate notes: upstream 502");
    }

    #[tokio::test]
    async fn test_generate_pdf() {
        for uri in ["/generate-pdf", "/download-pdf"] {
            let f = default_fixture();
            let response = f
                .app
                .oneshot(post_json(
                    uri,
                    r##"{"notes": "# Heading\n- point", "title": "Intro: AI & ML!"}"##,
                ))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(
                response.headers()[header::CONTENT_TYPE],
                "application/pdf"
            );
            assert_eq!(
                response.headers()[header::CONTENT_DISPOSITION],
                "attachment; filename=\"Intro__AI___ML_.pdf\""
            );

            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            assert!(bytes.starts_with(b"%PDF-"));
        }
    }

    #[tokio::test]
    async fn test_generate_pdf_accepts_video_details() {
        let f = default_fixture();
        let body = r#"{
            "notes": "- point",
            "title": "A Talk",
            "youtube_url": "https://youtu.be/dQw4w9WgXcQ",
            "metadata": {"video_author": "Some Channel", "video_duration": "1:35", "view_count": 1234}
        }"#;

        let response = f.app.oneshot(post_json("/generate-pdf", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[tokio::test]
    async fn test_generate_pdf_requires_notes_and_title() {
        let f = default_fixture();

        let response = f
            .app
            .oneshot(post_json("/generate-pdf", r#"{"notes": "", "title": "T"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "Missing notes or title");
    }

    #[tokio::test]
    async fn test_health() {
        let f = default_fixture();
        let response = f.app.oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        assert!(body["timestamp"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_styles() {
        let f = default_fixture();
        let response = f.app.oneshot(get("/styles")).await.unwrap();

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: StylesResponse = serde_json::from_slice(&bytes).unwrap();
        let values: Vec<&str> = body.styles.iter().map(|s| s.value.as_str()).collect();
        assert_eq!(values, vec!["comprehensive", "summary", "detailed", "bullet_points"]);
        assert_eq!(body.styles[3].name, "Bullet Points");
    }

    #[tokio::test]
    async fn test_root() {
        let f = default_fixture();
        let body = json_body(f.app.oneshot(get("/")).await.unwrap()).await;
        assert_eq!(body["endpoints"]["generate_notes"], "/generate-notes");
    }

    #[tokio::test]
    async fn test_wrong_method_is_json_405() {
        let f = default_fixture();
        let response = f.app.oneshot(get("/generate-notes")).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(json_body(response).await["success"], false);
    }

    #[tokio::test]
    async fn test_youtube_transcript() {
        let f = default_fixture();
        let response = f
            .app
            .oneshot(get("/test-youtube?url=dQw4w9WgXcQ"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["transcript"], "hello world");
        assert_eq!(f.model.calls(), 0);
    }

    fn app_with_origins(origins: &[&str]) -> Router {
        let generator = NotesGenerator::new(
            Arc::new(FakeLanguageModel::replying("notes")),
            Prompts::default(),
            8000,
        );
        let pipeline = NotesPipeline::with_components(
            Arc::new(FakeTranscriptFetcher::disabled()),
            Arc::new(FakeMetadataFetcher::failing()),
            generator,
        );
        let mut settings = Settings::default();
        settings.server.allowed_origins = origins.iter().map(|o| o.to_string()).collect();
        router(Arc::new(AppState::new(pipeline, settings)))
    }

    fn get_from(uri: &str, origin: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(header::ORIGIN, origin)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin_by_default() {
        let response = app_with_origins(&["*"])
            .oneshot(get_from("/health", "https://example.com"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn test_cors_echoes_listed_origins_only() {
        // The malformed entry is skipped instead of failing startup.
        let origins = ["https://app.example", "bad\norigin"];

        let response = app_with_origins(&origins)
            .oneshot(get_from("/health", "https://app.example"))
            .await
            .unwrap();
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://app.example"
        );

        let response = app_with_origins(&origins)
            .oneshot(get_from("/health", "https://elsewhere.example"))
            .await
            .unwrap();
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }
}
