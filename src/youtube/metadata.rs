//! Video metadata via yt-dlp.

use super::{extract_video_id, watch_url, MetadataFetcher, VideoMetadata};
use crate::config::YoutubeSettings;
use crate::error::{NotesError, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

/// Descriptions longer than this are cut and suffixed with `...`.
const MAX_DESCRIPTION_CHARS: usize = 200;

/// Metadata fetcher that shells out to `yt-dlp --dump-json`.
pub struct YtDlpMetadataFetcher {
    binary: String,
    timeout: Duration,
}

impl YtDlpMetadataFetcher {
    pub fn new(settings: &YoutubeSettings) -> Self {
        Self {
            binary: settings.ytdlp_path.clone(),
            timeout: settings.metadata_timeout(),
        }
    }

    async fn dump_json(&self, url: &str) -> Result<serde_json::Value> {
        let mut command = tokio::process::Command::new(&self.binary);
        command
            .args(["--dump-json", "--no-download", "--no-warnings", url])
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| {
                NotesError::MetadataUnavailable(format!(
                    "yt-dlp timed out after {}s",
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    NotesError::ToolNotFound(self.binary.clone())
                } else {
                    NotesError::MetadataUnavailable(format!("Failed to run yt-dlp: {}", e))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(NotesError::MetadataUnavailable(format!(
                "yt-dlp failed: {}",
                stderr.trim()
            )));
        }

        let json_str = String::from_utf8_lossy(&output.stdout);
        serde_json::from_str(&json_str).map_err(|e| {
            NotesError::MetadataUnavailable(format!("Failed to parse yt-dlp output: {}", e))
        })
    }
}

#[async_trait]
impl MetadataFetcher for YtDlpMetadataFetcher {
    #[instrument(skip(self))]
    async fn fetch_metadata(&self, url: &str) -> Result<VideoMetadata> {
        let video_id = extract_video_id(url).ok_or_else(|| {
            NotesError::InvalidInput(format!("Invalid YouTube video ID or URL: {}", url))
        })?;

        let json = self.dump_json(&watch_url(&video_id)).await?;
        let metadata = parse_metadata(&json);
        debug!("Metadata for {}: {:?}", video_id, metadata.title);

        Ok(metadata)
    }
}

/// Map yt-dlp's JSON dump onto our metadata record.
fn parse_metadata(json: &serde_json::Value) -> VideoMetadata {
    let author = json["channel"]
        .as_str()
        .or_else(|| json["uploader"].as_str())
        .map(|s| s.to_string());

    // yt-dlp returns date as YYYYMMDD
    let publish_date = json["upload_date"].as_str().and_then(|date_str| {
        chrono::NaiveDate::parse_from_str(date_str, "%Y%m%d")
            .ok()
            .map(|d| d.format("%Y-%m-%d").to_string())
    });

    let description = json["description"].as_str().map(truncate_description);

    VideoMetadata {
        title: json["title"].as_str().map(|s| s.to_string()),
        author,
        duration_seconds: json["duration"].as_f64().map(|d| d as u32),
        publish_date,
        view_count: json["view_count"].as_u64(),
        description,
        video_id: json["id"].as_str().map(|s| s.to_string()),
    }
}

fn truncate_description(description: &str) -> String {
    match description.char_indices().nth(MAX_DESCRIPTION_CHARS) {
        Some((idx, _)) => format!("{}...", &description[..idx]),
        None => description.to_string(),
    }
}
