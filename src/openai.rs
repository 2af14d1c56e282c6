//! OpenAI-compatible client configuration for the hosted model provider.

use crate::config::LlmSettings;
use crate::error::{NotesError, Result};
use async_openai::{config::OpenAIConfig, Client};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;

/// Create a client for the configured provider.
///
/// The HTTP client carries the request timeout and the attribution headers
/// OpenRouter expects. The library's retry backoff is disabled so a failed
/// call surfaces immediately.
pub fn create_client(settings: &LlmSettings, api_key: &str) -> Result<Client<OpenAIConfig>> {
    let mut headers = HeaderMap::new();
    insert_header(&mut headers, "http-referer", &settings.referer)?;
    insert_header(&mut headers, "x-title", &settings.app_title)?;

    let http_client = reqwest::Client::builder()
        .timeout(settings.timeout())
        .default_headers(headers)
        .build()?;

    let config = OpenAIConfig::new()
        .with_api_base(settings.api_base.trim_end_matches('/'))
        .with_api_key(api_key);

    Ok(Client::with_config(config)
        .with_http_client(http_client)
        .with_backoff(no_retry_backoff()))
}

fn insert_header(headers: &mut HeaderMap, name: &'static str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Ok(());
    }
    let value = HeaderValue::from_str(value)
        .map_err(|e| NotesError::Config(format!("Invalid {} header value: {}", name, e)))?;
    headers.insert(HeaderName::from_static(name), value);
    Ok(())
}

fn no_retry_backoff() -> backoff::ExponentialBackoff {
    backoff::ExponentialBackoffBuilder::new()
        .with_max_elapsed_time(Some(Duration::ZERO))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_client() {
        assert!(create_client(&LlmSettings::default(), "sk-or-test").is_ok());
    }

    #[test]
    fn test_invalid_header_is_config_error() {
        let settings = LlmSettings {
            app_title: "bad\nvalue".to_string(),
            ..LlmSettings::default()
        };
        let err = create_client(&settings, "sk-or-test").unwrap_err();
        assert!(matches!(err, NotesError::Config(_)));
    }
}
