//! API-based background removal.
//!
//! Sends the image to the removal service and turns every kind of failure
//! into a [`ProcessingError`] with a displayable message.

use async_trait::async_trait;
use log::{error, info};
use nobg_session::{ProcessedImage, ProcessingError, SourceFile};
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::Deserialize;

use super::client::RemovalClient;
use super::config::ApiConfig;
use super::removebg_client::RemoveBgClient;
use super::service::BackgroundRemover;

/// Content type assumed when the service does not send one
const DEFAULT_RESULT_TYPE: &str = "image/png";

/// Error body returned by the removal service on failure
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<ErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct ErrorEntry {
    title: Option<String>,
}

/// Background removal over HTTP.
pub struct ApiRemover {
    client: Box<dyn RemovalClient>,
    http: reqwest::Client,
}

impl ApiRemover {
    /// Create a new API remover with the given client.
    pub fn new(client: Box<dyn RemovalClient>) -> Self {
        Self {
            client,
            http: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: ApiConfig) -> Self {
        Self::new(Box::new(RemoveBgClient::new(
            config.api_key,
            config.endpoint,
        )))
    }
}

#[async_trait]
impl BackgroundRemover for ApiRemover {
    async fn remove_background(
        &self,
        file: &SourceFile,
    ) -> Result<ProcessedImage, ProcessingError> {
        let form = self.client.build_form(file)?;

        let request = self.http.post(self.client.removal_url());
        let request = self.client.add_auth(request);

        let response = request.multipart(form).send().await.map_err(|e| {
            error!("Removal request error: {}", e);
            ProcessingError::remote(e.to_string())
        })?;

        // Check response status
        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let detail = remote_error_detail(status, &body);
            error!("Removal API error response ({}): {}", status, detail);
            return Err(ProcessingError::remote(detail));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or(DEFAULT_RESULT_TYPE)
            .to_string();

        let bytes = response.bytes().await.map_err(|e| {
            error!("Failed to read removal response: {}", e);
            ProcessingError::remote(e.to_string())
        })?;

        info!(
            "Removal successful for {}: {} bytes of {}",
            file.name,
            bytes.len(),
            content_type
        );

        Ok(ProcessedImage {
            bytes,
            content_type,
        })
    }
}

/// Message for a non-success response: the first error title in the body,
/// else `Error: {status} {reason}`.
pub fn remote_error_detail(status: StatusCode, body: &[u8]) -> String {
    let title = serde_json::from_slice::<ErrorBody>(body)
        .unwrap_or_default()
        .errors
        .into_iter()
        .next()
        .and_then(|entry| entry.title)
        .filter(|title| !title.is_empty());

    match title {
        Some(title) => title,
        None => format!(
            "Error: {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or_default()
        )
        .trim_end()
        .to_string(),
    }
}
