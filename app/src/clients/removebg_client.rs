use nobg_session::{ProcessingError, SourceFile};
use secrecy::{ExposeSecret, SecretString};

use super::client::RemovalClient;

pub const REMOVE_BG_URL: &str = "https://api.remove.bg/v1.0/removebg";
const API_KEY_HEADER: &str = "X-Api-Key";
const OUTPUT_SIZE: &str = "auto";

/// remove.bg API client
pub struct RemoveBgClient {
    api_key: SecretString,
    endpoint: String,
}

impl RemoveBgClient {
    pub fn new(api_key: SecretString, endpoint: Option<String>) -> Self {
        Self {
            api_key,
            endpoint: endpoint.unwrap_or_else(|| REMOVE_BG_URL.to_string()),
        }
    }
}

impl RemovalClient for RemoveBgClient {
    fn removal_url(&self) -> String {
        self.endpoint.clone()
    }

    fn add_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.header(API_KEY_HEADER, self.api_key.expose_secret())
    }

    fn build_form(&self, file: &SourceFile) -> Result<reqwest::multipart::Form, ProcessingError> {
        let image_part = reqwest::multipart::Part::bytes(file.bytes.to_vec())
            .file_name(file.name.clone())
            .mime_str(&file.mime_type)
            .map_err(|e| ProcessingError::remote(format!("Failed to create image part: {}", e)))?;

        let form = reqwest::multipart::Form::new()
            .part("image_file", image_part)
            .text("size", OUTPUT_SIZE);

        Ok(form)
    }
}
