use nobg_session::{ProcessingError, SourceFile};

/// Trait for background-removal API clients
///
/// Each implementation knows how to:
/// - Construct the correct API URL
/// - Add proper authentication headers
/// - Build the multipart form with provider-specific fields
pub trait RemovalClient: Send + Sync {
    /// Get the removal API endpoint URL
    fn removal_url(&self) -> String;

    /// Add authentication to the request builder
    fn add_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder;

    /// Build multipart form from an accepted source file
    fn build_form(&self, file: &SourceFile) -> Result<reqwest::multipart::Form, ProcessingError>;
}
