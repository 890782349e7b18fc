mod client;
mod config;
mod remover;
mod removebg_client;
mod service;

// Re-export public types
pub use client::RemovalClient;
pub use config::{pick_api_key, ApiConfig, ApiKeySource, API_KEY_ENV};
pub use remover::{remote_error_detail, ApiRemover};
pub use removebg_client::{RemoveBgClient, REMOVE_BG_URL};
pub use service::BackgroundRemover;
