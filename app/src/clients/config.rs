use std::fmt;

use log::{debug, warn};
use secrecy::SecretString;

use crate::keychain;

/// Environment variable read for the API key at runtime and at build time
pub const API_KEY_ENV: &str = "REMOVE_BG_API_KEY";

/// Where the API key in use came from, in lookup order
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ApiKeySource {
    Flag,
    Environment,
    Keychain,
    BuildTime,
}

/// Configuration for making removal API calls
pub struct ApiConfig {
    pub api_key: SecretString,
    pub source: ApiKeySource,
    /// Endpoint override, remove.bg when unset
    pub endpoint: Option<String>,
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("api_key", &"[REDACTED]")
            .field("source", &self.source)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl ApiConfig {
    /// Find an API key: flag, then environment, then keychain, then the value baked in at build time.
    ///
    /// Returns `None` when no source holds a non-empty key.
    pub fn resolve(flag: Option<String>, endpoint: Option<String>) -> Option<Self> {
        let keychain_key = match keychain::load_api_key() {
            Ok(key) => key,
            Err(e) => {
                warn!("Failed to read API key from keychain: {}", e);
                None
            }
        };

        let candidates = [
            (ApiKeySource::Flag, flag),
            (ApiKeySource::Environment, std::env::var(API_KEY_ENV).ok()),
            (ApiKeySource::Keychain, keychain_key),
            (
                ApiKeySource::BuildTime,
                option_env!("REMOVE_BG_API_KEY").map(str::to_string),
            ),
        ];

        let (source, api_key) = pick_api_key(candidates)?;
        debug!("Using API key from {}", source);

        Some(Self {
            api_key,
            source,
            endpoint,
        })
    }
}

/// First candidate holding a key that is not blank, trimmed.
pub fn pick_api_key(
    candidates: impl IntoIterator<Item = (ApiKeySource, Option<String>)>,
) -> Option<(ApiKeySource, SecretString)> {
    candidates.into_iter().find_map(|(source, key)| {
        let key = key?;
        let trimmed = key.trim();
        (!trimmed.is_empty()).then(|| (source, SecretString::from(trimmed.to_string())))
    })
}
