use keyring::Entry;
use log::{debug, info};

const SERVICE: &str = "nobg";
/// Account name the API key is stored under
pub const API_KEY_ACCOUNT: &str = "removebg_api_key";

#[derive(Debug, thiserror::Error)]
pub enum KeychainError {
    #[error("API key must not be empty")]
    EmptyKey,
    #[error("Keychain error: {0}")]
    Keyring(#[from] keyring::Error),
}

/// Store the API key, trimmed. Blank keys are refused.
pub fn save_api_key(key: &str) -> Result<(), KeychainError> {
    let key = key.trim();
    if key.is_empty() {
        return Err(KeychainError::EmptyKey);
    }

    let entry = Entry::new(SERVICE, API_KEY_ACCOUNT)?;
    entry.set_password(key)?;
    info!("API key saved to keychain");
    Ok(())
}

pub fn load_api_key() -> Result<Option<String>, KeychainError> {
    let entry = Entry::new(SERVICE, API_KEY_ACCOUNT)?;

    match entry.get_password() {
        Ok(password) => {
            debug!("API key loaded from keychain (length: {})", password.len());
            Ok(Some(password))
        }
        Err(keyring::Error::NoEntry) => {
            debug!("No API key found in keychain");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

pub fn delete_api_key() -> Result<(), KeychainError> {
    let entry = Entry::new(SERVICE, API_KEY_ACCOUNT)?;

    match entry.delete_credential() {
        Ok(()) => {
            info!("API key deleted from keychain");
            Ok(())
        }
        Err(keyring::Error::NoEntry) => {
            debug!("No API key to delete (not found)");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
