use crate::cli::KeyAction;
use crate::error::Error;
use crate::keychain;

pub fn run(action: KeyAction) -> Result<bool, Error> {
    match action {
        KeyAction::Set { key } => {
            keychain::save_api_key(&key)?;
            println!("API key saved.");
        }
        KeyAction::Status => {
            let configured = keychain::load_api_key()?.is_some_and(|key| !key.trim().is_empty());
            println!(
                "API key {}",
                if configured {
                    "configured"
                } else {
                    "not configured"
                }
            );
        }
        KeyAction::Delete => {
            keychain::delete_api_key()?;
            println!("API key deleted.");
        }
    }
    Ok(true)
}
