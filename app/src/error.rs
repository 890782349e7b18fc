use derive_more::{Display, From};

#[derive(Debug, Display, From)]
pub enum Error {
    #[from]
    #[display("{_0}")]
    Config(crate::config::ConfigError),

    #[from]
    #[display("{_0}")]
    Keychain(crate::keychain::KeychainError),

    #[from]
    #[display("{_0}")]
    Processing(nobg_session::ProcessingError),

    #[from]
    #[display("{_0}")]
    Transition(nobg_session::TransitionRejection),

    #[from]
    #[display("I/O error: {_0}")]
    Io(std::io::Error),

    #[display("No API key configured. Pass --api-key, set REMOVE_BG_API_KEY or run `nobg key set <KEY>`.")]
    ApiKeyMissing,
}
