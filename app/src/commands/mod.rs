pub mod key;
pub mod preferences;
pub mod remove;
