use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "nobg",
    about = "Remove image backgrounds through the remove.bg API",
    version,
    after_help = "Simple usage: nobg remove <image>  (writes {name}_nobg.png)\n\n\
                  The API key is read from --api-key, REMOVE_BG_API_KEY or the keychain (`nobg key set`)."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Remove the background of one or more images, one after another
    Remove(RemoveArgs),
    /// Manage the API key stored in the keychain
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },
    /// Manage stored preferences
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args)]
pub struct RemoveArgs {
    /// Image files (JPG, PNG or WebP, up to 12MB each)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output directory (default: configured output directory, else current directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// API key for this run only
    #[arg(long)]
    pub api_key: Option<String>,

    /// Print state changes as JSON lines on stdout
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum KeyAction {
    /// Store an API key
    Set { key: String },
    /// Report whether an API key is stored (never prints it)
    Status,
    /// Remove the stored API key
    Delete,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the stored preferences
    Show,
    /// Set the default output directory
    SetOutput { dir: PathBuf },
    /// Point requests at another removal endpoint
    SetEndpoint { url: String },
    /// Forget all stored preferences
    Clear,
}
