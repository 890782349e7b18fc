use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{error, info};
use nobg_session::{ImageStatus, SessionSnapshot};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::cli::RemoveArgs;
use crate::clients::{ApiConfig, ApiRemover};
use crate::config::{self, FileConfigStore};
use crate::error::Error;
use crate::processing::{load_source_file, ImageProcessor, ImageStateChanged};

/// Run every file through one processor. Returns whether all of them succeeded.
pub async fn run(args: RemoveArgs, quiet: bool) -> Result<bool, Error> {
    let app_config = match FileConfigStore::open_default() {
        Ok(store) => config::load_app_config(&store),
        Err(e) => {
            error!("Ignoring stored preferences: {}", e);
            config::AppConfig::default()
        }
    };

    let api_config =
        ApiConfig::resolve(args.api_key, app_config.endpoint.clone()).ok_or(Error::ApiKeyMissing)?;
    info!("Using API key from {}", api_config.source);

    let output_dir = args
        .output
        .or(app_config.output_dir)
        .unwrap_or_else(|| PathBuf::from("."));

    let processor = ImageProcessor::new(Arc::new(ApiRemover::from_config(api_config)));
    let renderer = spawn_renderer(processor.subscribe(), args.json, quiet);

    let all_succeeded = remove_all(&processor, &args.files, &output_dir, !quiet && !args.json).await;

    drop(processor);
    if let Err(e) = renderer.await {
        error!("Renderer stopped unexpectedly: {}", e);
    }

    Ok(all_succeeded)
}

/// Process `files` one after another, saving each result into `output_dir`.
/// A file that cannot be read or saved is reported and skipped.
async fn remove_all(
    processor: &ImageProcessor,
    files: &[PathBuf],
    output_dir: &Path,
    print_saved: bool,
) -> bool {
    let mut all_succeeded = true;
    for path in files {
        let file = match load_source_file(path).await {
            Ok(file) => file,
            Err(e) => {
                error!("Cannot read {}: {}", path.display(), e);
                all_succeeded = false;
                continue;
            }
        };

        processor.drop_files(vec![file]).await;

        if processor.snapshot().status == ImageStatus::Succeeded {
            match processor.download_to(output_dir).await {
                Ok(saved) if print_saved => println!("{} -> {}", path.display(), saved.display()),
                Ok(_) => {}
                Err(e) => {
                    error!("Cannot save result for {}: {}", path.display(), e);
                    all_succeeded = false;
                }
            }
        } else {
            all_succeeded = false;
        }

        processor.reset();
    }
    all_succeeded
}

/// Print state changes until the processor goes away.
fn spawn_renderer(
    mut snapshots: watch::Receiver<SessionSnapshot>,
    json: bool,
    quiet: bool,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while snapshots.changed().await.is_ok() {
            let event = ImageStateChanged::from(&*snapshots.borrow_and_update());

            if json {
                match serde_json::to_string(&event) {
                    Ok(line) => println!("{line}"),
                    Err(e) => error!("Failed to encode event: {}", e),
                }
                continue;
            }

            if quiet {
                continue;
            }

            match event {
                ImageStateChanged::Processing { file_name } => {
                    eprintln!("Processing {file_name}...")
                }
                ImageStateChanged::Failed { error_message, .. } => {
                    eprintln!("Error processing image: {error_message}")
                }
                _ => {}
            }
        }
    })
}
