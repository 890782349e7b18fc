use crate::cli::ConfigAction;
use crate::config::{self, ConfigKey, ConfigStore, FileConfigStore};
use crate::error::Error;

pub fn run(action: ConfigAction) -> Result<bool, Error> {
    let store = FileConfigStore::open_default()?;
    let mut app_config = config::load_app_config(&store);

    match action {
        ConfigAction::Show => {
            println!("# {}", store.path().display());
            println!(
                "output directory: {}",
                app_config
                    .output_dir
                    .as_ref()
                    .map(|dir| dir.display().to_string())
                    .unwrap_or_else(|| "(current directory)".to_string())
            );
            println!(
                "endpoint: {}",
                app_config
                    .endpoint
                    .as_deref()
                    .unwrap_or(crate::clients::REMOVE_BG_URL)
            );
        }
        ConfigAction::SetOutput { dir } => {
            app_config.output_dir = Some(dir);
            config::save_app_config(&store, &app_config)?;
        }
        ConfigAction::SetEndpoint { url } => {
            app_config.endpoint = Some(url);
            config::save_app_config(&store, &app_config)?;
        }
        ConfigAction::Clear => {
            store.delete(&ConfigKey::<config::AppConfig>::APP)?;
        }
    }
    Ok(true)
}
