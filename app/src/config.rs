use std::cell::RefCell;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

const CONFIG_DIR_NAME: &str = "nobg";
const CONFIG_FILE_NAME: &str = "config.json";

/// Type-safe configuration key that associates a key name with its value type
#[derive(Debug, Clone, Copy)]
pub struct ConfigKey<T> {
    name: &'static str,
    _phantom: PhantomData<T>,
}

impl<T> ConfigKey<T> {
    const fn new(name: &'static str) -> Self {
        Self {
            name,
            _phantom: PhantomData,
        }
    }

    pub fn key_name(&self) -> &'static str {
        self.name
    }
}

// ===== App Configuration =====

/// Non-secret preferences (the API key lives in the keychain)
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Where processed images are written (default: current directory)
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// Removal endpoint override (default: remove.bg)
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl ConfigKey<AppConfig> {
    pub const APP: Self = Self::new("appConfig");
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("No configuration directory available on this platform")]
    NoConfigDir,
    #[error("Failed to access config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config file: {0}")]
    Json(#[from] serde_json::Error),
}

// ===== Type-Safe Config Store =====

pub trait ConfigStore {
    fn get<T: DeserializeOwned>(&self, key: &ConfigKey<T>) -> Option<T>;
    fn set<T: Serialize>(&self, key: &ConfigKey<T>, value: T) -> Result<(), ConfigError>;
    fn delete<T>(&self, key: &ConfigKey<T>) -> Result<(), ConfigError>;
}

/// Configuration store persisted as a JSON object in one file
pub struct FileConfigStore {
    path: PathBuf,
    data: RefCell<Map<String, Value>>,
}

impl FileConfigStore {
    /// Open the store in the platform config directory
    pub fn open_default() -> Result<Self, ConfigError> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Self::open(dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let data = match std::fs::read(&path) {
            Ok(contents) => serde_json::from_slice(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(e) => return Err(e.into()),
        };
        debug!("Opened config store at {}", path.display());

        Ok(Self {
            path,
            data: RefCell::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_vec_pretty(&*self.data.borrow())?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl ConfigStore for FileConfigStore {
    fn get<T: DeserializeOwned>(&self, key: &ConfigKey<T>) -> Option<T> {
        self.data
            .borrow()
            .get(key.key_name())
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    fn set<T: Serialize>(&self, key: &ConfigKey<T>, value: T) -> Result<(), ConfigError> {
        let val = serde_json::to_value(value)?;
        self.data
            .borrow_mut()
            .insert(key.key_name().to_string(), val);
        self.save()
    }

    fn delete<T>(&self, key: &ConfigKey<T>) -> Result<(), ConfigError> {
        self.data.borrow_mut().remove(key.key_name());
        self.save()
    }
}

pub fn load_app_config(store: &impl ConfigStore) -> AppConfig {
    store.get(&ConfigKey::APP).unwrap_or_default()
}

pub fn save_app_config(store: &impl ConfigStore, config: &AppConfig) -> Result<(), ConfigError> {
    store.set(&ConfigKey::APP, config.clone())
}
