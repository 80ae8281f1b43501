use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use tracing::debug;

use crate::domain::config::AppConfig;
use crate::domain::error::{AppError, Result};

/// Environment variable prefix; nested keys use `__`,
/// e.g. `VIOLATION_QUERY_RETRY__MAX_ATTEMPTS=5`
pub const ENV_PREFIX: &str = "VIOLATION_QUERY_";

/// Layered configuration: built-in defaults, optional TOML file, environment
pub struct ConfigService {
    file: Option<PathBuf>,
}

impl ConfigService {
    pub fn new() -> Self {
        Self { file: None }
    }

    pub fn with_file(path: impl AsRef<Path>) -> Self {
        Self {
            file: Some(path.as_ref().to_path_buf()),
        }
    }

    pub fn figment(&self) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));
        if let Some(file) = &self.file {
            figment = figment.merge(Toml::file(file));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load `.env`, extract and validate the configuration
    pub fn load(&self) -> Result<AppConfig> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "Loaded .env");
        }

        if let Some(file) = &self.file {
            if !file.exists() {
                return Err(AppError::Config(format!(
                    "Config file not found: {}",
                    file.display()
                )));
            }
        }

        let config: AppConfig = self.figment().extract()?;
        config.check()?;
        Ok(config)
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}
