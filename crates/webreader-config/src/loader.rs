use std::path::{Path, PathBuf};

use tracing::debug;
use webreader_common::{Error, Result};

use crate::env::expand_env_vars;
use crate::model::AppConfig;

const CANDIDATES: [&str; 3] = ["config.yml", "config.yaml", "config.toml"];

/// Finds and parses the config file inside a config directory.
pub struct ConfigLoader {
    dir: PathBuf,
}

impl ConfigLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `~/.webreader`, falling back to `./.webreader` without a home directory.
    pub fn default_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".webreader")
    }

    /// The first existing candidate file, if any.
    pub fn config_path(&self) -> Option<PathBuf> {
        CANDIDATES
            .iter()
            .map(|name| self.dir.join(name))
            .find(|path| path.is_file())
    }

    /// Load the config from the directory. No file means defaults.
    pub fn load(&self) -> Result<AppConfig> {
        match self.config_path() {
            Some(path) => Self::load_from(&path),
            None => {
                debug!("no config file in {}, using defaults", self.dir.display());
                Ok(AppConfig::default())
            }
        }
    }

    /// Parse a specific file, choosing the format by extension.
    pub fn load_from(path: &Path) -> Result<AppConfig> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("failed to read {}: {e}", path.display()))
        })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let mut config: AppConfig = match ext {
            "yml" | "yaml" => serde_yaml::from_str(&contents)
                .map_err(|e| Error::Config(format!("YAML parse error: {e}")))?,
            "toml" => toml::from_str(&contents)
                .map_err(|e| Error::Config(format!("TOML parse error: {e}")))?,
            other => {
                return Err(Error::Config(format!(
                    "unsupported config extension: {other}"
                )));
            }
        };

        expand_server_values(&mut config);
        Ok(config)
    }
}

fn expand_server_values(config: &mut AppConfig) {
    for server in config.mcp.values_mut() {
        for arg in &mut server.args {
            *arg = expand_env_vars(arg);
        }
        for value in server.env.values_mut() {
            *value = expand_env_vars(value);
        }
    }
}
