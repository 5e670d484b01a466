use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::infra::api::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, DEFAULT_TTL};

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "PullListManager";
const APP_NAME: &str = "PullListManager";
const LOCAL_CONFIG_FILE: &str = "pull-list.toml";
const ENV_PREFIX: &str = "PULL_LIST_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Root of the shop API; `/api/...` paths are joined onto it.
    pub api_base_url: String,
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_level: String,
    /// Where holds reports are written.
    pub report_dir: PathBuf,
    pub request_timeout_secs: u64,
    pub cache_ttl_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            log_level: "info".to_string(),
            report_dir: PathBuf::from("."),
            request_timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            cache_ttl_secs: DEFAULT_TTL.as_secs(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    Missing(PathBuf),
    #[error(transparent)]
    Figment(#[from] figment::Error),
}

impl Settings {
    /// Defaults, then the first config file found, then `PULL_LIST_*` environment variables.
    pub fn figment(file: Option<&Path>) -> Figment {
        let figment = Figment::new().merge(Serialized::defaults(Settings::default()));
        let figment = match file {
            Some(path) => figment.merge(Toml::file(path)),
            None => figment,
        };
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Load settings. An explicit `path` must exist; otherwise the usual locations are
    /// searched and missing files are fine.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) if !path.is_file() => return Err(ConfigError::Missing(path.to_path_buf())),
            Some(path) => Some(path.to_path_buf()),
            None => discover_config_file(),
        };
        if let Some(file) = &file {
            tracing::debug!(path = %file.display(), "loading config file");
        }
        Ok(Self::figment(file.as_deref()).extract()?)
    }

    /// `--api-url` beats every other source.
    pub fn with_api_url(mut self, api_url: Option<String>) -> Self {
        if let Some(url) = api_url {
            self.api_base_url = url;
        }
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

fn discover_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .filter(|path| path.is_file())
}
