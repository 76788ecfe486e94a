//! # Configuration
//!
//! Adminkit configuration is loaded with [`confique`], layered in priority order:
//!
//! 1. **Environment variables**: `ADMINKIT_API_BASE_URL`, `ADMINKIT_UPLOADS_FOLDER`, etc.
//! 2. **Project Config**: `adminkit.toml` in the data directory.
//! 3. **User Config**: `adminkit.toml` in the OS config directory.
//! 4. **Compiled Defaults**: `#[config(default = ...)]`.
//!
//! The loaded [`AdminConfig`] is read once at startup and never changes for the
//! life of the process.
//!
//! ## Available Settings
//!
//! | Key | Env | Default |
//! |-----|-----|---------|
//! | `api.api_base_url` | `ADMINKIT_API_BASE_URL` | `http://localhost:5000/api` |
//! | `api.uploads_folder` | `ADMINKIT_UPLOADS_FOLDER` | `~/uploads` |
//! | `api.allow_cors_origins` | `ADMINKIT_ALLOW_CORS_ORIGINS` (comma-separated) | `[]` |
//! | `api.date_time_string_format` | `ADMINKIT_DATE_TIME_FORMAT` | `%Y-%m-%d %H:%M` |
//! | `api.base_cdn_url` | `ADMINKIT_BASE_CDN_URL` | unset |
//! | `services.disable_services` | `ADMINKIT_DISABLE_SERVICES` | `false` |

use chrono::format::{Item, StrftimeItems};
use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{AdminError, Result};

/// File name looked up in the data and user config directories.
pub const CONFIG_FILE: &str = "adminkit.toml";

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL the admin client calls
    #[config(env = "ADMINKIT_API_BASE_URL", default = "http://localhost:5000/api")]
    pub api_base_url: String,

    /// Logical path of the uploads folder, resolved against the web root
    #[config(env = "ADMINKIT_UPLOADS_FOLDER", default = "~/uploads")]
    pub uploads_folder: String,

    /// Origins allowed to call the API
    #[config(
        env = "ADMINKIT_ALLOW_CORS_ORIGINS",
        parse_env = confique::env::parse::list_by_comma,
        default = []
    )]
    pub allow_cors_origins: Vec<String>,

    /// chrono format string for datetime values
    #[config(env = "ADMINKIT_DATE_TIME_FORMAT", default = "%Y-%m-%d %H:%M")]
    pub date_time_string_format: String,

    /// Prefix for uploaded asset URLs when served from a CDN
    #[config(env = "ADMINKIT_BASE_CDN_URL")]
    pub base_cdn_url: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000/api".to_string(),
            uploads_folder: "~/uploads".to_string(),
            allow_cors_origins: Vec::new(),
            date_time_string_format: "%Y-%m-%d %H:%M".to_string(),
            base_cdn_url: None,
        }
    }
}

impl ApiConfig {
    /// Public URL of an uploaded file, through the CDN when one is configured.
    pub fn asset_url(&self, file: &str) -> String {
        let file = file.trim_start_matches('/');
        match &self.base_cdn_url {
            Some(cdn) => format!("{}/{}", cdn.trim_end_matches('/'), file),
            None => format!(
                "{}/{}",
                self.uploads_folder.trim_start_matches('~').trim_end_matches('/'),
                file
            ),
        }
    }

    /// Rejects values that would fail later, at render time.
    pub fn validate(&self) -> Result<()> {
        if StrftimeItems::new(&self.date_time_string_format).any(|item| matches!(item, Item::Error)) {
            return Err(AdminError::InvalidConfig(format!(
                "api.date_time_string_format: '{}' is not a valid chrono format",
                self.date_time_string_format
            )));
        }
        Ok(())
    }

    pub fn allows_origin(&self, origin: &str) -> bool {
        self.allow_cors_origins
            .iter()
            .any(|o| o == "*" || o.eq_ignore_ascii_case(origin))
    }
}

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct ServiceSettings {
    /// Turns off background services (mail, indexing) for maintenance runs
    #[config(env = "ADMINKIT_DISABLE_SERVICES", default = false)]
    pub disable_services: bool,
}

/// Configuration for an admin deployment, stored in `adminkit.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct AdminConfig {
    #[config(nested)]
    pub api: ApiConfig,

    #[config(nested)]
    pub services: ServiceSettings,
}

impl AdminConfig {
    /// Loads the layered configuration.
    ///
    /// Missing files are skipped; a file that exists but does not parse is an
    /// error, and so is a value that parses but cannot be used.
    pub fn load(project_dir: &Path, user_dir: Option<&Path>) -> Result<Self> {
        let project_file = project_dir.join(CONFIG_FILE);
        let mut builder = AdminConfig::builder().env().file(&project_file);
        if let Some(dir) = user_dir {
            builder = builder.file(dir.join(CONFIG_FILE));
        }
        let config: AdminConfig = builder.load()?;
        config.api.validate()?;
        debug!(file = %project_file.display(), "loaded configuration");
        Ok(config)
    }

    /// Files consulted by [`AdminConfig::load`], highest priority first.
    pub fn sources(project_dir: &Path, user_dir: Option<&Path>) -> Vec<PathBuf> {
        let mut files = vec![project_dir.join(CONFIG_FILE)];
        files.extend(user_dir.map(|d| d.join(CONFIG_FILE)));
        files
    }

    /// A commented sample `adminkit.toml`.
    pub fn template() -> String {
        confique::toml::template::<AdminConfig>(confique::toml::FormatOptions::default())
    }
}
