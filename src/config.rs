// File: ./src/config.rs
// Handles configuration loading and defaults.
use crate::client::Credentials;
use crate::client::auth::DEFAULT_TOKEN_URL;
use crate::client::core::DEFAULT_API_URL;
use crate::context::AppContext;
use crate::model::DayNames;
use anyhow::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_token_url() -> String {
    DEFAULT_TOKEN_URL.to_string()
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_token_url")]
    pub token_url: String,

    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default)]
    pub refresh_token: String,
    /// Used as-is instead of refreshing, mostly for testing against a local server.
    #[serde(default)]
    pub access_token: Option<String>,

    /// Create task lists that the schedule names but the account lacks.
    #[serde(default)]
    pub create_missing_lists: bool,

    #[serde(default)]
    pub schedule_path: Option<String>,
    /// Locale of the day abbreviations: unset for `Mon..Sun`, `"system"`, or a name like `de_DE`.
    #[serde(default)]
    pub day_locale: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            token_url: default_token_url(),
            client_id: String::new(),
            client_secret: String::new(),
            refresh_token: String::new(),
            access_token: None,
            create_missing_lists: false,
            schedule_path: None,
            day_locale: None,
        }
    }
}

impl Config {
    /// Load the configuration from disk using an explicit context.
    /// Returns a contextualized error if reading or parsing fails.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;

        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found"));
        }

        let contents = fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;

        Ok(config)
    }

    /// Like `load`, but a missing file yields the defaults. Dry runs and `check`
    /// need no credentials, so they work without any config.
    pub fn load_or_default(ctx: &dyn AppContext) -> Result<Self> {
        match Self::load(ctx) {
            Ok(config) => Ok(config),
            Err(e) if Self::is_missing_config_error(&e) => {
                log::debug!("No config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    pub fn is_missing_config_error(err: &Error) -> bool {
        if err.to_string().contains("Config file not found") {
            return true;
        }

        for cause in err.chain() {
            if let Some(io_err) = cause.downcast_ref::<std::io::Error>()
                && io_err.kind() == std::io::ErrorKind::NotFound
            {
                return true;
            }
        }

        false
    }

    pub fn get_path_string(ctx: &dyn AppContext) -> Result<String> {
        let path = ctx.get_config_file_path()?;
        Ok(path.to_string_lossy().to_string())
    }

    /// The configured schedule file, or the context's default location.
    pub fn schedule_path(&self, ctx: &dyn AppContext) -> Result<PathBuf> {
        match self.schedule_path.as_deref().map(str::trim) {
            Some(p) if !p.is_empty() => Ok(PathBuf::from(p)),
            _ => ctx.get_default_schedule_path(),
        }
    }

    pub fn day_names(&self) -> Result<DayNames> {
        DayNames::from_setting(self.day_locale.as_deref())
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            refresh_token: self.refresh_token.clone(),
        }
    }

    pub fn has_credentials(&self) -> bool {
        self.access_token.as_deref().is_some_and(|t| !t.is_empty())
            || !self.refresh_token.is_empty()
    }
}
