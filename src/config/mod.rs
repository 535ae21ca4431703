pub mod settings;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::{fs, io};

pub use settings::ClientSettings;

pub const CONFIG_TEMPLATE: &str = include_str!("config.template.toml");

pub fn get_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME")
            .map(PathBuf::from)
            .map(|h| h.join("Library/Application Support/tutor"))
    }

    #[cfg(target_os = "linux")]
    {
        std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))
            .map(|c| c.join("tutor"))
    }

    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA")
            .map(PathBuf::from)
            .map(|a| a.join("tutor"))
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        std::env::var_os("HOME")
            .map(PathBuf::from)
            .map(|h| h.join(".config/tutor"))
    }
}

/// Layered user configuration. Unset keys fall back to built-in defaults
/// when resolved into [`ClientSettings`].
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub endpoint: Option<String>,
    pub user_id: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl AppConfig {
    #[must_use]
    pub fn load() -> Self {
        Self::load_from(Self::get_config_path().as_deref())
    }

    #[must_use]
    pub fn load_from(path: Option<&Path>) -> Self {
        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }

        builder = builder.add_source(Environment::with_prefix("TUTOR").try_parsing(true));

        builder
            .build()
            .and_then(Config::try_deserialize)
            .unwrap_or_else(|e| {
                eprintln!("Warning: Failed to load config: {e}");
                Self::default()
            })
    }

    /// Values set in `overrides` win over values set in `self`.
    #[must_use]
    pub fn overlay(self, overrides: Self) -> Self {
        Self {
            endpoint: overrides.endpoint.or(self.endpoint),
            user_id: overrides.user_id.or(self.user_id),
            timeout_secs: overrides.timeout_secs.or(self.timeout_secs),
        }
    }

    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        get_config_dir().map(|dir| dir.join("config.toml"))
    }

    pub fn init_default() -> Result<PathBuf, io::Error> {
        let path = Self::get_config_path().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                "Could not determine config directory",
            )
        })?;

        Self::init_at(&path)?;
        Ok(path)
    }

    pub fn init_at(path: &Path) -> Result<(), io::Error> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        if path.exists() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("Config file already exists at {}", path.display()),
            ));
        }

        fs::write(path, CONFIG_TEMPLATE)
    }
}
