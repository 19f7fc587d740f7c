use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::SiteConfig;
use crate::errors::{RapiError, RapiResult};

pub const DEFAULT_CONFIG_FILE: &str = "feeds.toml";

#[derive(Debug, Deserialize)]
struct RawConfig {
    destination: Option<PathBuf>,
    websites: Option<Vec<toml::Value>>,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Folder every feed is written into.
    pub destination_folder: PathBuf,
    pub websites: Vec<SiteConfig>,
}

impl Config {
    /// Get the directory where the executable is located
    fn exe_dir() -> Option<PathBuf> {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    /// Load `.env` from the executable's directory, then the current one.
    pub fn load_env() {
        if let Some(dir) = Self::exe_dir() {
            let env_path = dir.join(".env");
            if env_path.exists() {
                dotenvy::from_path(&env_path).ok();
            }
        }
        dotenvy::dotenv().ok();
    }

    pub fn from_file(path: &Path) -> RapiResult<Self> {
        if !path.exists() {
            return Err(RapiError::Config(format!(
                "The configuration file '{}' doesn't exist.",
                path.display()
            )));
        }

        tracing::info!(path = %path.display(), "Loading configuration");
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse a TOML configuration. Website entries that fail validation are
    /// logged and left out.
    pub fn parse(content: &str) -> RapiResult<Self> {
        let raw: RawConfig =
            toml::from_str(content).map_err(|e| RapiError::Config(e.to_string()))?;

        let destination_folder = raw
            .destination
            .ok_or_else(|| RapiError::Config("No destination set in the configuration file.".to_string()))?;

        let entries = raw
            .websites
            .ok_or_else(|| RapiError::Config("No website configuration found.".to_string()))?;

        let mut websites = Vec::with_capacity(entries.len());
        for entry in entries {
            tracing::debug!(website = %entry, "Configuring website");

            let parsed = SiteConfig::deserialize(entry.clone())
                .map_err(|e| RapiError::Config(e.to_string()))
                .and_then(SiteConfig::validate);

            match parsed {
                Ok(site) => websites.push(site),
                Err(e) => {
                    tracing::error!(website = %entry, error = %e, "Unable to validate the configuration for website");
                }
            }
        }

        Ok(Self {
            destination_folder,
            websites,
        })
    }

    pub fn with_destination(mut self, destination: Option<PathBuf>) -> Self {
        if let Some(destination) = destination {
            self.destination_folder = destination;
        }
        self
    }
}
