use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::{ExportFormat, Post};
use crate::errors::{RapiError, RapiResult};

pub const DEFAULT_PER_PAGE: u32 = 10;
/// Largest page size the WordPress REST API accepts.
pub const MAX_PER_PAGE: u32 = 100;

fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

/// Configuration of one feed source, as read from the configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    pub url: String,
    pub export_formats: Vec<ExportFormat>,
    /// Skips endpoint discovery when set.
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

impl SiteConfig {
    pub fn new(url: &str, export_formats: Vec<ExportFormat>) -> Self {
        Self {
            url: url.to_string(),
            export_formats,
            api_url: None,
            per_page: DEFAULT_PER_PAGE,
        }
    }

    pub fn with_api_url(mut self, api_url: Option<String>) -> Self {
        self.api_url = api_url.filter(|u| !u.is_empty());
        self
    }

    /// Checks the URL and export formats, removing duplicated formats.
    pub fn validate(mut self) -> RapiResult<Self> {
        let parsed = Url::parse(&self.url).map_err(|e| RapiError::InvalidUrl(e.to_string()))?;
        if parsed.host_str().is_none() {
            return Err(RapiError::InvalidUrl(format!("{} has no host", self.url)));
        }

        let mut formats = Vec::with_capacity(self.export_formats.len());
        for format in self.export_formats {
            if !formats.contains(&format) {
                formats.push(format);
            }
        }
        if formats.is_empty() {
            return Err(RapiError::Config(format!(
                "No export format configured for {}",
                self.url
            )));
        }
        if self.per_page == 0 || self.per_page > MAX_PER_PAGE {
            return Err(RapiError::Config(format!(
                "per_page must be between 1 and {} for {}",
                MAX_PER_PAGE, self.url
            )));
        }

        self.export_formats = formats;
        self.api_url = self.api_url.filter(|u| !u.is_empty());
        Ok(self)
    }

    /// Hostname with `.` replaced by `-`, used in exported file names.
    pub fn domain(&self) -> RapiResult<String> {
        let parsed = Url::parse(&self.url).map_err(|e| RapiError::InvalidUrl(e.to_string()))?;
        let host = parsed
            .host_str()
            .ok_or_else(|| RapiError::InvalidUrl("Missing host".to_string()))?;

        Ok(host.replace('.', "-"))
    }
}

/// Descriptive metadata served by the API root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteInfo {
    pub home: String,
    #[serde(rename = "name")]
    pub site_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "timezone_string", default)]
    pub timezone: Option<String>,
}

impl SiteInfo {
    /// Timezone the API's naive timestamps are expressed in. Falls back to
    /// UTC when the site declares none or an unknown one.
    pub fn resolved_timezone(&self) -> Tz {
        match self.timezone.as_deref().map(str::trim) {
            None | Some("") => Tz::UTC,
            Some(name) => name.parse::<Tz>().unwrap_or_else(|_| {
                tracing::warn!(timezone = name, "Unknown timezone, using UTC");
                Tz::UTC
            }),
        }
    }
}

/// Snapshot of a site after a complete acquisition run.
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    pub config: SiteConfig,
    pub api_url: String,
    pub info: SiteInfo,
    pub favicon: Option<String>,
    pub posts: Vec<Post>,
}

impl Site {
    pub fn url(&self) -> &str {
        &self.config.url
    }

    pub fn export_formats(&self) -> &[ExportFormat] {
        &self.config.export_formats
    }
}
