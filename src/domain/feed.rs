use serde::{Deserialize, Serialize};

/// Output formats a site can be exported to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Atom,
    Rss,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Atom => "atom",
            ExportFormat::Rss => "rss",
            ExportFormat::Json => "json",
        }
    }

    /// Name of the file holding this export for a site domain
    /// (hostname with dots replaced by dashes).
    pub fn file_name(&self, domain: &str) -> String {
        match self {
            ExportFormat::Atom => format!("atom-{}.xml", domain),
            ExportFormat::Rss => format!("rss-{}.xml", domain),
            ExportFormat::Json => format!("{}.json", domain),
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "atom" => Ok(ExportFormat::Atom),
            "rss" => Ok(ExportFormat::Rss),
            "json" => Ok(ExportFormat::Json),
            _ => Err(format!("Unknown export format: {}", s)),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
