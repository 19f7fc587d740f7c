use thiserror::Error;

use crate::domain::ExportFormat;

#[derive(Error, Debug)]
pub enum RapiError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid site URL: {0}")]
    InvalidUrl(String),

    // Acquisition errors (fatal for one site)
    #[error("Unable to find a working API for {0}")]
    EndpointDiscovery(String),

    #[error("Site info request to {url} failed with status {status}")]
    SiteInfo { url: String, status: u16 },

    #[error("Posts request to {url} failed with status {status}")]
    PostRetrieval { url: String, status: u16 },

    #[error("Homepage unavailable: {0}")]
    Homepage(String),

    // Secondary lookups, collapsed to defaults by the post retriever
    #[error("Media lookup for {id} failed: {reason}")]
    MediaLookup { id: u64, reason: String },

    #[error("Author lookup for {id} failed: {reason}")]
    AuthorLookup { id: u64, reason: String },

    // Network errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned status {status}")]
    HttpStatus { url: String, status: u16 },

    // Parsing errors
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid timestamp: {0}")]
    Timestamp(String),

    // Rendering errors
    #[error("Rendering to {0} is not implemented")]
    RenderingUnsupported(ExportFormat),

    #[error("Feed rendering failed: {0}")]
    FeedRender(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RapiResult<T> = Result<T, RapiError>;
