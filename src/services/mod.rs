pub mod discovery_service;
pub mod post_service;
pub mod site_service;
pub mod export_service;

pub use discovery_service::DiscoveryService;
pub use post_service::PostService;
pub use site_service::{SiteOutcome, SiteService};
pub use export_service::{ExportReport, ExportService};
