pub mod feed;
pub mod post;
pub mod site;

pub use feed::ExportFormat;
pub use post::Post;
pub use site::{Site, SiteConfig, SiteInfo, DEFAULT_PER_PAGE, MAX_PER_PAGE};
