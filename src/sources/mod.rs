pub mod traits;
pub mod http;
pub mod homepage;
pub mod wordpress;

pub use traits::{HttpClient, HttpResponse};
pub use http::ReqwestClient;
pub use homepage::{HomepageLinks, HomepageProber};
pub use wordpress::{WordPressApi, WpPost};
