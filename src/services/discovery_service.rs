use crate::errors::{RapiError, RapiResult};
use crate::sources::{HomepageProber, HttpClient};

/// Endpoint and favicon discovery for one site run.
///
/// Owns the homepage cache of the run, so the homepage is requested at most
/// once whichever of the two discoveries needs it first.
pub struct DiscoveryService<'a, C: HttpClient + ?Sized> {
    client: &'a C,
    site_url: String,
    homepage: HomepageProber,
}

impl<'a, C: HttpClient + ?Sized> DiscoveryService<'a, C> {
    pub fn new(client: &'a C, site_url: &str) -> Self {
        Self {
            client,
            site_url: site_url.to_string(),
            homepage: HomepageProber::new(site_url),
        }
    }

    fn base_url(&self) -> &str {
        self.site_url.trim_end_matches('/')
    }

    /// True when a GET on `url` completes with a non-error status.
    fn probe(&self, url: &str) -> bool {
        match self.client.get(url) {
            Ok(response) => !response.is_error(),
            Err(e) => {
                tracing::debug!(url, error = %e, "Probe failed");
                false
            }
        }
    }

    /// Resolve the REST API root: `/wp-json` first, then the link the
    /// homepage advertises.
    pub fn resolve_api_url(&mut self) -> RapiResult<String> {
        let default_url = format!("{}/wp-json", self.base_url());
        if self.probe(&default_url) {
            return Ok(default_url);
        }

        let advertised = match self.homepage.links(self.client) {
            Ok(links) => links.api_url.clone(),
            Err(e) => {
                tracing::debug!(site = %self.site_url, error = %e, "No homepage for API discovery");
                None
            }
        };

        if let Some(api_url) = advertised {
            if self.probe(&api_url) {
                return Ok(api_url);
            }
        }

        Err(RapiError::EndpointDiscovery(self.site_url.clone()))
    }

    /// Best-effort favicon lookup: `/favicon.ico`, then the homepage icon link.
    pub fn discover_favicon(&mut self) -> Option<String> {
        let default_url = format!("{}/favicon.ico", self.base_url());
        if self.probe(&default_url) {
            return Some(default_url);
        }

        match self.homepage.links(self.client) {
            Ok(links) => links.icon_url.clone(),
            Err(e) => {
                tracing::debug!(site = %self.site_url, error = %e, "No homepage for favicon discovery");
                None
            }
        }
    }
}
