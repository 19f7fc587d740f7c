use crate::domain::{Site, SiteConfig};
use crate::errors::RapiResult;
use crate::services::discovery_service::DiscoveryService;
use crate::services::post_service::PostService;
use crate::sources::{HttpClient, WordPressApi};

/// Outcome of one site's pipeline.
pub struct SiteOutcome {
    pub config: SiteConfig,
    pub result: RapiResult<Site>,
}

/// Runs the acquisition pipeline of each configured site.
pub struct SiteService<C: HttpClient> {
    client: C,
}

impl<C: HttpClient> SiteService<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Acquire one site: endpoint, favicon, metadata, then posts.
    ///
    /// The homepage cache lives for this call only.
    pub fn acquire(&self, config: &SiteConfig) -> RapiResult<Site> {
        let mut discovery = DiscoveryService::new(&self.client, &config.url);

        let api_url = match &config.api_url {
            Some(api_url) => api_url.clone(),
            None => discovery.resolve_api_url()?,
        };
        tracing::debug!(site = %config.url, api_url = %api_url, "Resolved API");

        let favicon = discovery.discover_favicon();
        let info = WordPressApi::new(&self.client, &api_url).site_info()?;
        let posts = PostService::new(&self.client, &api_url).retrieve_posts(&info, config.per_page)?;

        Ok(Site {
            config: config.clone(),
            api_url,
            info,
            favicon,
            posts,
        })
    }

    /// Acquire every site in order. A failed site is logged and reported in
    /// its outcome; the following sites still run.
    pub fn acquire_all(&self, configs: &[SiteConfig]) -> Vec<SiteOutcome> {
        configs
            .iter()
            .map(|config| {
                let result = self.acquire(config);
                if let Err(e) = &result {
                    tracing::error!(site = %config.url, error = %e, "Unable to retrieve site data");
                }
                SiteOutcome {
                    config: config.clone(),
                    result,
                }
            })
            .collect()
    }
}
