use std::time::Duration;

use reqwest::blocking::Client;

use crate::errors::RapiResult;
use crate::sources::traits::{HttpClient, HttpResponse};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// `HttpClient` backed by a blocking reqwest client.
pub struct ReqwestClient {
    client: Client,
}

impl ReqwestClient {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .user_agent(concat!("rapi/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> RapiResult<HttpResponse> {
        tracing::debug!(url, "GET");

        let response = self.client.get(url).send()?;
        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let body = response.text()?;

        Ok(HttpResponse {
            url: final_url,
            status,
            body,
        })
    }
}
