use serde::de::DeserializeOwned;

use crate::errors::{RapiError, RapiResult};

/// Body and status of a completed GET request, after redirects.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub url: String,
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(url: &str, status: u16, body: impl Into<String>) -> Self {
        Self {
            url: url.to_string(),
            status,
            body: body.into(),
        }
    }

    /// Client or server error status (4xx/5xx).
    pub fn is_error(&self) -> bool {
        (400..600).contains(&self.status)
    }

    pub fn error_for_status(self) -> RapiResult<Self> {
        if self.is_error() {
            return Err(RapiError::HttpStatus {
                url: self.url,
                status: self.status,
            });
        }
        Ok(self)
    }

    pub fn json<T: DeserializeOwned>(&self) -> RapiResult<T> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Blocking HTTP GET with redirect-following.
///
/// A transport failure is an `Err`; an error status is an `Ok` response whose
/// `is_error()` is true, so callers decide how each status is treated.
#[cfg_attr(test, mockall::automock)]
pub trait HttpClient: Send + Sync {
    fn get(&self, url: &str) -> RapiResult<HttpResponse>;
}

impl<C: HttpClient + ?Sized> HttpClient for &C {
    fn get(&self, url: &str) -> RapiResult<HttpResponse> {
        (**self).get(url)
    }
}
