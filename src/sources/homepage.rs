use scraper::{Html, Selector};
use url::Url;

use crate::errors::{RapiError, RapiResult};
use crate::sources::traits::HttpClient;

/// Link relation WordPress uses to advertise its REST API.
pub const API_LINK_REL: &str = "https://api.w.org/";

/// `<link>` hints extracted from a homepage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HomepageLinks {
    pub api_url: Option<String>,
    pub icon_url: Option<String>,
}

impl HomepageLinks {
    /// Extract hints from homepage markup. Relative `href`s are resolved
    /// against `base`.
    pub fn from_html(html: &str, base: &str) -> Self {
        let document = Html::parse_document(html);
        let base = Url::parse(base).ok();

        let api_selector = Selector::parse(&format!("link[rel=\"{}\"]", API_LINK_REL)).unwrap();
        let icon_selector = Selector::parse("link[rel~=\"icon\"]").unwrap();

        let href_of = |selector: &Selector| {
            document
                .select(selector)
                .filter_map(|element| element.value().attr("href"))
                .map(str::trim)
                .find(|href| !href.is_empty())
                .map(|href| resolve_href(base.as_ref(), href))
        };

        Self {
            api_url: href_of(&api_selector),
            icon_url: href_of(&icon_selector),
        }
    }
}

fn resolve_href(base: Option<&Url>, href: &str) -> String {
    base.and_then(|b| b.join(href).ok())
        .map(|u| u.to_string())
        .unwrap_or_else(|| href.to_string())
}

/// Lazily fetches a site's homepage, at most once per site run.
///
/// Both the successful parse and the failure are kept, so a stage that runs
/// after a failed fetch sees the same failure without a second request.
pub struct HomepageProber {
    url: String,
    cached: Option<Result<HomepageLinks, String>>,
}

impl HomepageProber {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            cached: None,
        }
    }

    pub fn links<C: HttpClient + ?Sized>(&mut self, client: &C) -> RapiResult<&HomepageLinks> {
        let url = &self.url;
        let outcome = self
            .cached
            .get_or_insert_with(|| Self::fetch(client, url).map_err(|e| e.to_string()));

        match &*outcome {
            Ok(links) => Ok(links),
            Err(reason) => Err(RapiError::Homepage(reason.clone())),
        }
    }

    fn fetch<C: HttpClient + ?Sized>(client: &C, url: &str) -> RapiResult<HomepageLinks> {
        let response = client.get(url)?.error_for_status()?;
        // Relative links are relative to where the redirects ended.
        Ok(HomepageLinks::from_html(&response.body, &response.url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::traits::{HttpResponse, MockHttpClient};
    use mockall::predicate::eq;

    const HOMEPAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Example</title>
  <link rel="https://api.w.org/" href="https://example.com/custom-api" />
  <link rel="shortcut icon" href="/static/favicon.png" />
</head>
<body><p>Hello</p></body>
</html>"#;

    #[test]
    fn test_extracts_api_and_icon_links() {
        let links = HomepageLinks::from_html(HOMEPAGE, "https://example.com");

        assert_eq!(links.api_url.as_deref(), Some("https://example.com/custom-api"));
        assert_eq!(
            links.icon_url.as_deref(),
            Some("https://example.com/static/favicon.png")
        );
    }

    #[test]
    fn test_missing_links() {
        let links = HomepageLinks::from_html("<html><head></head></html>", "https://example.com");
        assert_eq!(links, HomepageLinks::default());
    }

    #[test]
    fn test_homepage_fetched_once() {
        let mut client = MockHttpClient::new();
        client
            .expect_get()
            .with(eq("https://example.com"))
            .times(1)
            .returning(|url| Ok(HttpResponse::new(url, 200, HOMEPAGE)));

        let mut prober = HomepageProber::new("https://example.com");
        assert!(prober.links(&client).is_ok());
        assert!(prober.links(&client).is_ok());
    }

    #[test]
    fn test_links_resolved_against_final_url() {
        let mut client = MockHttpClient::new();
        client
            .expect_get()
            .with(eq("https://example.com"))
            .times(1)
            .returning(|_| {
                Ok(HttpResponse::new(
                    "https://www.example.com/blog/",
                    200,
                    r#"<html><head><link rel="icon" href="icon.png"></head></html>"#,
                ))
            });

        let mut prober = HomepageProber::new("https://example.com");
        let links = prober.links(&client).unwrap();

        assert_eq!(
            links.icon_url.as_deref(),
            Some("https://www.example.com/blog/icon.png")
        );
    }

    #[test]
    fn test_failed_fetch_is_remembered() {
        let mut client = MockHttpClient::new();
        client
            .expect_get()
            .times(1)
            .returning(|url| Ok(HttpResponse::new(url, 500, "")));

        let mut prober = HomepageProber::new("https://example.com");
        assert!(matches!(prober.links(&client), Err(RapiError::Homepage(_))));
        assert!(matches!(prober.links(&client), Err(RapiError::Homepage(_))));
    }
}
