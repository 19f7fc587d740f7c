use serde::Deserialize;

use crate::domain::SiteInfo;
use crate::errors::{RapiError, RapiResult};
use crate::sources::traits::HttpClient;

/// A `{"rendered": "..."}` field of the WordPress REST API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Rendered {
    #[serde(default)]
    pub rendered: String,
}

/// One item of `/wp/v2/posts`.
#[derive(Debug, Clone, Deserialize)]
pub struct WpPost {
    pub id: u64,
    pub date: String,
    pub modified: String,
    pub status: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub title: Rendered,
    #[serde(default)]
    pub content: Rendered,
    /// `0` means no featured media.
    #[serde(default)]
    pub featured_media: u64,
    #[serde(default)]
    pub author: Option<u64>,
}

impl WpPost {
    pub fn is_published(&self) -> bool {
        self.status == "publish"
    }

    pub fn featured_media_id(&self) -> Option<u64> {
        Some(self.featured_media).filter(|id| *id != 0)
    }
}

#[derive(Debug, Deserialize)]
struct WpMedia {
    source_url: String,
}

#[derive(Debug, Deserialize)]
struct WpUser {
    name: String,
}

/// Client for the routes of a resolved WordPress REST API root.
pub struct WordPressApi<'a, C: HttpClient + ?Sized> {
    client: &'a C,
    api_url: String,
}

impl<'a, C: HttpClient + ?Sized> WordPressApi<'a, C> {
    pub fn new(client: &'a C, api_url: &str) -> Self {
        Self {
            client,
            api_url: api_url.to_string(),
        }
    }

    fn route(&self, path: &str) -> String {
        format!("{}/{}", self.api_url.trim_end_matches('/'), path)
    }

    /// Site metadata from the API root.
    pub fn site_info(&self) -> RapiResult<SiteInfo> {
        let response = self.client.get(&self.api_url)?;
        if response.is_error() {
            return Err(RapiError::SiteInfo {
                url: self.api_url.clone(),
                status: response.status,
            });
        }

        response.json()
    }

    /// First page of the posts collection, in API order.
    ///
    /// Items are decoded one by one; an item that does not decode is logged
    /// and left out instead of failing the whole listing.
    pub fn posts(&self, per_page: u32) -> RapiResult<Vec<WpPost>> {
        let url = self.route(&format!("wp/v2/posts?per_page={}", per_page));
        let response = self.client.get(&url)?;
        if response.is_error() {
            return Err(RapiError::PostRetrieval {
                url,
                status: response.status,
            });
        }

        let items: Vec<serde_json::Value> = response.json()?;
        let posts = items
            .into_iter()
            .filter_map(|item| {
                let id = item.get("id").cloned().unwrap_or_default();
                serde_json::from_value::<WpPost>(item)
                    .map_err(|e| tracing::warn!(%id, error = %e, "Skipping malformed post"))
                    .ok()
            })
            .collect();

        Ok(posts)
    }

    /// Source URL of a media item.
    pub fn media_source_url(&self, id: u64) -> RapiResult<String> {
        let lookup = || -> RapiResult<String> {
            let response = self
                .client
                .get(&self.route(&format!("wp/v2/media/{}", id)))?
                .error_for_status()?;
            Ok(response.json::<WpMedia>()?.source_url)
        };

        lookup().map_err(|e| RapiError::MediaLookup {
            id,
            reason: e.to_string(),
        })
    }

    /// Display name of a user.
    pub fn user_name(&self, id: u64) -> RapiResult<String> {
        let lookup = || -> RapiResult<String> {
            let response = self
                .client
                .get(&self.route(&format!("wp/v2/users/{}", id)))?
                .error_for_status()?;
            Ok(response.json::<WpUser>()?.name)
        };

        lookup().map_err(|e| RapiError::AuthorLookup {
            id,
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::traits::{HttpResponse, MockHttpClient};
    use mockall::predicate::eq;

    const POST: &str = r#"{
        "id": 42,
        "date": "2024-01-15T10:30:00",
        "modified": "2024-01-15T10:30:00",
        "status": "publish",
        "link": "https://example.com/hello-world/",
        "title": {"rendered": "Hello world"},
        "content": {"rendered": "<p>Welcome</p>", "protected": false},
        "featured_media": 0,
        "author": 1
    }"#;

    #[test]
    fn test_post_deserialization() {
        let post: WpPost = serde_json::from_str(POST).unwrap();

        assert_eq!(post.id, 42);
        assert!(post.is_published());
        assert_eq!(post.title.rendered, "Hello world");
        assert_eq!(post.featured_media_id(), None);
        assert_eq!(post.author, Some(1));
    }

    #[test]
    fn test_routes_join_without_double_slash() {
        let client = MockHttpClient::new();
        let api = WordPressApi::new(&client, "https://example.com/wp-json/");

        assert_eq!(
            api.route("wp/v2/posts?per_page=10"),
            "https://example.com/wp-json/wp/v2/posts?per_page=10"
        );
    }

    #[test]
    fn test_posts_error_status_is_post_retrieval_error() {
        let mut client = MockHttpClient::new();
        client
            .expect_get()
            .with(eq("https://example.com/wp-json/wp/v2/posts?per_page=5"))
            .returning(|url| Ok(HttpResponse::new(url, 500, "")));

        let api = WordPressApi::new(&client, "https://example.com/wp-json");
        let err = api.posts(5).unwrap_err();

        assert!(matches!(err, RapiError::PostRetrieval { status: 500, .. }));
    }

    #[test]
    fn test_malformed_item_does_not_fail_listing() {
        let mut client = MockHttpClient::new();
        client
            .expect_get()
            .with(eq("https://example.com/wp-json/wp/v2/posts?per_page=10"))
            .returning(|url| {
                Ok(HttpResponse::new(
                    url,
                    200,
                    format!(
                        r#"[{{"id": 7, "date": null, "modified": null, "status": "draft"}}, {}]"#,
                        POST
                    ),
                ))
            });

        let api = WordPressApi::new(&client, "https://example.com/wp-json");
        let posts = api.posts(10).unwrap();

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id, 42);
    }

    #[test]
    fn test_site_info_error_status_is_surfaced() {
        let mut client = MockHttpClient::new();
        client
            .expect_get()
            .returning(|url| Ok(HttpResponse::new(url, 401, "")));

        let api = WordPressApi::new(&client, "https://example.com/wp-json");

        assert!(matches!(
            api.site_info(),
            Err(RapiError::SiteInfo { status: 401, .. })
        ));
    }

    #[test]
    fn test_user_name_lookup() {
        let mut client = MockHttpClient::new();
        client
            .expect_get()
            .with(eq("https://example.com/wp-json/wp/v2/users/7"))
            .returning(|url| Ok(HttpResponse::new(url, 200, r#"{"id": 7, "name": "Jane Doe"}"#)));

        let api = WordPressApi::new(&client, "https://example.com/wp-json");
        assert_eq!(api.user_name(7).unwrap(), "Jane Doe");
    }

    #[test]
    fn test_media_lookup_failure() {
        let mut client = MockHttpClient::new();
        client
            .expect_get()
            .returning(|url| Ok(HttpResponse::new(url, 404, "")));

        let api = WordPressApi::new(&client, "https://example.com/wp-json");

        assert!(matches!(
            api.media_source_url(3),
            Err(RapiError::MediaLookup { id: 3, .. })
        ));
    }
}
