use chrono::offset::LocalResult;
use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, TimeZone};
use chrono_tz::Tz;

use crate::domain::{Post, SiteInfo};
use crate::errors::{RapiError, RapiResult};
use crate::sources::{HttpClient, WordPressApi, WpPost};

/// Author name used when the author lookup fails.
pub fn default_author(site_name: &str) -> String {
    format!("'{}' team", site_name)
}

/// Interpret a WordPress timestamp as wall-clock time in `tz`.
///
/// WordPress serves naive `date`/`modified` values; an explicit offset, if
/// present, is discarded. Ambiguous local times resolve to the earliest
/// instant and times skipped by a DST gap are read as UTC.
pub fn parse_wp_timestamp(value: &str, tz: Tz) -> RapiResult<DateTime<FixedOffset>> {
    let naive = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.naive_local()))
        .map_err(|e| RapiError::Timestamp(format!("{}: {}", value, e)))?;

    let local = match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => tz.from_utc_datetime(&naive),
    };

    Ok(local.with_timezone(&local.offset().fix()))
}

/// Retrieves the posts of a site and resolves their secondary data.
pub struct PostService<'a, C: HttpClient + ?Sized> {
    api: WordPressApi<'a, C>,
}

impl<'a, C: HttpClient + ?Sized> PostService<'a, C> {
    pub fn new(client: &'a C, api_url: &str) -> Self {
        Self {
            api: WordPressApi::new(client, api_url),
        }
    }

    /// Fetch one page of up to `per_page` posts, keeping published ones only.
    ///
    /// Only the listing request is fatal. Media and author lookups fall back
    /// to no image and the site team name respectively.
    pub fn retrieve_posts(&self, info: &SiteInfo, per_page: u32) -> RapiResult<Vec<Post>> {
        let tz = info.resolved_timezone();
        let raw_posts = self.api.posts(per_page)?;

        let mut posts = Vec::with_capacity(raw_posts.len());
        for raw in raw_posts {
            if !raw.is_published() {
                tracing::debug!(id = raw.id, status = %raw.status, "Skipping unpublished post");
                continue;
            }

            match self.build_post(raw, info, tz) {
                Ok(post) => {
                    tracing::info!(
                        title = %post.title,
                        author = %post.author,
                        site = %info.home,
                        "Adding post"
                    );
                    posts.push(post);
                }
                Err(e) => tracing::warn!(site = %info.home, error = %e, "Skipping post"),
            }
        }

        Ok(posts)
    }

    fn build_post(&self, raw: WpPost, info: &SiteInfo, tz: Tz) -> RapiResult<Post> {
        let published_at = parse_wp_timestamp(&raw.date, tz)?;
        let modified_at = parse_wp_timestamp(&raw.modified, tz)?;

        let featured_image = raw.featured_media_id().and_then(|id| {
            self.api
                .media_source_url(id)
                .map_err(|e| tracing::warn!(error = %e, "Featured image unavailable"))
                .ok()
        });

        let author = match raw.author {
            Some(id) => self.api.user_name(id).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Author unavailable");
                default_author(&info.site_name)
            }),
            None => default_author(&info.site_name),
        };

        Ok(Post::new(raw.id.to_string(), raw.title.rendered, published_at)
            .with_modified_at(modified_at)
            .with_link(raw.link)
            .with_content(raw.content.rendered)
            .with_featured_image(featured_image)
            .with_author(author))
    }
}
