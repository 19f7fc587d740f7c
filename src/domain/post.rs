use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A published article, with timestamps already carrying the site's timezone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub published_at: DateTime<FixedOffset>,
    /// `None` when the post was never modified after publication.
    pub modified_at: Option<DateTime<FixedOffset>>,
    pub link: String,
    pub title: String,
    pub content: String,
    pub featured_image: Option<String>,
    pub author: String,
}

impl Post {
    pub fn new(id: String, title: String, published_at: DateTime<FixedOffset>) -> Self {
        Self {
            id,
            published_at,
            modified_at: None,
            link: String::new(),
            title,
            content: String::new(),
            featured_image: None,
            author: String::new(),
        }
    }

    /// Sets the modification date, dropping it when it equals the publication date.
    pub fn with_modified_at(mut self, modified_at: DateTime<FixedOffset>) -> Self {
        self.modified_at = if modified_at == self.published_at {
            None
        } else {
            Some(modified_at)
        };
        self
    }

    pub fn with_link(mut self, link: String) -> Self {
        self.link = link;
        self
    }

    pub fn with_content(mut self, content: String) -> Self {
        self.content = content;
        self
    }

    pub fn with_featured_image(mut self, featured_image: Option<String>) -> Self {
        self.featured_image = featured_image.filter(|url| !url.is_empty());
        self
    }

    pub fn with_author(mut self, author: String) -> Self {
        self.author = author;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn test_unmodified_post_has_no_modified_date() {
        let published = date("2024-01-15T10:30:00+01:00");
        let post = Post::new("1".to_string(), "Hello".to_string(), published)
            .with_modified_at(published);

        assert!(post.modified_at.is_none());
    }

    #[test]
    fn test_modified_post_keeps_modified_date() {
        let post = Post::new(
            "1".to_string(),
            "Hello".to_string(),
            date("2024-01-15T10:30:00+01:00"),
        )
        .with_modified_at(date("2024-01-16T08:00:00+01:00"));

        assert_eq!(post.modified_at, Some(date("2024-01-16T08:00:00+01:00")));
    }

    #[test]
    fn test_empty_featured_image_is_dropped() {
        let post = Post::new(
            "1".to_string(),
            "Hello".to_string(),
            date("2024-01-15T10:30:00Z"),
        )
        .with_featured_image(Some(String::new()));

        assert!(post.featured_image.is_none());
    }
}
