use std::collections::BTreeMap;

use atom_syndication as atom;
use chrono::{DateTime, FixedOffset, Utc};
use rss::extension::dublincore::DublinCoreExtension;

use crate::domain::{ExportFormat, Post, Site};
use crate::errors::{RapiError, RapiResult};

pub const GENERATOR: &str = "Rapi";
pub const GENERATOR_URI: &str = "https://github.com/themimitoof/rapi";

const CONTENT_NAMESPACE: &str = "http://purl.org/rss/1.0/modules/content/";
const DC_NAMESPACE: &str = "http://purl.org/dc/elements/1.1/";
const INDENT: usize = 2;

/// One entry of a feed document.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
    pub id: String,
    pub title: String,
    pub link: String,
    pub author: String,
    /// HTML body, featured image included.
    pub content: String,
    pub published: DateTime<FixedOffset>,
    pub updated: Option<DateTime<FixedOffset>>,
}

impl FeedEntry {
    pub fn from_post(post: &Post) -> Self {
        let content = match &post.featured_image {
            Some(image) => format!(
                "<img src=\"{}\"><br/><br/>{}",
                html_escape::encode_double_quoted_attribute(image),
                post.content
            ),
            None => post.content.clone(),
        };

        Self {
            id: post.id.clone(),
            title: post.title.clone(),
            link: post.link.clone(),
            author: post.author.clone(),
            content,
            published: post.published_at,
            updated: post.modified_at,
        }
    }

    /// Last time the entry changed.
    fn last_change(&self) -> DateTime<FixedOffset> {
        self.updated.unwrap_or(self.published)
    }
}

/// In-memory syndication feed for a site, renderable to RSS and Atom.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedDocument {
    pub id: String,
    pub title: String,
    pub description: String,
    pub link: String,
    pub icon: Option<String>,
    pub entries: Vec<FeedEntry>,
}

impl FeedDocument {
    pub fn new(id: &str, title: &str, description: &str, link: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            link: link.to_string(),
            icon: None,
            entries: Vec::new(),
        }
    }

    /// Build the document for a site snapshot. Building twice from the same
    /// snapshot yields equal documents.
    pub fn build(site: &Site) -> Self {
        let mut document = Self::new(
            site.url(),
            &site.info.site_name,
            &site.info.description,
            &site.info.home,
        );
        document.icon = site.favicon.clone();

        for post in &site.posts {
            document.add_entry(FeedEntry::from_post(post));
        }

        document
    }

    pub fn add_entry(&mut self, entry: FeedEntry) {
        self.entries.push(entry);
    }

    /// Most recent change across entries, `None` for an empty feed.
    pub fn updated(&self) -> Option<DateTime<FixedOffset>> {
        self.entries.iter().map(FeedEntry::last_change).max()
    }

    pub fn render(&self, format: ExportFormat) -> RapiResult<String> {
        match format {
            ExportFormat::Rss => self.to_rss(),
            ExportFormat::Atom => self.to_atom(),
            ExportFormat::Json => self.to_json(),
        }
    }

    /// Pretty-printed RSS 2.0 document.
    pub fn to_rss(&self) -> RapiResult<String> {
        let items: Vec<rss::Item> = self.entries.iter().map(rss_item).collect();

        let mut namespaces = BTreeMap::new();
        namespaces.insert("content".to_string(), CONTENT_NAMESPACE.to_string());
        namespaces.insert("dc".to_string(), DC_NAMESPACE.to_string());

        let mut channel = rss::Channel::default();
        channel.set_title(self.title.clone());
        channel.set_link(self.link.clone());
        channel.set_description(self.description.clone());
        channel.set_generator(Some(format!("{}: {}", GENERATOR, GENERATOR_URI)));
        channel.set_namespaces(namespaces);
        channel.set_last_build_date(self.updated().map(|dt| dt.to_rfc2822()));
        if let Some(icon) = &self.icon {
            let mut image = rss::Image::default();
            image.set_url(icon.clone());
            image.set_title(self.title.clone());
            image.set_link(self.link.clone());
            channel.set_image(Some(image));
        }
        channel.set_items(items);

        let bytes = channel
            .pretty_write_to(Vec::new(), b' ', INDENT)
            .map_err(|e| RapiError::FeedRender(e.to_string()))?;

        String::from_utf8(bytes).map_err(|e| RapiError::FeedRender(e.to_string()))
    }

    /// Pretty-printed Atom 1.0 document.
    ///
    /// Atom requires `<updated>` on every entry, so entries that were never
    /// modified carry their publication date there.
    pub fn to_atom(&self) -> RapiResult<String> {
        let entries: Vec<atom::Entry> = self.entries.iter().map(atom_entry).collect();

        let mut self_link = atom::Link::default();
        self_link.set_href(self.link.clone());
        self_link.set_rel("self");

        let mut generator = atom::Generator::default();
        generator.set_value(GENERATOR);
        generator.set_uri(Some(GENERATOR_URI.to_string()));

        let mut feed = atom::Feed::default();
        feed.set_id(self.id.clone());
        feed.set_title(self.title.clone());
        feed.set_subtitle(Some(atom::Text::plain(self.description.clone())));
        feed.set_links(vec![self_link]);
        feed.set_generator(Some(generator));
        feed.set_icon(self.icon.clone());
        feed.set_logo(self.icon.clone());
        feed.set_updated(
            self.updated()
                .unwrap_or_else(|| DateTime::<FixedOffset>::from(Utc::now())),
        );
        feed.set_entries(entries);

        let config = atom::WriteConfig {
            write_document_declaration: true,
            indent_size: Some(INDENT),
        };
        let bytes = feed
            .write_with_config(Vec::new(), config)
            .map_err(|e| RapiError::FeedRender(e.to_string()))?;

        String::from_utf8(bytes).map_err(|e| RapiError::FeedRender(e.to_string()))
    }

    /// JSON Feed output is not supported.
    pub fn to_json(&self) -> RapiResult<String> {
        Err(RapiError::RenderingUnsupported(ExportFormat::Json))
    }
}

fn rss_item(entry: &FeedEntry) -> rss::Item {
    let mut guid = rss::Guid::default();
    guid.set_value(entry.id.clone());
    guid.set_permalink(false);

    let mut dublin_core = DublinCoreExtension::default();
    dublin_core.set_creators(vec![entry.author.clone()]);

    let mut item = rss::Item::default();
    item.set_guid(Some(guid));
    item.set_title(Some(entry.title.clone()));
    item.set_link(Some(entry.link.clone()));
    item.set_content(Some(entry.content.clone()));
    item.set_pub_date(Some(entry.published.to_rfc2822()));
    item.set_dublin_core_ext(Some(dublin_core));
    item
}

fn atom_entry(entry: &FeedEntry) -> atom::Entry {
    let mut author = atom::Person::default();
    author.set_name(entry.author.clone());

    let mut link = atom::Link::default();
    link.set_href(entry.link.clone());
    link.set_rel("alternate");

    let mut content = atom::Content::default();
    content.set_value(Some(entry.content.clone()));
    content.set_content_type(Some("html".to_string()));

    let mut item = atom::Entry::default();
    item.set_id(entry.id.clone());
    item.set_title(entry.title.clone());
    item.set_authors(vec![author]);
    item.set_links(vec![link]);
    item.set_content(Some(content));
    item.set_published(Some(entry.published));
    item.set_updated(entry.last_change());
    item
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SiteConfig, SiteInfo};

    fn date(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn site(posts: Vec<Post>) -> Site {
        Site {
            config: SiteConfig::new("https://example.com", vec![ExportFormat::Rss]),
            api_url: "https://example.com/wp-json".to_string(),
            info: SiteInfo {
                home: "https://example.com".to_string(),
                site_name: "SiteName".to_string(),
                description: "Just a blog".to_string(),
                timezone: None,
            },
            favicon: Some("https://example.com/favicon.ico".to_string()),
            posts,
        }
    }

    fn post(id: &str, published: &str, modified: &str) -> Post {
        Post::new(id.to_string(), format!("Post {}", id), date(published))
            .with_modified_at(date(modified))
            .with_link(format!("https://example.com/{}/", id))
            .with_content(format!("<p>Body {}</p>", id))
            .with_author("Jane Doe".to_string())
    }

    #[test]
    fn test_build_maps_site_metadata() {
        let document = FeedDocument::build(&site(vec![]));

        assert_eq!(document.id, "https://example.com");
        assert_eq!(document.link, "https://example.com");
        assert_eq!(document.title, "SiteName");
        assert_eq!(document.description, "Just a blog");
        assert_eq!(document.icon.as_deref(), Some("https://example.com/favicon.ico"));
        assert!(document.updated().is_none());
    }

    #[test]
    fn test_build_is_idempotent() {
        let site = site(vec![
            post("1", "2024-01-01T09:00:00Z", "2024-01-01T09:00:00Z"),
            post("2", "2024-01-02T09:00:00Z", "2024-01-03T09:00:00Z"),
        ]);

        assert_eq!(FeedDocument::build(&site), FeedDocument::build(&site));
    }

    #[test]
    fn test_featured_image_leads_content() {
        let with_image = post("1", "2024-01-01T09:00:00Z", "2024-01-01T09:00:00Z")
            .with_featured_image(Some("https://example.com/a.jpg".to_string()));

        let entry = FeedEntry::from_post(&with_image);
        assert_eq!(
            entry.content,
            "<img src=\"https://example.com/a.jpg\"><br/><br/><p>Body 1</p>"
        );
    }

    #[test]
    fn test_featured_image_url_is_escaped() {
        let with_image = post("1", "2024-01-01T09:00:00Z", "2024-01-01T09:00:00Z")
            .with_featured_image(Some("https://example.com/a.jpg?w=300&h=200&q=\"x\"".to_string()));

        let entry = FeedEntry::from_post(&with_image);
        assert_eq!(
            entry.content,
            "<img src=\"https://example.com/a.jpg?w=300&amp;h=200&amp;q=&quot;x&quot;\"><br/><br/><p>Body 1</p>"
        );
    }

    #[test]
    fn test_unmodified_post_has_no_updated_date() {
        let entry = FeedEntry::from_post(&post("1", "2024-01-01T09:00:00Z", "2024-01-01T09:00:00Z"));
        assert!(entry.updated.is_none());

        let entry = FeedEntry::from_post(&post("2", "2024-01-01T09:00:00Z", "2024-02-01T09:00:00Z"));
        assert_eq!(entry.updated, Some(date("2024-02-01T09:00:00Z")));
    }

    #[test]
    fn test_feed_updated_is_latest_change() {
        let document = FeedDocument::build(&site(vec![
            post("1", "2024-01-01T09:00:00Z", "2024-03-01T09:00:00Z"),
            post("2", "2024-02-01T09:00:00Z", "2024-02-01T09:00:00Z"),
        ]));

        assert_eq!(document.updated(), Some(date("2024-03-01T09:00:00Z")));
    }

    #[test]
    fn test_rss_output() {
        let document = FeedDocument::build(&site(vec![post(
            "7",
            "2024-01-15T10:30:00+01:00",
            "2024-01-15T10:30:00+01:00",
        )]));

        let rss = document.to_rss().unwrap();

        assert!(rss.contains("<title>SiteName</title>"));
        assert!(rss.contains("<guid isPermaLink=\"false\">7</guid>"));
        assert!(rss.contains("<dc:creator>Jane Doe</dc:creator>"));
        assert!(rss.contains("<pubDate>Mon, 15 Jan 2024 10:30:00 +0100</pubDate>"));
        assert!(rss.contains("<url>https://example.com/favicon.ico</url>"));
        assert!(rss.contains("Body 7"));
    }

    #[test]
    fn test_atom_output() {
        let document = FeedDocument::build(&site(vec![
            post("1", "2024-01-01T09:00:00Z", "2024-01-01T09:00:00Z"),
            post("2", "2024-01-02T09:00:00Z", "2024-01-05T09:00:00Z"),
        ]));

        let atom = document.to_atom().unwrap();

        assert!(atom.starts_with("<?xml"));
        assert!(atom.contains("<id>https://example.com</id>"));
        assert!(atom.contains("<icon>https://example.com/favicon.ico</icon>"));
        assert!(atom.contains("<name>Jane Doe</name>"));
        assert!(atom.contains("<updated>2024-01-05T09:00:00+00:00</updated>"));
        assert!(atom.contains("<published>2024-01-01T09:00:00+00:00</published>"));
    }

    #[test]
    fn test_json_is_unsupported() {
        let document = FeedDocument::build(&site(vec![]));

        assert!(matches!(
            document.to_json(),
            Err(RapiError::RenderingUnsupported(ExportFormat::Json))
        ));
        assert!(matches!(
            document.render(ExportFormat::Json),
            Err(RapiError::RenderingUnsupported(ExportFormat::Json))
        ));
    }
}
