//! The site model threaded through the pipeline.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;

use blog_markdown::slugify;

use crate::site::SectionId;

/// A typed metadata value declared by the site's schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetadataValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// RFC 3339 timestamp
    Date(String),
    List(Vec<String>),
}

/// A normalised tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub slug: String,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let slug = slugify(&name);
        Self { name, slug }
    }

    /// Site-relative path of the tag page.
    pub fn path(&self) -> String {
        format!("tags/{}", self.slug)
    }
}

/// One markdown file inside a section.
#[derive(Debug, Clone)]
pub struct Item {
    pub section: SectionId,
    /// Site-relative path without extension, e.g. `posts/hello`
    pub path: String,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub tags: Vec<Tag>,
    /// Markdown body without frontmatter
    pub body: String,
    /// Rendered body
    pub html: String,
    pub metadata: BTreeMap<String, MetadataValue>,
    pub source: PathBuf,
}

/// A content section and its items, newest first.
#[derive(Debug, Clone)]
pub struct Section {
    pub id: SectionId,
    pub title: String,
    /// Optional introduction from `<section>/index.md`
    pub body: String,
    pub html: String,
    pub items: Vec<Item>,
}

impl Section {
    pub fn new(id: SectionId) -> Self {
        Self {
            title: id.title(),
            id,
            body: String::new(),
            html: String::new(),
            items: Vec::new(),
        }
    }

    pub fn path(&self) -> &str {
        self.id.as_str()
    }
}

/// A free-standing page at the content root.
#[derive(Debug, Clone)]
pub struct Page {
    pub path: String,
    pub title: String,
    pub description: String,
    pub body: String,
    pub html: String,
    pub source: PathBuf,
}

/// Home page content from the root `index.md`.
#[derive(Debug, Clone, Default)]
pub struct IndexContent {
    pub title: Option<String>,
    pub description: Option<String>,
    pub body: String,
    pub html: String,
}

/// Items sharing one tag.
#[derive(Debug, Clone)]
pub struct TagListing<'a> {
    pub tag: Tag,
    pub items: Vec<&'a Item>,
}

/// Everything the pipeline knows about the site so far.
#[derive(Debug, Clone, Default)]
pub struct SiteModel {
    pub index: IndexContent,
    pub sections: BTreeMap<SectionId, Section>,
    pub pages: Vec<Page>,
    /// Extra CSS contributed by plugins, appended to the theme stylesheet
    pub stylesheets: Vec<String>,
    /// Paths of written HTML pages; the root page is `""`
    pub rendered_pages: Vec<String>,
    /// Resource files copied into the output, relative to it
    pub copied_resources: Vec<PathBuf>,
    pub feed_path: Option<String>,
    pub sitemap_path: Option<String>,
}

impl SiteModel {
    /// All items across sections, newest first, ties broken by path.
    pub fn items_newest_first(&self) -> Vec<&Item> {
        let mut items: Vec<&Item> = self.sections.values().flat_map(|s| &s.items).collect();
        sort_newest_first(&mut items);
        items
    }

    /// Tags in slug order, each with its items newest first.
    pub fn tag_listings(&self) -> Vec<TagListing<'_>> {
        let mut listings: BTreeMap<&str, TagListing<'_>> = BTreeMap::new();

        for item in self.items_newest_first() {
            for tag in &item.tags {
                listings
                    .entry(tag.slug.as_str())
                    .or_insert_with(|| TagListing {
                        tag: tag.clone(),
                        items: Vec::new(),
                    })
                    .items
                    .push(item);
            }
        }

        listings.into_values().collect()
    }
}

/// Sort items newest first, ties broken by path.
pub fn sort_newest_first<T: std::borrow::Borrow<Item>>(items: &mut [T]) {
    items.sort_by(|a, b| {
        let a: &Item = a.borrow();
        let b: &Item = b.borrow();
        b.date.cmp(&a.date).then_with(|| a.path.cmp(&b.path))
    });
}

/// Parse a frontmatter date.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM[:SS]` and `YYYY-MM-DD`, all read as UTC.
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return Some(date.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(date) = NaiveDateTime::parse_from_str(value, format) {
            return Some(date.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc())
}
