//! Site descriptor: the metadata every pipeline step reads.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::error::PublishError;
use crate::model::{parse_date, MetadataValue};

static LANGUAGE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]{2,3}(-[A-Za-z0-9]{2,8})*$").unwrap());

static SECTION_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9_-]*$").unwrap());

/// Frontmatter keys with a fixed meaning that schema fields cannot reuse.
const RESERVED_KEYS: &[&str] = &["title", "description", "date", "tags", "slug"];

/// Identifier of a content section, e.g. `posts`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SectionId(String);

impl SectionId {
    pub fn new(id: impl Into<String>) -> Result<Self, PublishError> {
        let id = id.into();
        if !SECTION_ID.is_match(&id) {
            return Err(PublishError::config(format!(
                "invalid section id {id:?}: use lowercase letters, digits, '-' or '_'"
            )));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Display title, e.g. `Posts` for `posts`.
    pub fn title(&self) -> String {
        capitalize(&self.0)
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A content language tag such as `en` or `en-GB`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language(String);

impl Language {
    pub fn new(tag: impl Into<String>) -> Result<Self, PublishError> {
        let tag = tag.into();
        if !LANGUAGE_TAG.is_match(&tag) {
            return Err(PublishError::config(format!(
                "invalid language tag {tag:?}"
            )));
        }
        Ok(Self(tag))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The type a metadata field must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Integer,
    Float,
    Bool,
    Date,
    List,
}

impl FieldKind {
    /// Convert a frontmatter value, or `None` if it has the wrong shape.
    fn convert(self, value: &serde_yaml::Value) -> Option<MetadataValue> {
        match self {
            Self::String => value.as_str().map(|s| MetadataValue::String(s.to_string())),
            Self::Integer => value.as_i64().map(MetadataValue::Integer),
            Self::Float => value.as_f64().map(MetadataValue::Float),
            Self::Bool => value.as_bool().map(MetadataValue::Bool),
            Self::Date => value
                .as_str()
                .and_then(parse_date)
                .map(|date| MetadataValue::Date(date.to_rfc3339())),
            Self::List => {
                if let Some(line) = value.as_str() {
                    return Some(MetadataValue::List(
                        line.split(',')
                            .map(|s| s.trim().to_string())
                            .filter(|s| !s.is_empty())
                            .collect(),
                    ));
                }
                value
                    .as_sequence()?
                    .iter()
                    .map(|v| v.as_str().map(str::to_string))
                    .collect::<Option<Vec<_>>>()
                    .map(MetadataValue::List)
            }
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "a string",
            Self::Integer => "an integer",
            Self::Float => "a number",
            Self::Bool => "a boolean",
            Self::Date => "a date",
            Self::List => "a list of strings",
        };
        f.write_str(name)
    }
}

/// One entry of the per-item metadata schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataField {
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
}

impl MetadataField {
    pub fn required(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: true,
        }
    }

    pub fn optional(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
        }
    }
}

/// Immutable description of the website being published.
#[derive(Debug, Clone)]
pub struct SiteDescriptor {
    url: Url,
    name: String,
    description: String,
    language: Language,
    image_path: Option<String>,
    sections: BTreeSet<SectionId>,
    metadata_schema: Vec<MetadataField>,
}

impl SiteDescriptor {
    /// Start building a descriptor for the site at `url`.
    pub fn builder(url: impl Into<String>, name: impl Into<String>) -> SiteBuilder {
        SiteBuilder {
            url: url.into(),
            name: name.into(),
            description: String::new(),
            language: "en".to_string(),
            image_path: None,
            sections: Vec::new(),
            metadata_schema: Vec::new(),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    pub fn image_path(&self) -> Option<&str> {
        self.image_path.as_deref()
    }

    pub fn sections(&self) -> &BTreeSet<SectionId> {
        &self.sections
    }

    /// Look up a declared section by its identifier.
    pub fn section(&self, id: &str) -> Option<&SectionId> {
        self.sections.iter().find(|s| s.as_str() == id)
    }

    pub fn metadata_schema(&self) -> &[MetadataField] {
        &self.metadata_schema
    }

    /// Absolute URL of a site-relative path.
    ///
    /// `url_for("")` is the site root with a trailing slash. Path segments
    /// are percent-encoded.
    pub fn url_for(&self, path: &str) -> String {
        self.page_url(path).into()
    }

    /// Root-relative link to a site-relative path, keeping the path prefix of
    /// the site URL (`/blog/posts/hello` for `https://example.com/blog/`).
    pub fn href_for(&self, path: &str) -> String {
        self.page_url(path).path().to_string()
    }

    fn page_url(&self, path: &str) -> Url {
        let mut url = self.url.clone();
        url.set_query(None);
        url.set_fragment(None);

        // Base URLs are validated to have a host, so segments are always available.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty();
            let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
            if parts.is_empty() {
                segments.push("");
            } else {
                segments.extend(parts);
            }
        }
        url
    }

    /// Check frontmatter extras against the metadata schema.
    ///
    /// Keys outside the schema are ignored.
    pub fn extract_metadata(
        &self,
        extra: &BTreeMap<String, serde_yaml::Value>,
    ) -> Result<BTreeMap<String, MetadataValue>, String> {
        let mut metadata = BTreeMap::new();

        for field in &self.metadata_schema {
            match extra.get(&field.name) {
                Some(value) if !value.is_null() => {
                    let converted = field.kind.convert(value).ok_or_else(|| {
                        format!("metadata field '{}' must be {}", field.name, field.kind)
                    })?;
                    metadata.insert(field.name.clone(), converted);
                }
                _ if field.required => {
                    return Err(format!("missing required metadata field '{}'", field.name));
                }
                _ => {}
            }
        }

        Ok(metadata)
    }
}

/// Builder for [`SiteDescriptor`]; validation happens in [`SiteBuilder::build`].
#[derive(Debug, Clone)]
pub struct SiteBuilder {
    url: String,
    name: String,
    description: String,
    language: String,
    image_path: Option<String>,
    sections: Vec<String>,
    metadata_schema: Vec<MetadataField>,
}

impl SiteBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn language(mut self, tag: impl Into<String>) -> Self {
        self.language = tag.into();
        self
    }

    pub fn image_path(mut self, path: impl Into<String>) -> Self {
        self.image_path = Some(path.into());
        self
    }

    pub fn section(mut self, id: impl Into<String>) -> Self {
        self.sections.push(id.into());
        self
    }

    pub fn metadata_field(mut self, field: MetadataField) -> Self {
        self.metadata_schema.push(field);
        self
    }

    /// Validate and produce the descriptor.
    pub fn build(self) -> Result<SiteDescriptor, PublishError> {
        let url = Url::parse(&self.url)
            .map_err(|e| PublishError::config(format!("invalid site url {:?}: {}", self.url, e)))?;
        if url.cannot_be_a_base() || url.host_str().is_none() {
            return Err(PublishError::config(format!(
                "site url {:?} must be an absolute URL with a host",
                self.url
            )));
        }

        if self.name.trim().is_empty() {
            return Err(PublishError::config("site name must not be empty"));
        }
        if self.description.trim().is_empty() {
            return Err(PublishError::config("site description must not be empty"));
        }

        let language = Language::new(self.language)?;

        let sections = self
            .sections
            .into_iter()
            .map(SectionId::new)
            .collect::<Result<BTreeSet<_>, _>>()?;
        if sections.is_empty() {
            return Err(PublishError::config("site must declare at least one section"));
        }
        if sections.iter().any(|s| s.as_str() == "tags") {
            return Err(PublishError::config("'tags' is reserved for the tag pages"));
        }

        let mut seen = BTreeSet::new();
        for field in &self.metadata_schema {
            if RESERVED_KEYS.contains(&field.name.as_str()) {
                return Err(PublishError::config(format!(
                    "metadata field '{}' shadows a built-in frontmatter key",
                    field.name
                )));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(PublishError::config(format!(
                    "metadata field '{}' is declared twice",
                    field.name
                )));
            }
        }

        Ok(SiteDescriptor {
            url,
            name: self.name,
            description: self.description,
            language,
            image_path: self.image_path,
            sections,
            metadata_schema: self.metadata_schema,
        })
    }
}

/// Capitalize first letter of a string.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder(url: &str) -> SiteBuilder {
        SiteDescriptor::builder(url, "Blog")
            .description("A description of Blog")
            .section("posts")
    }

    #[test]
    fn builds_with_absolute_urls() {
        for url in [
            "https://example.com",
            "https://example.com/",
            "http://localhost:8000/blog/",
            "https://sub.example.org/path?x=1",
        ] {
            let site = builder(url).build();
            assert!(site.is_ok(), "{url} should be accepted");
        }
    }

    #[test]
    fn rejects_malformed_urls() {
        for url in [
            "",
            "example.com",
            "/relative/path",
            "https://",
            "mailto:someone@example.com",
            "not a url",
        ] {
            let result = builder(url).build();
            assert!(
                matches!(result, Err(PublishError::Configuration(_))),
                "{url:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_empty_metadata() {
        let no_name = SiteDescriptor::builder("https://example.com", " ")
            .description("d")
            .section("posts")
            .build();
        assert!(matches!(no_name, Err(PublishError::Configuration(_))));

        let no_description = SiteDescriptor::builder("https://example.com", "Blog")
            .section("posts")
            .build();
        assert!(matches!(no_description, Err(PublishError::Configuration(_))));

        let no_sections = SiteDescriptor::builder("https://example.com", "Blog")
            .description("d")
            .build();
        assert!(matches!(no_sections, Err(PublishError::Configuration(_))));
    }

    #[test]
    fn validates_language_and_sections() {
        assert!(builder("https://example.com").language("en-GB").build().is_ok());
        assert!(matches!(
            builder("https://example.com").language("english!").build(),
            Err(PublishError::Configuration(_))
        ));
        assert!(matches!(
            builder("https://example.com").section("Bad Section").build(),
            Err(PublishError::Configuration(_))
        ));
        assert!(matches!(
            builder("https://example.com").section("tags").build(),
            Err(PublishError::Configuration(_))
        ));
    }

    #[test]
    fn rejects_reserved_and_duplicate_fields() {
        let reserved = builder("https://example.com")
            .metadata_field(MetadataField::optional("title", FieldKind::String))
            .build();
        assert!(matches!(reserved, Err(PublishError::Configuration(_))));

        let duplicate = builder("https://example.com")
            .metadata_field(MetadataField::optional("mood", FieldKind::String))
            .metadata_field(MetadataField::required("mood", FieldKind::String))
            .build();
        assert!(matches!(duplicate, Err(PublishError::Configuration(_))));
    }

    #[test]
    fn joins_urls() {
        let site = builder("https://example.com").build().unwrap();
        assert_eq!(site.url_for(""), "https://example.com/");
        assert_eq!(site.url_for("posts/hello"), "https://example.com/posts/hello");
        assert_eq!(site.url_for("/feed.rss"), "https://example.com/feed.rss");

        let nested = builder("https://example.com/blog/").build().unwrap();
        assert_eq!(nested.url_for("posts"), "https://example.com/blog/posts");
        assert_eq!(nested.url_for(""), "https://example.com/blog/");

        let bare = builder("https://example.com/blog").build().unwrap();
        assert_eq!(bare.url_for("posts"), "https://example.com/blog/posts");
    }

    #[test]
    fn encodes_path_segments() {
        let site = builder("https://example.com").build().unwrap();

        assert_eq!(site.url_for("posts/my post"), "https://example.com/posts/my%20post");
        assert_eq!(site.url_for("posts/a?b#c"), "https://example.com/posts/a%3Fb%23c");
        assert!(Url::parse(&site.url_for("posts/my post")).is_ok());
    }

    #[test]
    fn hrefs_keep_the_base_path() {
        let root = builder("https://example.com").build().unwrap();
        assert_eq!(root.href_for(""), "/");
        assert_eq!(root.href_for("posts/hello"), "/posts/hello");

        let nested = builder("http://localhost:8000/blog/").build().unwrap();
        assert_eq!(nested.href_for(""), "/blog/");
        assert_eq!(nested.href_for("styles.css"), "/blog/styles.css");
        assert_eq!(nested.href_for("/tags/rust/"), "/blog/tags/rust");
    }

    #[test]
    fn section_titles_are_capitalized() {
        let id = SectionId::new("posts").unwrap();
        assert_eq!(id.title(), "Posts");
    }

    #[test]
    fn extracts_metadata_by_schema() {
        let site = builder("https://example.com")
            .metadata_field(MetadataField::required("reading_time", FieldKind::Integer))
            .metadata_field(MetadataField::optional("series", FieldKind::List))
            .build()
            .unwrap();

        let mut extra = BTreeMap::new();
        extra.insert("reading_time".to_string(), serde_yaml::Value::from(5));
        extra.insert("series".to_string(), serde_yaml::Value::from("intro, rust"));
        extra.insert("ignored".to_string(), serde_yaml::Value::Bool(true));

        let metadata = site.extract_metadata(&extra).unwrap();
        assert_eq!(metadata.len(), 2);
        assert_eq!(metadata["reading_time"], MetadataValue::Integer(5));
        assert_eq!(
            metadata["series"],
            MetadataValue::List(vec!["intro".to_string(), "rust".to_string()])
        );
    }

    #[test]
    fn metadata_errors_name_the_field() {
        let site = builder("https://example.com")
            .metadata_field(MetadataField::required("reading_time", FieldKind::Integer))
            .build()
            .unwrap();

        let missing = site.extract_metadata(&BTreeMap::new()).unwrap_err();
        assert!(missing.contains("reading_time"));

        let mut extra = BTreeMap::new();
        extra.insert("reading_time".to_string(), serde_yaml::Value::from("soon"));
        let wrong = site.extract_metadata(&extra).unwrap_err();
        assert!(wrong.contains("an integer"));
    }
}
