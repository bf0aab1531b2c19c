//! Markdown ingestion.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Component, Path};

use chrono::{DateTime, Utc};
use walkdir::WalkDir;

use blog_markdown::{parse_markdown, render_html, ParsedDoc};

use crate::context::PublishContext;
use crate::error::PublishError;
use crate::model::{parse_date, sort_newest_first, IndexContent, Item, Page, Section, SiteModel, Tag};
use crate::pipeline::{Stage, Step};
use crate::site::{SectionId, SiteDescriptor};

/// Scans the content directory and fills the model with sections, items and
/// pages.
///
/// Layout conventions:
/// - `index.md` at the root supplies the home page introduction
/// - any other root file is a free-standing page
/// - `<section>/index.md` supplies the section introduction
/// - every other file under `<section>/` is an item of that section
pub struct AddMarkdownFiles;

impl Step for AddMarkdownFiles {
    fn name(&self) -> &'static str {
        "add-markdown-files"
    }

    fn stage(&self) -> Stage {
        Stage::Ingested
    }

    fn apply(&self, ctx: &PublishContext, mut model: SiteModel) -> Result<SiteModel, PublishError> {
        let content_dir = &ctx.layout().content_dir;
        let site = ctx.site();

        if !content_dir.is_dir() {
            return Err(PublishError::io(
                content_dir,
                io::Error::new(io::ErrorKind::NotFound, "content directory not found"),
            ));
        }

        for id in site.sections() {
            model
                .sections
                .entry(id.clone())
                .or_insert_with(|| Section::new(id.clone()));
        }

        let mut count = 0;

        for entry in WalkDir::new(content_dir).follow_links(true).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(content_dir).to_path_buf();
                PublishError::io(path, io::Error::from(e))
            })?;
            let path = entry.path();

            if !entry.file_type().is_file() {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some("md") {
                continue;
            }

            let relative = path.strip_prefix(content_dir).unwrap_or(path);
            let segments = path_segments(relative)
                .ok_or_else(|| PublishError::parse(path, "path is not valid UTF-8"))?;

            let source = fs::read_to_string(path).map_err(|e| PublishError::io(path, e))?;
            let doc = parse_markdown(&source).map_err(|e| PublishError::parse(path, e))?;

            tracing::debug!("Parsed {}", relative.display());
            count += 1;

            match segments.as_slice() {
                [file] if file.as_str() == "index" => {
                    model.index = index_content(&doc);
                }
                [file] => {
                    model.pages.push(make_page(file, path, &doc)?);
                }
                [section, rest @ ..] => {
                    let id = site.section(section).cloned().ok_or_else(|| {
                        PublishError::parse(
                            path,
                            format!(
                                "'{}' is not a declared section (declared: {})",
                                section,
                                declared_sections(site)
                            ),
                        )
                    })?;
                    let target = model
                        .sections
                        .entry(id.clone())
                        .or_insert_with(|| Section::new(id.clone()));

                    if rest.len() == 1 && rest[0] == "index" {
                        if let Some(title) = doc.title() {
                            target.title = title.to_string();
                        }
                        target.html = render_html(&doc.content);
                        target.body = doc.content;
                    } else {
                        let item = make_item(site, &id, rest, path, doc)?;
                        target.items.push(item);
                    }
                }
                [] => {}
            }
        }

        for section in model.sections.values_mut() {
            sort_newest_first(&mut section.items);
        }

        check_unique_paths(&model)?;

        tracing::info!(
            "Ingested {} markdown files into {} sections",
            count,
            model.sections.len()
        );

        Ok(model)
    }
}

/// Relative path split into UTF-8 segments, extension removed from the last.
fn path_segments(relative: &Path) -> Option<Vec<String>> {
    relative
        .with_extension("")
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_str().map(str::to_string)),
            _ => None,
        })
        .collect()
}

fn declared_sections(site: &SiteDescriptor) -> String {
    site.sections()
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn modified_time(path: &Path) -> Result<DateTime<Utc>, PublishError> {
    let modified = fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|e| PublishError::io(path, e))?;
    Ok(DateTime::<Utc>::from(modified))
}

fn index_content(doc: &ParsedDoc) -> IndexContent {
    let frontmatter = doc.frontmatter.as_ref();
    IndexContent {
        title: doc.title().map(str::to_string),
        description: frontmatter.and_then(|f| f.description.clone()),
        body: doc.content.clone(),
        html: render_html(&doc.content),
    }
}

/// Output path below its parent for a frontmatter slug, or `default` when
/// there is none. Slugs must name at least one real path segment.
fn local_path(source: &Path, slug: Option<&str>, default: String) -> Result<String, PublishError> {
    let Some(raw) = slug else {
        return Ok(default);
    };

    let slug = raw.trim_matches('/');
    let valid = !slug.is_empty()
        && slug
            .split('/')
            .all(|s| !s.trim().is_empty() && s != "." && s != "..");
    if !valid {
        return Err(PublishError::parse(source, format!("invalid slug {raw:?}")));
    }
    Ok(slug.to_string())
}

/// Tags must slugify to something, or their page would replace the tag list.
/// Names sharing a slug collapse into the first one.
fn make_tags(source: &Path, names: &[String]) -> Result<Vec<Tag>, PublishError> {
    let mut tags: Vec<Tag> = Vec::with_capacity(names.len());

    for name in names {
        let tag = Tag::new(name.as_str());
        if tag.slug.is_empty() {
            return Err(PublishError::parse(
                source,
                format!("tag {name:?} has no letters or digits"),
            ));
        }
        if !tags.iter().any(|t| t.slug == tag.slug) {
            tags.push(tag);
        }
    }

    Ok(tags)
}

fn make_page(stem: &str, source: &Path, doc: &ParsedDoc) -> Result<Page, PublishError> {
    let frontmatter = doc.frontmatter.as_ref();
    Ok(Page {
        path: local_path(
            source,
            frontmatter.and_then(|f| f.slug.as_deref()),
            stem.to_string(),
        )?,
        title: doc.title().unwrap_or(stem).to_string(),
        description: frontmatter
            .and_then(|f| f.description.clone())
            .unwrap_or_default(),
        body: doc.content.clone(),
        html: render_html(&doc.content),
        source: source.to_path_buf(),
    })
}

fn make_item(
    site: &SiteDescriptor,
    section: &SectionId,
    rest: &[String],
    source: &Path,
    doc: ParsedDoc,
) -> Result<Item, PublishError> {
    let frontmatter = doc.frontmatter.clone().unwrap_or_default();
    let stem = rest.last().map(String::as_str).unwrap_or_default();

    let local_path = local_path(source, frontmatter.slug.as_deref(), rest.join("/"))?;

    let date = match frontmatter.date.as_deref() {
        Some(raw) => parse_date(raw)
            .ok_or_else(|| PublishError::parse(source, format!("invalid date {raw:?}")))?,
        None => modified_time(source)?,
    };

    let metadata = site
        .extract_metadata(&frontmatter.extra)
        .map_err(|message| PublishError::parse(source, message))?;

    let html = render_html(&doc.content);

    Ok(Item {
        section: section.clone(),
        path: format!("{}/{}", section, local_path),
        title: doc.title().unwrap_or(stem).to_string(),
        description: frontmatter.description.unwrap_or_default(),
        date,
        tags: make_tags(source, &frontmatter.tags)?,
        body: doc.content,
        html,
        metadata,
        source: source.to_path_buf(),
    })
}

/// Two sources must never render to the same output path.
fn check_unique_paths(model: &SiteModel) -> Result<(), PublishError> {
    let mut claimed: BTreeMap<&str, &Path> = BTreeMap::new();
    let reserved = [String::new(), "tags".to_string()];

    let sources = model
        .sections
        .values()
        .flat_map(|s| &s.items)
        .map(|i| (i.path.as_str(), i.source.as_path()))
        .chain(model.pages.iter().map(|p| (p.path.as_str(), p.source.as_path())));

    for (path, source) in sources {
        let clashes_with_generated = reserved.iter().any(|r| r == path)
            || path.starts_with("tags/")
            || model.sections.keys().any(|id| id.as_str() == path);
        if clashes_with_generated {
            return Err(PublishError::parse(
                source,
                format!("output path '{path}' is reserved for a generated page"),
            ));
        }
        if let Some(previous) = claimed.insert(path, source) {
            return Err(PublishError::parse(
                source,
                format!(
                    "output path '{}' is already used by {}",
                    path,
                    previous.display()
                ),
            ));
        }
    }

    Ok(())
}
