//! Frontmatter extraction and parsing.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};

/// Parsed frontmatter from a markdown file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Frontmatter {
    /// Item title; falls back to the first heading when absent
    #[serde(default)]
    pub title: Option<String>,

    /// Short description used in listings and feeds
    #[serde(default)]
    pub description: Option<String>,

    /// Publication date, kept verbatim for the caller to interpret
    #[serde(default)]
    pub date: Option<String>,

    /// Tags, either a YAML list or a comma-separated string
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub tags: Vec<String>,

    /// Custom slug override
    #[serde(default)]
    pub slug: Option<String>,

    /// Every other key, checked later against the site's metadata schema
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

fn deserialize_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTags {
        List(Vec<String>),
        Inline(String),
    }

    let tags = match Option::<RawTags>::deserialize(deserializer)? {
        Some(RawTags::List(tags)) => tags,
        Some(RawTags::Inline(line)) => line.split(',').map(str::to_string).collect(),
        None => Vec::new(),
    };

    Ok(tags
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect())
}

/// Extract frontmatter from markdown content.
///
/// Returns the parsed frontmatter and the remaining content after the frontmatter block.
pub fn extract_frontmatter(source: &str) -> Result<(Option<Frontmatter>, &str), FrontmatterError> {
    let trimmed = source.trim_start();

    if !trimmed.starts_with("---") {
        return Ok((None, source));
    }

    // Find the closing ---
    let after_open = &trimmed[3..];
    let Some(close_pos) = after_open.find("\n---") else {
        return Err(FrontmatterError::Unclosed);
    };

    let yaml_content = after_open[..close_pos].trim();
    let remaining = &after_open[close_pos + 4..];

    if yaml_content.is_empty() {
        return Ok((Some(Frontmatter::default()), remaining.trim_start()));
    }

    let frontmatter: Frontmatter = serde_yaml::from_str(yaml_content)
        .map_err(|e| FrontmatterError::InvalidYaml(e.to_string()))?;

    Ok((Some(frontmatter), remaining.trim_start()))
}

/// Errors that can occur when parsing frontmatter.
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    #[error("Unclosed frontmatter block - missing closing ---")]
    Unclosed,

    #[error("Invalid YAML in frontmatter: {0}")]
    InvalidYaml(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extracts_valid_frontmatter() {
        let source = r#"---
title: Hello
description: The first post
date: 2024-01-15 09:30
tags: [rust, web]
---

# Hello World
"#;

        let (fm, content) = extract_frontmatter(source).unwrap();
        let fm = fm.unwrap();

        assert_eq!(fm.title.as_deref(), Some("Hello"));
        assert_eq!(fm.description.as_deref(), Some("The first post"));
        assert_eq!(fm.date.as_deref(), Some("2024-01-15 09:30"));
        assert_eq!(fm.tags, vec!["rust".to_string(), "web".to_string()]);
        assert!(fm.extra.is_empty());
        assert!(content.starts_with("# Hello World"));
    }

    #[test]
    fn accepts_comma_separated_tags() {
        let source = "---\ntitle: Tags\ntags: first, second ,, third\n---\nBody";

        let (fm, _) = extract_frontmatter(source).unwrap();

        assert_eq!(
            fm.unwrap().tags,
            vec!["first".to_string(), "second".to_string(), "third".to_string()]
        );
    }

    #[test]
    fn collects_unknown_keys() {
        let source = "---\ntitle: Extra\nreading_time: 5\nfeatured: true\n---\n";

        let (fm, _) = extract_frontmatter(source).unwrap();
        let fm = fm.unwrap();

        assert_eq!(fm.extra.len(), 2);
        assert_eq!(fm.extra["reading_time"].as_u64(), Some(5));
        assert_eq!(fm.extra["featured"].as_bool(), Some(true));
    }

    #[test]
    fn handles_empty_frontmatter() {
        let (fm, content) = extract_frontmatter("---\n---\nBody text").unwrap();

        assert_eq!(fm, Some(Frontmatter::default()));
        assert_eq!(content, "Body text");
    }

    #[test]
    fn handles_no_frontmatter() {
        let source = "# Just Markdown\n\nNo frontmatter here.";

        let (fm, content) = extract_frontmatter(source).unwrap();

        assert!(fm.is_none());
        assert_eq!(content, source);
    }

    #[test]
    fn errors_on_unclosed_frontmatter() {
        let source = "---\ntitle: Test\n# No closing";

        let result = extract_frontmatter(source);

        assert!(matches!(result, Err(FrontmatterError::Unclosed)));
    }

    #[test]
    fn errors_on_invalid_yaml() {
        let source = "---\ntitle: [invalid yaml\n---\n";

        let result = extract_frontmatter(source);

        assert!(matches!(result, Err(FrontmatterError::InvalidYaml(_))));
    }
}
