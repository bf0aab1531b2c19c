//! RSS 2.0 feed generation.

use std::collections::BTreeSet;

use rss::validation::Validate;
use rss::{CategoryBuilder, Channel, ChannelBuilder, GuidBuilder, ItemBuilder};

use crate::context::PublishContext;
use crate::error::PublishError;
use crate::model::{Item, SiteModel};
use crate::pipeline::{Stage, Step};
use crate::site::SiteDescriptor;

/// Feed output settings.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Output path relative to the output directory
    pub target_path: String,

    /// Minutes readers may cache the feed
    pub ttl: u32,

    /// Newest items kept in the feed
    pub max_items: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            target_path: "feed.rss".to_string(),
            ttl: 250,
            max_items: 100,
        }
    }
}

/// Writes the RSS feed for every section not listed in `excluding`.
pub struct GenerateRssFeed {
    excluding: BTreeSet<String>,
    config: FeedConfig,
}

impl GenerateRssFeed {
    pub fn new<'a>(excluding: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            excluding: excluding.into_iter().map(str::to_string).collect(),
            config: FeedConfig::default(),
        }
    }

    pub fn with_config(mut self, config: FeedConfig) -> Self {
        self.config = config;
        self
    }

    fn includes(&self, item: &Item) -> bool {
        !self.excluding.contains(item.section.as_str())
    }

    fn channel(&self, site: &SiteDescriptor, model: &SiteModel) -> Channel {
        let items: Vec<&Item> = model
            .items_newest_first()
            .into_iter()
            .filter(|item| self.includes(item))
            .take(self.config.max_items)
            .collect();

        // Newest item date rather than the wall clock, so reruns are identical.
        let last_build_date = items.first().map(|item| item.date.to_rfc2822());

        ChannelBuilder::default()
            .title(site.name())
            .link(site.url_for(""))
            .description(site.description())
            .language(Some(site.language().to_string()))
            .generator(Some(format!("blog {}", env!("CARGO_PKG_VERSION"))))
            .ttl(Some(self.config.ttl.to_string()))
            .last_build_date(last_build_date)
            .items(items.into_iter().map(|item| rss_item(site, item)).collect::<Vec<_>>())
            .build()
    }
}

fn rss_item(site: &SiteDescriptor, item: &Item) -> rss::Item {
    let link = site.url_for(&item.path);

    let categories = item
        .tags
        .iter()
        .map(|tag| CategoryBuilder::default().name(tag.name.clone()).build())
        .collect::<Vec<_>>();

    ItemBuilder::default()
        .title(Some(item.title.clone()))
        .link(Some(link.clone()))
        .guid(Some(GuidBuilder::default().permalink(true).value(link).build()))
        .description((!item.description.is_empty()).then(|| item.description.clone()))
        .pub_date(Some(item.date.to_rfc2822()))
        .categories(categories)
        .build()
}

impl Step for GenerateRssFeed {
    fn name(&self) -> &'static str {
        "generate-rss-feed"
    }

    fn stage(&self) -> Stage {
        Stage::FeedEmitted
    }

    fn validate(&self, site: &SiteDescriptor) -> Result<(), PublishError> {
        if let Some(unknown) = self.excluding.iter().find(|id| site.section(id).is_none()) {
            return Err(PublishError::config(format!(
                "feed excludes unknown section '{}'",
                unknown
            )));
        }
        if self.config.max_items == 0 {
            return Err(PublishError::config("feed must keep at least one item"));
        }
        Ok(())
    }

    fn apply(&self, ctx: &PublishContext, mut model: SiteModel) -> Result<SiteModel, PublishError> {
        let channel = self.channel(ctx.site(), &model);
        channel
            .validate()
            .map_err(|e| PublishError::plugin("rss", format!("feed validation failed: {}", e)))?;

        ctx.output()
            .write(&self.config.target_path, channel.to_string())?;

        tracing::info!(
            "Wrote feed with {} items to {}",
            channel.items().len(),
            self.config.target_path
        );
        model.feed_path = Some(self.config.target_path.clone());
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::fs;
    use std::path::PathBuf;

    use tempfile::tempdir;

    use crate::context::ProjectLayout;
    use crate::model::{parse_date, Section, Tag};
    use crate::site::SectionId;

    fn site() -> SiteDescriptor {
        SiteDescriptor::builder("https://example.com", "Blog")
            .description("Test site")
            .section("posts")
            .section("notes")
            .build()
            .unwrap()
    }

    fn item(section: &str, slug: &str, date: &str) -> Item {
        let date = parse_date(date).unwrap();
        Item {
            section: SectionId::new(section).unwrap(),
            path: format!("{}/{}", section, slug),
            title: slug.to_string(),
            description: format!("About {}", slug),
            date,
            tags: vec![Tag::new("Rust")],
            body: String::new(),
            html: String::new(),
            metadata: BTreeMap::new(),
            source: PathBuf::from(format!("{}/{}.md", section, slug)),
        }
    }

    fn model() -> SiteModel {
        let mut model = SiteModel::default();
        for (id, items) in [
            ("posts", vec![item("posts", "hello", "2024-03-01")]),
            ("notes", vec![item("notes", "quick", "2024-04-01")]),
        ] {
            let id = SectionId::new(id).unwrap();
            let mut section = Section::new(id.clone());
            section.items = items;
            model.sections.insert(id, section);
        }
        model
    }

    fn titles(channel: &Channel) -> Vec<&str> {
        channel.items().iter().filter_map(|i| i.title()).collect()
    }

    #[test]
    fn empty_exclusion_includes_every_section() {
        let step = GenerateRssFeed::new(Vec::<&str>::new());

        let channel = step.channel(&site(), &model());

        assert_eq!(titles(&channel), vec!["quick", "hello"]);
        assert_eq!(channel.ttl(), Some("250"));
        assert_eq!(
            channel.last_build_date(),
            Some(parse_date("2024-04-01").unwrap().to_rfc2822().as_str())
        );
    }

    #[test]
    fn excludes_listed_sections() {
        let step = GenerateRssFeed::new(["notes"]);

        let channel = step.channel(&site(), &model());

        assert_eq!(titles(&channel), vec!["hello"]);
    }

    #[test]
    fn caps_item_count() {
        let step = GenerateRssFeed::new(Vec::<&str>::new()).with_config(FeedConfig {
            max_items: 1,
            ..FeedConfig::default()
        });

        let channel = step.channel(&site(), &model());

        assert_eq!(titles(&channel), vec!["quick"]);
    }

    #[test]
    fn rejects_unknown_excluded_section() {
        let step = GenerateRssFeed::new(["drafts"]);

        assert!(matches!(
            step.validate(&site()),
            Err(PublishError::Configuration(_))
        ));
        assert!(GenerateRssFeed::new(["notes"]).validate(&site()).is_ok());
    }

    #[test]
    fn writes_items_with_permalinks_and_categories() {
        let temp = tempdir().unwrap();
        let ctx = PublishContext::new(site(), ProjectLayout::at(temp.path()));

        let model = GenerateRssFeed::new(["notes"]).apply(&ctx, model()).unwrap();

        assert_eq!(model.feed_path.as_deref(), Some("feed.rss"));
        let xml = fs::read_to_string(temp.path().join("output/feed.rss")).unwrap();
        assert_eq!(xml.matches("<item>").count(), 1);
        assert!(xml.contains("<link>https://example.com/posts/hello</link>"));
        assert!(xml.contains("<guid>https://example.com/posts/hello</guid>"));
        assert!(xml.contains("<category>Rust</category>"));
        assert!(xml.contains("<description>About hello</description>"));
    }
}
