//! The website this binary publishes.

use blog_publish::steps::{self, Highlighting};
use blog_publish::{Foundation, PublishError, SiteDescriptor, Step};

/// Sections excluded from the RSS feed.
const FEED_EXCLUDES: &[&str] = &[];

/// Prefix for highlighted code token classes. Empty keeps bare scope names.
const HIGHLIGHT_CLASS_PREFIX: &str = "";

/// Describe the site.
pub fn descriptor() -> Result<SiteDescriptor, PublishError> {
    SiteDescriptor::builder("https://your-website-url.com", "Blog")
        .description("A description of Blog")
        .language("en")
        .section("posts")
        .build()
}

/// The publishing steps, in the order they run.
pub fn pipeline() -> Vec<Box<dyn Step>> {
    vec![
        steps::add_markdown_files(),
        steps::install_plugin(Highlighting::with_class_prefix(HIGHLIGHT_CLASS_PREFIX)),
        steps::copy_resources(),
        steps::generate_html(Foundation::new()),
        steps::generate_rss_feed(FEED_EXCLUDES),
        steps::generate_site_map(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use blog_publish::{Pipeline, ProjectLayout, PublishContext};
    use tempfile::tempdir;

    #[test]
    fn descriptor_is_valid() {
        let site = descriptor().unwrap();

        assert_eq!(site.name(), "Blog");
        assert_eq!(site.url_for("posts/hello"), "https://your-website-url.com/posts/hello");
        assert!(site.section("posts").is_some());
    }

    #[test]
    fn empty_highlight_prefix_is_reported() {
        let site = descriptor().unwrap();

        let lints = Pipeline::new(pipeline()).lints(&site);

        assert_eq!(lints.len(), 1);
        assert!(lints[0].contains("prefix"));
    }

    #[test]
    fn publishes_a_fresh_project() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("content/posts")).unwrap();
        fs::create_dir_all(temp.path().join("resources")).unwrap();
        fs::write(
            temp.path().join("content/posts/first.md"),
            "---\ndate: 2024-05-01\n---\n# My first post\n",
        )
        .unwrap();

        let ctx = PublishContext::new(descriptor().unwrap(), ProjectLayout::at(temp.path()));
        let model = Pipeline::new(pipeline()).run(&ctx).unwrap();

        assert!(model.rendered_pages.contains(&"posts/first".to_string()));
        assert!(temp.path().join("output/posts/first/index.html").is_file());
        assert!(temp.path().join("output/feed.rss").is_file());
        assert!(temp.path().join("output/sitemap.xml").is_file());
    }
}
