//! Built-in pipeline steps.
//!
//! The constructor functions return boxed steps so a site can declare its
//! pipeline as a plain list:
//!
//! ```no_run
//! use blog_publish::steps;
//! use blog_publish::theme::Foundation;
//!
//! let pipeline = vec![
//!     steps::add_markdown_files(),
//!     steps::install_plugin(steps::Highlighting::with_class_prefix("hl-")),
//!     steps::copy_resources(),
//!     steps::generate_html(Foundation::new()),
//!     steps::generate_rss_feed(&[]),
//!     steps::generate_site_map(),
//! ];
//! ```

mod feed;
mod highlight;
mod html;
mod markdown;
mod plugin;
mod resources;
mod sitemap;

pub use feed::{FeedConfig, GenerateRssFeed};
pub use highlight::Highlighting;
pub use html::GenerateHtml;
pub use markdown::AddMarkdownFiles;
pub use plugin::{InstallPlugin, Plugin};
pub use resources::CopyResources;
pub use sitemap::GenerateSiteMap;

use crate::pipeline::Step;
use crate::theme::Theme;

/// Read markdown files from the content directory.
pub fn add_markdown_files() -> Box<dyn Step> {
    Box::new(AddMarkdownFiles)
}

/// Run a plugin over the ingested model.
pub fn install_plugin(plugin: impl Plugin + 'static) -> Box<dyn Step> {
    Box::new(InstallPlugin::new(plugin))
}

/// Copy the resources directory into the output.
pub fn copy_resources() -> Box<dyn Step> {
    Box::new(CopyResources)
}

/// Render every page with `theme`.
pub fn generate_html(theme: impl Theme + 'static) -> Box<dyn Step> {
    Box::new(GenerateHtml::new(theme))
}

/// Write the RSS feed, leaving out items of the `excluding` sections.
pub fn generate_rss_feed(excluding: &[&str]) -> Box<dyn Step> {
    Box::new(GenerateRssFeed::new(excluding.iter().copied()))
}

/// Write `sitemap.xml` for every rendered page.
pub fn generate_site_map() -> Box<dyn Step> {
    Box::new(GenerateSiteMap)
}
