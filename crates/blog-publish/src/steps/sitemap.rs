//! Sitemap generation.
//!
//! One entry per rendered HTML page:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url><loc>https://example.com/posts/hello</loc></url>
//! </urlset>
//! ```

use std::borrow::Cow;

use crate::context::PublishContext;
use crate::error::PublishError;
use crate::model::SiteModel;
use crate::pipeline::{Stage, Step};
use crate::site::SiteDescriptor;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
const SITEMAP_PATH: &str = "sitemap.xml";

/// Writes `sitemap.xml` listing every page rendered so far.
pub struct GenerateSiteMap;

impl Step for GenerateSiteMap {
    fn name(&self) -> &'static str {
        "generate-site-map"
    }

    fn stage(&self) -> Stage {
        Stage::SitemapEmitted
    }

    fn apply(&self, ctx: &PublishContext, mut model: SiteModel) -> Result<SiteModel, PublishError> {
        let xml = into_xml(ctx.site(), &model.rendered_pages);
        ctx.output().write(SITEMAP_PATH, xml)?;

        tracing::info!("Wrote sitemap with {} urls", model.rendered_pages.len());
        model.sitemap_path = Some(SITEMAP_PATH.to_string());
        Ok(model)
    }
}

fn into_xml(site: &SiteDescriptor, pages: &[String]) -> String {
    let mut xml = String::with_capacity(128 + pages.len() * 64);

    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<urlset xmlns=\"");
    xml.push_str(SITEMAP_NS);
    xml.push_str("\">\n");

    for page in pages {
        xml.push_str("  <url><loc>");
        xml.push_str(&escape_xml(&site.url_for(page)));
        xml.push_str("</loc></url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    Cow::Owned(
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&apos;"),
    )
}
