//! Themes turn the site model into HTML pages.

mod foundation;

pub use foundation::Foundation;

use crate::model::{Item, Page, Section, SiteModel, TagListing};
use crate::site::SiteDescriptor;

/// Errors a theme can raise while rendering.
#[derive(Debug, thiserror::Error)]
pub enum ThemeError {
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
}

/// Renders every kind of page the pipeline writes.
pub trait Theme {
    fn name(&self) -> &str;

    fn render_index(&self, site: &SiteDescriptor, model: &SiteModel) -> Result<String, ThemeError>;

    fn render_section(
        &self,
        site: &SiteDescriptor,
        model: &SiteModel,
        section: &Section,
    ) -> Result<String, ThemeError>;

    fn render_item(
        &self,
        site: &SiteDescriptor,
        model: &SiteModel,
        item: &Item,
    ) -> Result<String, ThemeError>;

    fn render_page(
        &self,
        site: &SiteDescriptor,
        model: &SiteModel,
        page: &Page,
    ) -> Result<String, ThemeError>;

    /// The `tags/` overview.
    fn render_tag_list(
        &self,
        site: &SiteDescriptor,
        model: &SiteModel,
        tags: &[TagListing<'_>],
    ) -> Result<String, ThemeError>;

    fn render_tag(
        &self,
        site: &SiteDescriptor,
        model: &SiteModel,
        listing: &TagListing<'_>,
    ) -> Result<String, ThemeError>;

    /// CSS written to `styles.css`, before any plugin stylesheets.
    fn stylesheet(&self) -> &str;
}
