//! Static site publishing for markdown blogs.
//!
//! A [`SiteDescriptor`] describes the website; an ordered list of
//! [`steps`] turns the `content/` and `resources/` folders of a project into
//! a rendered site with an RSS feed and a sitemap.

pub mod assets;
pub mod context;
pub mod error;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod site;
pub mod steps;
pub mod theme;

pub use context::{ProjectLayout, PublishContext};
pub use error::PublishError;
pub use model::{Item, MetadataValue, Page, Section, SiteModel, Tag};
pub use output::OutputWriter;
pub use pipeline::{publish, Pipeline, PipelineState, Stage, Step};
pub use site::{FieldKind, Language, MetadataField, SectionId, SiteBuilder, SiteDescriptor};
pub use theme::{Foundation, Theme, ThemeError};
