//! Inputs shared by every pipeline step.

use std::path::{Path, PathBuf};

use crate::error::PublishError;
use crate::output::OutputWriter;
use crate::site::SiteDescriptor;

/// Where a project's content, resources and output live.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    /// Markdown sources
    pub content_dir: PathBuf,

    /// Static assets copied verbatim
    pub resources_dir: PathBuf,

    /// Generated site; cleared at the start of every run
    pub output_dir: PathBuf,
}

impl ProjectLayout {
    /// Default layout under a project root: `content/`, `resources/`, `output/`.
    pub fn at(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            content_dir: root.join("content"),
            resources_dir: root.join("resources"),
            output_dir: root.join("output"),
        }
    }

    /// Refuse layouts where clearing the output would delete sources.
    pub fn validate(&self) -> Result<(), PublishError> {
        for source in [&self.content_dir, &self.resources_dir] {
            if source.starts_with(&self.output_dir) || self.output_dir.starts_with(source) {
                return Err(PublishError::config(format!(
                    "output directory {} overlaps source directory {}",
                    self.output_dir.display(),
                    source.display()
                )));
            }
        }
        Ok(())
    }
}

impl Default for ProjectLayout {
    fn default() -> Self {
        Self::at(".")
    }
}

/// Site descriptor plus project layout, handed to each step.
#[derive(Debug, Clone)]
pub struct PublishContext {
    site: SiteDescriptor,
    layout: ProjectLayout,
    minify: bool,
}

impl PublishContext {
    pub fn new(site: SiteDescriptor, layout: ProjectLayout) -> Self {
        Self {
            site,
            layout,
            minify: true,
        }
    }

    /// Toggle stylesheet minification (on by default).
    pub fn with_minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }

    pub fn site(&self) -> &SiteDescriptor {
        &self.site
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    pub fn minify(&self) -> bool {
        self.minify
    }

    /// Writer rooted at the output directory.
    pub fn output(&self) -> OutputWriter {
        OutputWriter::new(&self.layout.output_dir)
    }
}
