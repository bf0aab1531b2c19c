//! Plugin installation.

use crate::context::PublishContext;
use crate::error::PublishError;
use crate::model::SiteModel;
use crate::pipeline::{Stage, Step};
use crate::site::SiteDescriptor;

/// An extension that post-processes the ingested model.
pub trait Plugin {
    fn name(&self) -> &str;

    /// Reject a bad configuration before any I/O happens.
    fn validate(&self) -> Result<(), PublishError> {
        Ok(())
    }

    /// Non-fatal configuration warnings.
    fn lints(&self) -> Vec<String> {
        Vec::new()
    }

    fn install(&self, ctx: &PublishContext, model: SiteModel) -> Result<SiteModel, PublishError>;
}

/// Step wrapper that runs a [`Plugin`].
pub struct InstallPlugin<P> {
    plugin: P,
}

impl<P: Plugin> InstallPlugin<P> {
    pub fn new(plugin: P) -> Self {
        Self { plugin }
    }
}

impl<P: Plugin> Step for InstallPlugin<P> {
    fn name(&self) -> &'static str {
        "install-plugin"
    }

    fn stage(&self) -> Stage {
        Stage::Highlighted
    }

    fn validate(&self, _site: &SiteDescriptor) -> Result<(), PublishError> {
        self.plugin.validate()
    }

    fn lints(&self, _site: &SiteDescriptor) -> Vec<String> {
        self.plugin.lints()
    }

    fn apply(&self, ctx: &PublishContext, model: SiteModel) -> Result<SiteModel, PublishError> {
        tracing::info!("Installing plugin '{}'", self.plugin.name());
        self.plugin.install(ctx, model)
    }
}
