//! Static resource copying.

use crate::context::PublishContext;
use crate::error::PublishError;
use crate::model::SiteModel;
use crate::pipeline::{Stage, Step};

/// Copies the resources directory verbatim into the output directory.
pub struct CopyResources;

impl Step for CopyResources {
    fn name(&self) -> &'static str {
        "copy-resources"
    }

    fn stage(&self) -> Stage {
        Stage::ResourcesCopied
    }

    fn apply(&self, ctx: &PublishContext, mut model: SiteModel) -> Result<SiteModel, PublishError> {
        let source = &ctx.layout().resources_dir;

        let copied = ctx.output().copy_dir(source)?;
        tracing::info!("Copied {} resource files", copied.len());

        model.copied_resources.extend(copied);
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    use tempfile::tempdir;

    use crate::context::ProjectLayout;
    use crate::site::SiteDescriptor;

    fn context(root: &std::path::Path) -> PublishContext {
        let site = SiteDescriptor::builder("https://example.com", "Blog")
            .description("Test site")
            .section("posts")
            .build()
            .unwrap();
        PublishContext::new(site, ProjectLayout::at(root))
    }

    #[test]
    fn copies_resources_into_output() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("resources/fonts")).unwrap();
        fs::write(temp.path().join("resources/robots.txt"), "User-agent: *\n").unwrap();
        fs::write(temp.path().join("resources/fonts/body.woff2"), [7u8; 4]).unwrap();

        let model = CopyResources
            .apply(&context(temp.path()), SiteModel::default())
            .unwrap();

        assert_eq!(
            model.copied_resources,
            vec![PathBuf::from("fonts/body.woff2"), PathBuf::from("robots.txt")]
        );
        assert_eq!(
            fs::read_to_string(temp.path().join("output/robots.txt")).unwrap(),
            "User-agent: *\n"
        );
    }

    #[test]
    fn missing_resources_directory_is_an_io_error() {
        let temp = tempdir().unwrap();

        let result = CopyResources.apply(&context(temp.path()), SiteModel::default());

        assert!(matches!(result, Err(PublishError::Io { .. })));
    }
}
