//! HTML generation through a theme.

use crate::assets::AssetPipeline;
use crate::context::PublishContext;
use crate::error::PublishError;
use crate::model::SiteModel;
use crate::output::OutputWriter;
use crate::pipeline::{Stage, Step};
use crate::theme::{Theme, ThemeError};

const STYLESHEET_PATH: &str = "styles.css";

/// Renders every page of the model and writes the bundled stylesheet.
pub struct GenerateHtml {
    theme: Box<dyn Theme>,
}

impl GenerateHtml {
    pub fn new(theme: impl Theme + 'static) -> Self {
        Self {
            theme: Box::new(theme),
        }
    }

    fn theme_error(&self, e: ThemeError) -> PublishError {
        PublishError::plugin(format!("theme:{}", self.theme.name()), e)
    }

    fn render_pages(
        &self,
        ctx: &PublishContext,
        model: &SiteModel,
        writer: &OutputWriter,
    ) -> Result<Vec<String>, PublishError> {
        let site = ctx.site();
        let mut rendered = Vec::new();
        let mut emit = |path: &str, html: Result<String, ThemeError>| -> Result<(), PublishError> {
            let html = html.map_err(|e| self.theme_error(e))?;
            writer.write_page(path, &html)?;
            rendered.push(path.to_string());
            Ok(())
        };

        emit("", self.theme.render_index(site, model))?;

        for section in model.sections.values() {
            emit(section.path(), self.theme.render_section(site, model, section))?;
            for item in &section.items {
                emit(&item.path, self.theme.render_item(site, model, item))?;
            }
        }

        for page in &model.pages {
            emit(&page.path, self.theme.render_page(site, model, page))?;
        }

        let listings = model.tag_listings();
        emit("tags", self.theme.render_tag_list(site, model, &listings))?;
        for listing in &listings {
            emit(&listing.tag.path(), self.theme.render_tag(site, model, listing))?;
        }

        Ok(rendered)
    }

    fn stylesheet(&self, ctx: &PublishContext, model: &SiteModel) -> String {
        let css = AssetPipeline::bundle_css(self.theme.stylesheet(), &model.stylesheets);
        if !ctx.minify() {
            return css;
        }

        match AssetPipeline::minify_css(&css) {
            Ok(minified) => minified,
            Err(e) => {
                tracing::warn!("Keeping unminified stylesheet: {}", e);
                css
            }
        }
    }
}

impl Step for GenerateHtml {
    fn name(&self) -> &'static str {
        "generate-html"
    }

    fn stage(&self) -> Stage {
        Stage::Rendered
    }

    fn apply(&self, ctx: &PublishContext, mut model: SiteModel) -> Result<SiteModel, PublishError> {
        let writer = ctx.output();

        let rendered = self.render_pages(ctx, &model, &writer)?;
        writer.write(STYLESHEET_PATH, self.stylesheet(ctx, &model))?;

        tracing::info!(
            "Rendered {} pages with theme '{}'",
            rendered.len(),
            self.theme.name()
        );
        model.rendered_pages.extend(rendered);
        Ok(model)
    }
}
