//! Syntax highlighting plugin.

use blog_markdown::highlight::validate_class_prefix;
use blog_markdown::{HighlightError, Highlighter, DEFAULT_THEME};

use crate::context::PublishContext;
use crate::error::PublishError;
use crate::model::SiteModel;
use crate::steps::plugin::Plugin;

const PLUGIN_NAME: &str = "highlight";

/// Re-renders every body with highlighted code blocks and contributes the
/// matching stylesheet.
#[derive(Debug, Clone)]
pub struct Highlighting {
    class_prefix: &'static str,
    theme: &'static str,
}

impl Highlighting {
    /// Highlight with classes starting with `class_prefix`.
    ///
    /// An empty prefix is allowed but reported as a lint, since bare scope
    /// classes such as `comment` may collide with the theme's own CSS.
    pub fn with_class_prefix(class_prefix: &'static str) -> Self {
        Self {
            class_prefix,
            theme: DEFAULT_THEME,
        }
    }

    /// Colour theme for the generated stylesheet.
    pub fn theme(mut self, theme: &'static str) -> Self {
        self.theme = theme;
        self
    }
}

fn plugin_error(e: HighlightError) -> PublishError {
    PublishError::plugin(PLUGIN_NAME, e)
}

impl Plugin for Highlighting {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn validate(&self) -> Result<(), PublishError> {
        validate_class_prefix(self.class_prefix).map_err(plugin_error)
    }

    fn lints(&self) -> Vec<String> {
        if self.class_prefix.is_empty() {
            vec![
                "highlight class prefix is empty: code token classes are not namespaced and may collide with theme styles"
                    .to_string(),
            ]
        } else {
            Vec::new()
        }
    }

    fn install(&self, _ctx: &PublishContext, mut model: SiteModel) -> Result<SiteModel, PublishError> {
        let highlighter = Highlighter::new(self.class_prefix).map_err(plugin_error)?;
        let render = |body: &str| highlighter.render_html(body).map_err(plugin_error);

        model.index.html = render(&model.index.body)?;

        for section in model.sections.values_mut() {
            section.html = render(&section.body)?;
            for item in &mut section.items {
                item.html = render(&item.body)?;
            }
        }

        for page in &mut model.pages {
            page.html = render(&page.body)?;
        }

        model
            .stylesheets
            .push(highlighter.stylesheet(self.theme).map_err(plugin_error)?);

        Ok(model)
    }
}
