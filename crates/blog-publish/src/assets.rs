//! Stylesheet bundling and minification.

use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Join the theme stylesheet with plugin stylesheets, in order.
    pub fn bundle_css(theme: &str, extra: &[String]) -> String {
        let mut css = String::with_capacity(theme.len() + extra.iter().map(String::len).sum::<usize>());
        css.push_str(theme);

        for sheet in extra {
            if !css.is_empty() && !css.ends_with('\n') {
                css.push('\n');
            }
            css.push_str(sheet);
        }

        css
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        let mut stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        stylesheet
            .minify(MinifyOptions::default())
            .map_err(|e| format!("CSS minify error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS print error: {}", e))?;

        Ok(minified.code)
    }
}
