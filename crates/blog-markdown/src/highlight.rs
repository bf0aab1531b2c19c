//! Syntax highlighting for fenced code blocks.
//!
//! Code blocks are re-rendered as nested `<span>` elements whose classes name
//! the syntax scopes, so the colours live in a stylesheet instead of inline
//! styles. The class names can be namespaced with a prefix.

use std::sync::LazyLock;

use pulldown_cmark::{html, CodeBlockKind, Event, Parser, Tag, TagEnd};
use regex::Regex;
use syntect::highlighting::ThemeSet;
use syntect::html::{css_for_theme_with_class_style, ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::parser::markdown_options;

/// Colour theme used when generating the highlight stylesheet.
pub const DEFAULT_THEME: &str = "InspiredGitHub";

static CLASS_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_-][A-Za-z0-9_-]*$").unwrap());

static LANGUAGE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_+#.-]+$").unwrap());

/// Errors that can occur while highlighting.
#[derive(Debug, thiserror::Error)]
pub enum HighlightError {
    #[error("Invalid class prefix {0:?}: must be usable at the start of a CSS class name")]
    InvalidPrefix(String),

    #[error("Unknown highlight theme: {0}")]
    UnknownTheme(String),

    #[error("Highlighting failed: {0}")]
    Syntax(#[from] syntect::Error),
}

/// Check that `prefix` can start a CSS class name. The empty prefix is valid.
pub fn validate_class_prefix(prefix: &str) -> Result<(), HighlightError> {
    if prefix.is_empty() || CLASS_PREFIX.is_match(prefix) {
        Ok(())
    } else {
        Err(HighlightError::InvalidPrefix(prefix.to_string()))
    }
}

/// Highlights fenced code blocks with class-based spans.
pub struct Highlighter {
    syntaxes: SyntaxSet,
    class_prefix: &'static str,
}

impl Highlighter {
    /// Create a highlighter whose classes start with `class_prefix`.
    ///
    /// An empty prefix produces bare scope names such as `keyword`.
    pub fn new(class_prefix: &'static str) -> Result<Self, HighlightError> {
        validate_class_prefix(class_prefix)?;

        Ok(Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
            class_prefix,
        })
    }

    fn class_style(&self) -> ClassStyle {
        if self.class_prefix.is_empty() {
            ClassStyle::Spaced
        } else {
            ClassStyle::SpacedPrefixed {
                prefix: self.class_prefix,
            }
        }
    }

    /// Render markdown to HTML, highlighting every code block.
    pub fn render_html(&self, content: &str) -> Result<String, HighlightError> {
        let mut events = Vec::new();
        let mut current_block: Option<(String, String)> = None; // (info, source)

        for event in Parser::new_ext(content, markdown_options()) {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let info = match kind {
                        CodeBlockKind::Fenced(info) => info.to_string(),
                        CodeBlockKind::Indented => String::new(),
                    };
                    current_block = Some((info, String::new()));
                }

                Event::Text(text) if current_block.is_some() => {
                    if let Some((_, ref mut source)) = current_block {
                        source.push_str(&text);
                    }
                }

                Event::End(TagEnd::CodeBlock) => {
                    if let Some((info, source)) = current_block.take() {
                        let block = self.highlight_block(&info, &source)?;
                        events.push(Event::Html(block.into()));
                    }
                }

                other => events.push(other),
            }
        }

        let mut html_output = String::with_capacity(content.len() * 2);
        html::push_html(&mut html_output, events.into_iter());

        Ok(html_output)
    }

    /// Highlight a single code block given its fence info string.
    pub fn highlight_block(&self, info: &str, source: &str) -> Result<String, HighlightError> {
        let language = info
            .split_whitespace()
            .next()
            .filter(|token| LANGUAGE_TOKEN.is_match(token));

        let syntax = language
            .and_then(|token| self.syntaxes.find_syntax_by_token(token))
            .unwrap_or_else(|| self.syntaxes.find_syntax_plain_text());

        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntaxes, self.class_style());
        for line in LinesWithEndings::from(source) {
            generator.parse_html_for_line_which_includes_newline(line)?;
        }

        let class_attr = language
            .map(|token| format!(" class=\"language-{}\"", token))
            .unwrap_or_default();

        Ok(format!(
            "<pre><code{}>{}</code></pre>\n",
            class_attr,
            generator.finalize()
        ))
    }

    /// Generate the stylesheet that colours the highlight classes.
    pub fn stylesheet(&self, theme_name: &str) -> Result<String, HighlightError> {
        let themes = ThemeSet::load_defaults();
        let theme = themes
            .themes
            .get(theme_name)
            .ok_or_else(|| HighlightError::UnknownTheme(theme_name.to_string()))?;

        Ok(css_for_theme_with_class_style(theme, self.class_style())?)
    }
}
