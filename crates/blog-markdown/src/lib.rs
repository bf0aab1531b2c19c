//! Markdown parser with frontmatter extraction and code highlighting.
//!
//! This crate parses markdown files, extracts YAML frontmatter, and renders
//! bodies to HTML, optionally replacing fenced code blocks with
//! class-highlighted markup.

pub mod frontmatter;
pub mod highlight;
pub mod parser;

pub use frontmatter::{Frontmatter, FrontmatterError};
pub use highlight::{HighlightError, Highlighter, DEFAULT_THEME};
pub use parser::{parse_markdown, render_html, slugify, ParseError, ParsedDoc, TocEntry};
