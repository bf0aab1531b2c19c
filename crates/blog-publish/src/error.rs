//! Errors raised while publishing a site.

use std::io;
use std::path::{Path, PathBuf};

/// Errors that can occur during a publish run.
///
/// Every variant is fatal: the pipeline stops at the first error and leaves
/// whatever it already wrote in place.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Failed to parse {}: {message}", path.display())]
    ContentParse { path: PathBuf, message: String },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Plugin '{plugin}' failed: {message}")]
    Plugin { plugin: String, message: String },
}

impl PublishError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub(crate) fn parse(path: impl AsRef<Path>, message: impl ToString) -> Self {
        Self::ContentParse {
            path: path.as_ref().to_path_buf(),
            message: message.to_string(),
        }
    }

    pub(crate) fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub(crate) fn plugin(plugin: impl Into<String>, message: impl ToString) -> Self {
        Self::Plugin {
            plugin: plugin.into(),
            message: message.to_string(),
        }
    }
}
