//! Output writer: persists artifacts below the output directory.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use crate::error::PublishError;

/// Writes generated files below a root directory.
///
/// Intermediate directories are created on demand. Nothing is cleaned up if a
/// write fails halfway through a run.
#[derive(Debug, Clone)]
pub struct OutputWriter {
    root: PathBuf,
}

impl OutputWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Delete the output directory and recreate it empty.
    pub fn reset(&self) -> Result<(), PublishError> {
        if self.root.exists() {
            fs::remove_dir_all(&self.root).map_err(|e| PublishError::io(&self.root, e))?;
        }
        fs::create_dir_all(&self.root).map_err(|e| PublishError::io(&self.root, e))
    }

    /// Write `contents` to `relative`, returning the absolute path written.
    pub fn write(
        &self,
        relative: impl AsRef<Path>,
        contents: impl AsRef<[u8]>,
    ) -> Result<PathBuf, PublishError> {
        let path = self.resolve(relative.as_ref())?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| PublishError::io(parent, e))?;
        }
        fs::write(&path, contents).map_err(|e| PublishError::io(&path, e))?;

        tracing::debug!("Wrote {}", path.display());
        Ok(path)
    }

    /// Write an HTML page for a site path: `""` becomes `index.html`,
    /// `posts/hello` becomes `posts/hello/index.html`.
    pub fn write_page(&self, page_path: &str, html: &str) -> Result<PathBuf, PublishError> {
        self.write(page_file(page_path), html)
    }

    /// Copy every file under `source` into the output root, keeping relative
    /// paths. Returns the copied paths relative to the output root, sorted.
    pub fn copy_dir(&self, source: &Path) -> Result<Vec<PathBuf>, PublishError> {
        let mut copied = Vec::new();

        for entry in WalkDir::new(source).follow_links(true).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(source).to_path_buf();
                PublishError::io(path, io::Error::from(e))
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(source)
                .unwrap_or(entry.path())
                .to_path_buf();
            let destination = self.resolve(&relative)?;

            if let Some(parent) = destination.parent() {
                fs::create_dir_all(parent).map_err(|e| PublishError::io(parent, e))?;
            }
            fs::copy(entry.path(), &destination)
                .map_err(|e| PublishError::io(entry.path(), e))?;

            copied.push(relative);
        }

        Ok(copied)
    }

    fn resolve(&self, relative: &Path) -> Result<PathBuf, PublishError> {
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || relative.as_os_str().is_empty() {
            return Err(PublishError::io(
                relative,
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "output paths must be relative and stay inside the output directory",
                ),
            ));
        }
        Ok(self.root.join(relative))
    }
}

/// Output file for a site path.
pub fn page_file(page_path: &str) -> PathBuf {
    let trimmed = page_path.trim_matches('/');
    if trimmed.is_empty() {
        PathBuf::from("index.html")
    } else {
        Path::new(trimmed).join("index.html")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn writes_with_intermediate_directories() {
        let temp = tempdir().unwrap();
        let writer = OutputWriter::new(temp.path().join("output"));

        let path = writer.write("a/b/c.txt", "hello").unwrap();

        assert_eq!(path, temp.path().join("output/a/b/c.txt"));
        assert_eq!(fs::read_to_string(path).unwrap(), "hello");
    }

    #[test]
    fn maps_page_paths_to_index_files() {
        assert_eq!(page_file(""), PathBuf::from("index.html"));
        assert_eq!(page_file("posts"), PathBuf::from("posts/index.html"));
        assert_eq!(
            page_file("/posts/hello/"),
            PathBuf::from("posts/hello/index.html")
        );
    }

    #[test]
    fn reset_clears_previous_output() {
        let temp = tempdir().unwrap();
        let writer = OutputWriter::new(temp.path().join("output"));
        writer.write("stale.html", "old").unwrap();

        writer.reset().unwrap();

        assert!(writer.root().is_dir());
        assert!(!writer.root().join("stale.html").exists());
    }

    #[test]
    fn refuses_paths_outside_root() {
        let temp = tempdir().unwrap();
        let writer = OutputWriter::new(temp.path().join("output"));

        let result = writer.write("../escape.txt", "x");

        assert!(matches!(result, Err(PublishError::Io { .. })));
        assert!(!temp.path().join("escape.txt").exists());
    }

    #[test]
    fn copies_directories_verbatim() {
        let temp = tempdir().unwrap();
        let source = temp.path().join("resources");
        fs::create_dir_all(source.join("images")).unwrap();
        fs::write(source.join("favicon.ico"), [0u8, 1, 2]).unwrap();
        fs::write(source.join("images/logo.svg"), "<svg/>").unwrap();

        let writer = OutputWriter::new(temp.path().join("output"));
        let copied = writer.copy_dir(&source).unwrap();

        assert_eq!(
            copied,
            vec![PathBuf::from("favicon.ico"), PathBuf::from("images/logo.svg")]
        );
        assert_eq!(
            fs::read(temp.path().join("output/favicon.ico")).unwrap(),
            vec![0u8, 1, 2]
        );
        assert!(temp.path().join("output/images/logo.svg").exists());
    }

    #[test]
    fn copy_fails_on_missing_source() {
        let temp = tempdir().unwrap();
        let writer = OutputWriter::new(temp.path().join("output"));

        let result = writer.copy_dir(&temp.path().join("missing"));

        assert!(matches!(result, Err(PublishError::Io { .. })));
    }
}
