//! Context types for rule execution.

use std::path::{Path, PathBuf};

use crate::rule::RuleError;

/// Context provided to per-file rules.
///
/// Rules read the source themselves through [`FileContext::read_source`], so
/// rules that only look at the path (like file naming) never touch the disk.
#[derive(Debug, Clone)]
pub struct FileContext<'a> {
    /// Path of the file as selected (relative to the project root when the
    /// selector produced it).
    pub path: &'a Path,
    /// File name component, lossily converted.
    pub file_name: String,
    location: PathBuf,
}

impl<'a> FileContext<'a> {
    /// Creates a context for a file read from `path` itself.
    #[must_use]
    pub fn new(path: &'a Path) -> Self {
        Self::located(path, path.to_path_buf())
    }

    /// Creates a context reported as `path` but read from `location`.
    #[must_use]
    pub fn located(path: &'a Path, location: PathBuf) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            path,
            file_name,
            location,
        }
    }

    /// Where the contents are read from.
    #[must_use]
    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Reads the file contents.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::Io`] if the file cannot be read as UTF-8 text.
    pub fn read_source(&self) -> Result<String, RuleError> {
        std::fs::read_to_string(&self.location).map_err(|source| RuleError::Io {
            path: self.location.clone(),
            source,
        })
    }

    /// Lowercased path string, used for path-token matching.
    #[must_use]
    pub fn lowercase_path(&self) -> String {
        self.path.to_string_lossy().to_lowercase()
    }
}

/// Converts a byte offset into a 1-indexed `(line, column)` pair.
///
/// Offsets past the end clamp to the end of the content.
#[must_use]
pub fn line_column(content: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(content.len());
    let before = &content.as_bytes()[..offset];
    let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
    let line_start = before
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |i| i + 1);
    (line, offset - line_start + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_is_extracted() {
        let ctx = FileContext::new(Path::new("src/users/User.controller.ts"));
        assert_eq!(ctx.file_name, "User.controller.ts");
        assert_eq!(ctx.lowercase_path(), "src/users/user.controller.ts");
    }

    #[test]
    fn read_source_reports_missing_file() {
        let ctx = FileContext::new(Path::new("does/not/Exist.ts"));
        let err = ctx.read_source().unwrap_err();
        assert!(matches!(err, RuleError::Io { .. }));
    }

    #[test]
    fn located_context_reads_from_location() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("src")).unwrap();
        std::fs::write(tmp.path().join("src/A.ts"), "export {};\n").unwrap();

        let path = Path::new("src/A.ts");
        let ctx = FileContext::located(path, tmp.path().join(path));
        assert_eq!(ctx.path, path);
        assert_eq!(ctx.file_name, "A.ts");
        assert_eq!(ctx.read_source().unwrap(), "export {};\n");
    }

    #[test]
    fn test_line_column() {
        let content = "line1\nline2\nline3";
        assert_eq!(line_column(content, 0), (1, 1));
        assert_eq!(line_column(content, 6), (2, 1));
        assert_eq!(line_column(content, 8), (2, 3));
        assert_eq!(line_column(content, 1000), (3, 6));
    }
}
