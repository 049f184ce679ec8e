//! File selection: explicit lists, full scans, and version-control change-sets.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::SelectorConfig;
use crate::vcs::{ChangeSource, GitCli};

/// Errors building a file selector.
#[derive(Debug, thiserror::Error)]
pub enum SelectorError {
    /// An exclude glob in the configuration is invalid.
    #[error("Invalid exclude pattern `{pattern}`: {source}")]
    Glob {
        /// The offending pattern.
        pattern: String,
        /// Underlying glob error.
        source: glob::PatternError,
    },
}

/// Ordered set of distinct file paths.
///
/// Paths are kept as selected. A set produced by [`FileSelector`] carries the
/// project root so relative entries can be read from any working directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSet {
    root: Option<PathBuf>,
    files: Vec<PathBuf>,
}

impl FileSet {
    /// Creates an empty set whose relative paths resolve against the working
    /// directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty set whose relative paths resolve against `root`.
    #[must_use]
    pub fn rooted(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
            files: Vec::new(),
        }
    }

    /// Directory relative entries are resolved against, if any.
    #[must_use]
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Location to read `path` from.
    #[must_use]
    pub fn resolve(&self, path: &Path) -> PathBuf {
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Appends `path` unless an equal normalized path is already present.
    /// Returns true if the path was added.
    pub fn insert(&mut self, path: impl AsRef<Path>) -> bool {
        let path = normalize(path.as_ref());
        if self.files.contains(&path) {
            return false;
        }
        self.files.push(path);
        true
    }

    /// Number of files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// True when no file is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Iterates files in selection order.
    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.files.iter()
    }

    /// Files in selection order.
    #[must_use]
    pub fn as_slice(&self) -> &[PathBuf] {
        &self.files
    }
}

impl<P: AsRef<Path>> FromIterator<P> for FileSet {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        let mut set = Self::new();
        for path in iter {
            set.insert(path);
        }
        set
    }
}

impl<'a> IntoIterator for &'a FileSet {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

/// Drops `.` components so `./src/A.ts` and `src/A.ts` compare equal.
fn normalize(path: &Path) -> PathBuf {
    let normalized: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    if normalized.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        normalized
    }
}

/// Extension and exclusion policy shared by every selection mode.
#[derive(Debug, Clone)]
pub struct FilePolicy {
    extension: String,
    exclude_dirs: Vec<String>,
    test_suffixes: Vec<String>,
    exclude: Vec<glob::Pattern>,
}

impl FilePolicy {
    /// Builds the policy from selector configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError::Glob`] for an invalid exclude pattern.
    pub fn from_config(config: &SelectorConfig) -> Result<Self, SelectorError> {
        let exclude = config
            .exclude
            .iter()
            .map(|pattern| {
                glob::Pattern::new(pattern).map_err(|source| SelectorError::Glob {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            extension: config.extension.trim_start_matches('.').to_string(),
            exclude_dirs: config.exclude_dirs.clone(),
            test_suffixes: config.test_suffixes.clone(),
            exclude,
        })
    }

    /// True if any component of `dir` is an excluded directory name.
    #[must_use]
    pub fn is_excluded_dir(&self, dir: &Path) -> bool {
        dir.components().any(|c| match c {
            Component::Normal(name) => {
                let name = name.to_string_lossy();
                self.exclude_dirs.iter().any(|d| *d == name)
            }
            _ => false,
        })
    }

    /// True if `path` has the required extension, is not a test file, and
    /// is not inside an excluded directory or matched by an exclude glob.
    #[must_use]
    pub fn accepts(&self, path: &Path) -> bool {
        let has_extension = path
            .extension()
            .is_some_and(|e| e.to_string_lossy() == self.extension);
        if !has_extension {
            return false;
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if self.test_suffixes.iter().any(|s| file_name.ends_with(s)) {
            return false;
        }

        if path.parent().is_some_and(|p| self.is_excluded_dir(p)) {
            return false;
        }

        let path_str = path.to_string_lossy();
        !self.exclude.iter().any(|p| p.matches(&path_str))
    }
}

/// How to choose the files to validate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Exactly these paths (those that exist).
    Explicit(Vec<PathBuf>),
    /// Every eligible file under the scan roots.
    FullScan,
    /// Files changed locally, or against `base` when given.
    ChangeSet {
        /// Revision to diff against instead of the working tree.
        base: Option<String>,
    },
}

/// Result of a selection: the files plus any degradation warnings.
#[derive(Debug, Default)]
pub struct SelectionOutcome {
    /// Selected files.
    pub files: FileSet,
    /// Human-readable warnings about degraded selection.
    pub warnings: Vec<String>,
}

/// Resolves a [`Selection`] into a [`FileSet`].
pub struct FileSelector {
    root: PathBuf,
    scan_roots: Vec<PathBuf>,
    policy: FilePolicy,
    changes: Box<dyn ChangeSource>,
}

impl FileSelector {
    /// Creates a selector for the project at `root`, using git for
    /// change-sets.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError`] if the configured policy is invalid.
    pub fn new(root: impl Into<PathBuf>, config: &SelectorConfig) -> Result<Self, SelectorError> {
        let root = root.into();
        let changes = Box::new(GitCli::new(&root));
        Self::with_change_source(root, config, changes)
    }

    /// Creates a selector with a custom change source.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError`] if the configured policy is invalid.
    pub fn with_change_source(
        root: impl Into<PathBuf>,
        config: &SelectorConfig,
        changes: Box<dyn ChangeSource>,
    ) -> Result<Self, SelectorError> {
        Ok(Self {
            root: root.into(),
            scan_roots: config.scan_roots.clone(),
            policy: FilePolicy::from_config(config)?,
            changes,
        })
    }

    /// Resolves `selection`. Never fails: unavailable version control
    /// degrades to a smaller set with a warning.
    #[must_use]
    pub fn select(&self, selection: &Selection) -> SelectionOutcome {
        let outcome = match selection {
            Selection::Explicit(paths) => SelectionOutcome {
                files: self.explicit(paths),
                warnings: Vec::new(),
            },
            Selection::FullScan => SelectionOutcome {
                files: self.full_scan(),
                warnings: Vec::new(),
            },
            Selection::ChangeSet { base } => self.change_set(base.as_deref()),
        };

        for warning in &outcome.warnings {
            warn!("{warning}");
        }
        info!("Selected {} file(s)", outcome.files.len());
        outcome
    }

    fn explicit(&self, paths: &[PathBuf]) -> FileSet {
        let mut files = FileSet::rooted(self.root.clone());
        for p in paths {
            let resolved = self.resolve(p);
            if resolved.is_file() && self.policy.accepts(&self.relativize(&resolved)) {
                files.insert(p);
            } else {
                debug!("Skipping {}", p.display());
            }
        }
        files
    }

    fn full_scan(&self) -> FileSet {
        let mut files = FileSet::rooted(self.root.clone());
        for dir in &self.scan_roots {
            self.scan_dir(dir, &mut files);
        }

        if files.is_empty() {
            debug!("Nothing found under scan roots, scanning project root");
            self.scan_dir(Path::new("."), &mut files);
        }
        files
    }

    fn scan_dir(&self, dir: &Path, files: &mut FileSet) {
        let start = self.resolve(dir);
        if !start.is_dir() {
            return;
        }

        let walker = WalkDir::new(&start)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                !(e.file_type().is_dir()
                    && e.depth() > 0
                    && self.policy.is_excluded_dir(Path::new(e.file_name())))
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!("Skipping unreadable entry: {e}");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = self.relativize(entry.path());
            if self.policy.accepts(&relative) {
                files.insert(relative);
            }
        }
    }

    fn change_set(&self, base: Option<&str>) -> SelectionOutcome {
        let mut warnings = Vec::new();

        if !self.changes.is_repository() {
            warnings.push(
                "Git is not available or this is not a git repository; no changed files to check."
                    .to_string(),
            );
            return SelectionOutcome {
                files: FileSet::rooted(self.root.clone()),
                warnings,
            };
        }

        let changed = match base {
            Some(base) => match self.changes.diff_against(base) {
                Ok(files) => files,
                Err(e) => {
                    warnings.push(format!(
                        "Cannot compare against '{base}' ({e}); using local changes instead."
                    ));
                    self.local_changes()
                }
            },
            None => self.local_changes(),
        };

        let mut files = FileSet::rooted(self.root.clone());
        for path in changed.into_iter().filter(|p| self.policy.accepts(p)) {
            files.insert(path);
        }

        SelectionOutcome { files, warnings }
    }

    /// Staged then unstaged changes; each query degrades to nothing.
    fn local_changes(&self) -> Vec<PathBuf> {
        let staged = self.changes.staged().unwrap_or_else(|e| {
            debug!("Staged query failed: {e}");
            Vec::new()
        });
        let unstaged = self.changes.unstaged().unwrap_or_else(|e| {
            debug!("Unstaged query failed: {e}");
            Vec::new()
        });

        let mut seen = HashSet::new();
        staged
            .into_iter()
            .chain(unstaged)
            .filter(|p| seen.insert(p.clone()))
            .collect()
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    fn relativize(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf)
    }
}
