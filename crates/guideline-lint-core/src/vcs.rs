//! Version-control queries used by change-set selection.

use std::path::PathBuf;
use std::process::Command;

use tracing::debug;

/// Errors from version-control queries.
#[derive(Debug, thiserror::Error)]
pub enum VcsError {
    /// The VCS binary could not be spawned.
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        /// Command line that was attempted.
        command: String,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The command ran but exited unsuccessfully.
    #[error("`{command}` failed: {stderr}")]
    Failed {
        /// Command line that failed.
        command: String,
        /// Trimmed standard error output.
        stderr: String,
    },
}

/// Source of added/modified files relative to a version-control baseline.
///
/// Paths are returned relative to the project root the source was created
/// for.
pub trait ChangeSource: Send + Sync {
    /// Returns true when the project root is inside a repository.
    fn is_repository(&self) -> bool;

    /// Added or modified files in the index.
    ///
    /// # Errors
    ///
    /// Returns [`VcsError`] if the query fails.
    fn staged(&self) -> Result<Vec<PathBuf>, VcsError>;

    /// Added or modified files in the working tree, not yet staged.
    ///
    /// # Errors
    ///
    /// Returns [`VcsError`] if the query fails.
    fn unstaged(&self) -> Result<Vec<PathBuf>, VcsError>;

    /// Added or modified files compared to `base`.
    ///
    /// # Errors
    ///
    /// Returns [`VcsError`] if `base` cannot be resolved or the query fails.
    fn diff_against(&self, base: &str) -> Result<Vec<PathBuf>, VcsError>;
}

/// [`ChangeSource`] backed by the `git` command line.
#[derive(Debug, Clone)]
pub struct GitCli {
    root: PathBuf,
}

impl GitCli {
    /// Creates a git change source rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn run(&self, args: &[&str]) -> Result<String, VcsError> {
        let command = format!("git {}", args.join(" "));
        debug!("Running {command} in {}", self.root.display());

        let out = Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .output()
            .map_err(|source| VcsError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !out.status.success() {
            return Err(VcsError::Failed {
                command,
                stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&out.stdout).into_owned())
    }

    fn changed(&self, args: &[&str]) -> Result<Vec<PathBuf>, VcsError> {
        self.run(args).map(|out| parse_name_only(&out))
    }
}

impl ChangeSource for GitCli {
    fn is_repository(&self) -> bool {
        self.run(&["rev-parse", "--git-dir"]).is_ok()
    }

    fn staged(&self) -> Result<Vec<PathBuf>, VcsError> {
        self.changed(&[
            "diff",
            "--staged",
            "--name-only",
            "--relative",
            "--diff-filter=AM",
        ])
    }

    fn unstaged(&self) -> Result<Vec<PathBuf>, VcsError> {
        self.changed(&["diff", "--name-only", "--relative", "--diff-filter=AM"])
    }

    fn diff_against(&self, base: &str) -> Result<Vec<PathBuf>, VcsError> {
        if base.starts_with('-') {
            return Err(VcsError::Failed {
                command: format!("git diff {base}"),
                stderr: "revision must not start with '-'".to_string(),
            });
        }
        self.changed(&["diff", base, "--name-only", "--relative", "--diff-filter=AM"])
    }
}

/// Parses `--name-only` output into paths, dropping blank lines.
fn parse_name_only(output: &str) -> Vec<PathBuf> {
    output
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(PathBuf::from)
        .collect()
}
