//! Configuration file resolution with global fallback.
//!
//! Resolves the configuration file using a fixed priority order:
//!
//! 1. `--config` flag (explicit path)
//! 2. `{project}/guidelines.toml` or `.guidelines.toml`
//! 3. `$GUIDELINE_LINT_CONFIG_DIR/config.toml` or `~/.guideline-lint/config.toml`
//! 4. No config found → defaults

use anyhow::{Context, Result};
use guideline_lint_core::Config;
use std::path::{Path, PathBuf};

/// Where the configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config`.
    Explicit(PathBuf),
    /// Found in the project directory.
    Project(PathBuf),
    /// Found in the global config directory.
    Global(PathBuf),
    /// Nothing found; built-in defaults apply.
    Default,
}

impl ConfigSource {
    /// Returns the resolved path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Loads the configuration this source points at.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or is not valid TOML. A missing
    /// explicit file is an error rather than a silent fallback.
    pub fn load(&self) -> Result<Config> {
        let Some(path) = self.path() else {
            tracing::debug!("No config file found, using defaults");
            return Ok(Config::default());
        };

        if matches!(self, Self::Global(_)) {
            tracing::info!("Using global config: {}", path.display());
        }
        Config::from_file(path).with_context(|| format!("Failed to load config: {}", path.display()))
    }
}

/// Project-level config file names, checked in order.
const PROJECT_CONFIG_NAMES: &[&str] = &["guidelines.toml", ".guidelines.toml"];

/// Config file name within the global config directory.
const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Environment variable overriding the global config directory.
const CONFIG_DIR_ENV: &str = "GUIDELINE_LINT_CONFIG_DIR";

/// Resolves the configuration source for `project_dir`.
#[must_use]
pub fn resolve(project_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
    resolve_with_global(project_dir, explicit, global_config_dir())
}

/// Takes `global_dir` as a parameter so tests need not touch the environment.
fn resolve_with_global(
    project_dir: &Path,
    explicit: Option<&Path>,
    global_dir: Option<PathBuf>,
) -> ConfigSource {
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    let project = PROJECT_CONFIG_NAMES
        .iter()
        .map(|name| project_dir.join(name))
        .find(|candidate| candidate.is_file());
    if let Some(candidate) = project {
        tracing::debug!("Found project config: {}", candidate.display());
        return ConfigSource::Project(candidate);
    }

    global_dir
        .map(|dir| dir.join(GLOBAL_CONFIG_NAME))
        .filter(|candidate| candidate.is_file())
        .map_or(ConfigSource::Default, |candidate| {
            tracing::debug!("Found global config: {}", candidate.display());
            ConfigSource::Global(candidate)
        })
}

/// `$GUIDELINE_LINT_CONFIG_DIR`, else `~/.guideline-lint/`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
        return Some(PathBuf::from(dir));
    }
    home::home_dir().map(|h| h.join(".guideline-lint"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn explicit_wins_even_when_project_config_exists() {
        let tmp = TempDir::new().unwrap();
        let explicit = tmp.path().join("custom.toml");
        fs::write(&explicit, "").unwrap();
        fs::write(tmp.path().join("guidelines.toml"), "").unwrap();

        let result = resolve_with_global(tmp.path(), Some(&explicit), None);
        assert_eq!(result, ConfigSource::Explicit(explicit));
    }

    #[test]
    fn missing_explicit_file_fails_to_load() {
        let source = resolve_with_global(Path::new("/tmp"), Some(Path::new("/nonexistent.toml")), None);
        assert_eq!(source, ConfigSource::Explicit(PathBuf::from("/nonexistent.toml")));

        let err = source.load().unwrap_err();
        assert!(err.to_string().contains("/nonexistent.toml"));
    }

    #[test]
    fn plain_name_preferred_over_dot_prefix() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".guidelines.toml"), "").unwrap();

        let dotted = resolve_with_global(tmp.path(), None, None);
        assert_eq!(dotted, ConfigSource::Project(tmp.path().join(".guidelines.toml")));

        fs::write(tmp.path().join("guidelines.toml"), "").unwrap();
        let plain = resolve_with_global(tmp.path(), None, None);
        assert_eq!(plain, ConfigSource::Project(tmp.path().join("guidelines.toml")));
    }

    #[test]
    fn global_used_only_without_project_config() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        fs::write(global.path().join("config.toml"), "").unwrap();

        let result = resolve_with_global(project.path(), None, Some(global.path().to_path_buf()));
        assert_eq!(result, ConfigSource::Global(global.path().join("config.toml")));

        fs::write(project.path().join("guidelines.toml"), "").unwrap();
        let result = resolve_with_global(project.path(), None, Some(global.path().to_path_buf()));
        assert!(matches!(result, ConfigSource::Project(_)));
    }

    #[test]
    fn empty_global_dir_means_defaults() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();

        let result = resolve_with_global(project.path(), None, Some(global.path().to_path_buf()));
        assert_eq!(result, ConfigSource::Default);
        assert!(result.path().is_none());
    }

    #[test]
    fn loads_rule_and_selector_settings() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("guidelines.toml");
        fs::write(
            &path,
            "[selector]\nscan_roots = [\"apps\"]\n\n[rules.interface-naming]\nenabled = false\n",
        )
        .unwrap();

        let config = ConfigSource::Project(path).load().unwrap();
        assert_eq!(config.selector.scan_roots, vec![PathBuf::from("apps")]);
        assert!(!config.is_rule_enabled("interface-naming"));
        assert!(config.is_rule_enabled("file-naming"));
    }

    #[test]
    fn invalid_toml_is_reported() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("guidelines.toml");
        fs::write(&path, "[selector\n").unwrap();

        let err = ConfigSource::Project(path).load().unwrap_err();
        assert!(err.to_string().starts_with("Failed to load config"));
    }

    #[test]
    fn default_source_loads_defaults() {
        let config = ConfigSource::Default.load().unwrap();
        assert_eq!(config.selector.project_marker, "package.json");
    }
}
