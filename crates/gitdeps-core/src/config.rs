use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::GitDepsError;
use crate::types::{CommitLimit, DiagramFormat};

/// Top-level configuration loaded from `.gitdeps.toml`.
///
/// Supports layered resolution: CLI flags > local config > defaults.
///
/// # Examples
///
/// ```
/// use gitdeps_core::GitDepsConfig;
///
/// let config = GitDepsConfig::default();
/// assert_eq!(config.graph.repo, "Hello-World");
/// assert_eq!(config.graph.max_commits, 100);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GitDepsConfig {
    /// History walk settings.
    #[serde(default)]
    pub graph: GraphConfig,
    /// Rendering settings.
    #[serde(default)]
    pub output: OutputConfig,
}

impl GitDepsConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`GitDepsError::Io`] if the file cannot be read, or
    /// [`GitDepsError::Toml`] if the content is not valid TOML.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use gitdeps_core::GitDepsConfig;
    /// use std::path::Path;
    ///
    /// let config = GitDepsConfig::from_file(Path::new(".gitdeps.toml")).unwrap();
    /// ```
    pub fn from_file(path: &Path) -> Result<Self, GitDepsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`GitDepsError::Toml`] if parsing fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use gitdeps_core::GitDepsConfig;
    ///
    /// let toml = r#"
    /// [graph]
    /// max_commits = 10
    /// "#;
    /// let config = GitDepsConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.graph.max_commits, 10);
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, GitDepsError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }
}

/// Which history to read and how much of it.
///
/// # Examples
///
/// ```
/// use gitdeps_core::{CommitLimit, GraphConfig};
///
/// let config = GraphConfig::default();
/// assert_eq!(config.before_date, "2023-01-01");
/// assert_eq!(config.limit(), CommitLimit::from_count(100));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GraphConfig {
    /// Repository path (default: `"Hello-World"`).
    #[serde(default = "default_repo")]
    pub repo: String,
    /// Inclusive cutoff date, `YYYY-MM-DD` (default: `"2023-01-01"`).
    #[serde(default = "default_before_date")]
    pub before_date: String,
    /// Maximum commits to record; `0` disables the limit (default: 100).
    #[serde(default = "default_max_commits")]
    pub max_commits: usize,
}

impl GraphConfig {
    /// The commit cap as a [`CommitLimit`].
    pub fn limit(&self) -> CommitLimit {
        CommitLimit::from_count(self.max_commits)
    }
}

fn default_repo() -> String {
    "Hello-World".into()
}

fn default_before_date() -> String {
    "2023-01-01".into()
}

fn default_max_commits() -> usize {
    100
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            repo: default_repo(),
            before_date: default_before_date(),
            max_commits: default_max_commits(),
        }
    }
}

/// Rendering configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Diagram format (default: mermaid).
    #[serde(default)]
    pub format: DiagramFormat,
    /// Write the diagram here instead of stdout.
    pub path: Option<PathBuf>,
}
