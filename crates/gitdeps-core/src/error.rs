use std::path::PathBuf;

/// Errors that can occur while building or rendering a dependency graph.
///
/// Library crates return this type directly; the binary converts it into a
/// `miette` report at the boundary and picks the exit code there.
///
/// # Examples
///
/// ```
/// use gitdeps_core::GitDepsError;
///
/// let err = GitDepsError::InvalidDate {
///     value: "01-01-2023".into(),
/// };
/// assert!(err.to_string().contains("01-01-2023"));
/// ```
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum GitDepsError {
    /// The path exists but is not a git repository.
    #[error("{} is not a git repository: {reason}", .path.display())]
    #[diagnostic(
        code(gitdeps::invalid_repository),
        help("pass --repo pointing at the root of a git working tree")
    )]
    InvalidRepository {
        /// Path that failed to open.
        path: PathBuf,
        /// Reason reported by git.
        reason: String,
    },

    /// The cutoff date does not match `YYYY-MM-DD`.
    #[error("invalid date format {value}, expected YYYY-MM-DD")]
    #[diagnostic(code(gitdeps::invalid_date), help("for example: --before-date 2023-01-01"))]
    InvalidDate {
        /// The rejected input.
        value: String,
    },

    /// The repository path does not exist on disk.
    #[error("path {} does not exist", .0.display())]
    #[diagnostic(
        code(gitdeps::missing_path),
        help("make sure the repository was cloned")
    )]
    MissingPath(PathBuf),

    /// Walking history or diffing a commit failed.
    #[error("git error: {0}")]
    #[diagnostic(code(gitdeps::git))]
    Git(String),

    /// Filesystem or output stream failure.
    #[error("IO error: {0}")]
    #[diagnostic(code(gitdeps::io))]
    Io(#[from] std::io::Error),

    /// JSON serialization failure.
    #[error("serialization error: {0}")]
    #[diagnostic(code(gitdeps::serialization))]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    #[diagnostic(code(gitdeps::toml))]
    Toml(#[from] toml::de::Error),
}
