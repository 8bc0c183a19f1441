use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Upper bound on the number of qualifying commits recorded in a graph.
///
/// A count of zero means "no limit", which is how `--max-commits 0` has
/// always behaved.
///
/// # Examples
///
/// ```
/// use gitdeps_core::CommitLimit;
///
/// assert_eq!(CommitLimit::from_count(0), CommitLimit::Unbounded);
/// assert!(CommitLimit::from_count(3).is_reached(3));
/// assert!(!CommitLimit::Unbounded.is_reached(usize::MAX));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CommitLimit {
    /// Walk the whole history.
    #[default]
    Unbounded,
    /// Stop after this many commits have been recorded.
    AtMost(NonZeroUsize),
}

impl CommitLimit {
    /// Build a limit from a raw count; `0` maps to [`CommitLimit::Unbounded`].
    pub fn from_count(count: usize) -> Self {
        NonZeroUsize::new(count).map_or(Self::Unbounded, Self::AtMost)
    }

    /// Returns `true` once `processed` commits exhaust the limit.
    pub fn is_reached(self, processed: usize) -> bool {
        match self {
            Self::Unbounded => false,
            Self::AtMost(max) => processed >= max.get(),
        }
    }

    /// The configured maximum, if any.
    pub fn get(self) -> Option<usize> {
        match self {
            Self::Unbounded => None,
            Self::AtMost(max) => Some(max.get()),
        }
    }
}

impl fmt::Display for CommitLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommitLimit::Unbounded => write!(f, "unbounded"),
            CommitLimit::AtMost(max) => write!(f, "{max}"),
        }
    }
}

/// Output format for a rendered dependency graph.
///
/// # Examples
///
/// ```
/// use gitdeps_core::DiagramFormat;
///
/// let fmt: DiagramFormat = "json".parse().unwrap();
/// assert_eq!(fmt, DiagramFormat::Json);
///
/// let fmt: DiagramFormat = "md".parse().unwrap();
/// assert_eq!(fmt, DiagramFormat::Markdown);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramFormat {
    /// Plain Mermaid flowchart text.
    #[default]
    Mermaid,
    /// Mermaid text inside a fenced Markdown code block.
    Markdown,
    /// Machine-readable JSON listing each commit and its files.
    Json,
}

impl fmt::Display for DiagramFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagramFormat::Mermaid => write!(f, "mermaid"),
            DiagramFormat::Markdown => write!(f, "markdown"),
            DiagramFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for DiagramFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mermaid" | "mmd" => Ok(DiagramFormat::Mermaid),
            "markdown" | "md" => Ok(DiagramFormat::Markdown),
            "json" => Ok(DiagramFormat::Json),
            other => Err(format!("unknown diagram format: {other}")),
        }
    }
}
