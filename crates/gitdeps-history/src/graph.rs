//! Commit → file dependency graph construction.
//!
//! [`GraphBuilder`] walks a [`HistorySource`] newest first, skips commits
//! made after the cutoff, and records the changed files of the rest until
//! the [`CommitLimit`] is exhausted.

use std::collections::HashSet;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use gitdeps_core::{CommitLimit, GitDepsError};
use serde::Serialize;

use crate::git::GitHistory;
use crate::source::HistorySource;

/// Number of id characters shown in progress lines.
const SHORT_ID_LEN: usize = 7;

/// One commit and the files it touched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEntry {
    /// Full commit id.
    pub id: String,
    /// Changed paths in the order the commit reported them.
    pub files: Vec<String>,
}

/// Commits mapped to the files they changed, in insertion order.
///
/// Each commit id appears at most once and entries are never changed after
/// insertion.
///
/// # Examples
///
/// ```
/// use gitdeps_history::DependencyGraph;
///
/// let mut graph = DependencyGraph::default();
/// assert!(graph.insert("deadbee".into(), vec!["x.txt".into()]));
/// assert!(!graph.insert("deadbee".into(), vec!["y.txt".into()]));
/// assert_eq!(graph.files("deadbee"), Some(&["x.txt".to_string()][..]));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DependencyGraph {
    commits: Vec<GraphEntry>,
    #[serde(skip)]
    ids: HashSet<String>,
}

impl DependencyGraph {
    /// Record `files` for `id`. Returns `false` and leaves the graph untouched
    /// if `id` is already present.
    pub fn insert(&mut self, id: String, files: Vec<String>) -> bool {
        if !self.ids.insert(id.clone()) {
            return false;
        }
        self.commits.push(GraphEntry { id, files });
        true
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[GraphEntry] {
        &self.commits
    }

    /// Files recorded for `id`, if present.
    pub fn files(&self, id: &str) -> Option<&[String]> {
        self.commits
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.files.as_slice())
    }

    /// Number of commits in the graph.
    pub fn len(&self) -> usize {
        self.commits.len()
    }

    /// Returns `true` if no commit was recorded.
    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    /// Total number of commit → file edges.
    pub fn edge_count(&self) -> usize {
        self.commits.iter().map(|e| e.files.len()).sum()
    }
}

/// Parse a `YYYY-MM-DD` date into the start of that day.
///
/// # Errors
///
/// Returns [`GitDepsError::InvalidDate`] if `date` does not match the pattern.
///
/// # Examples
///
/// ```
/// use gitdeps_history::parse_cutoff;
///
/// let cutoff = parse_cutoff("2023-01-01").unwrap();
/// assert_eq!(cutoff.to_string(), "2023-01-01 00:00:00");
/// assert!(parse_cutoff("01-01-2023").is_err());
/// ```
pub fn parse_cutoff(date: &str) -> Result<NaiveDateTime, GitDepsError> {
    let day = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
        GitDepsError::InvalidDate {
            value: date.to_string(),
        }
    })?;
    Ok(day.and_time(NaiveTime::MIN))
}

/// Builds a [`DependencyGraph`] from a commit history.
///
/// Commit times are compared against the cutoff as wall-clock times in the
/// builder's time zone, which is the local zone unless replaced with
/// [`GraphBuilder::with_timezone`].
///
/// # Examples
///
/// ```
/// use gitdeps_core::CommitLimit;
/// use gitdeps_history::{parse_cutoff, CommitRecord, GraphBuilder, MemoryHistory};
///
/// let history = MemoryHistory::new(vec![CommitRecord {
///     id: "deadbee".into(),
///     timestamp: 1_640_995_200, // 2022-01-01T00:00:00Z
///     files: vec!["x.txt".into()],
/// }]);
/// let builder = GraphBuilder::new(history, parse_cutoff("2023-01-01").unwrap())
///     .with_timezone(chrono::Utc);
///
/// let mut progress = Vec::new();
/// let graph = builder.build(CommitLimit::Unbounded, &mut progress).unwrap();
/// assert_eq!(graph.len(), 1);
/// assert_eq!(
///     String::from_utf8(progress).unwrap(),
///     "Processed commit deadbee (2022-01-01)\n"
/// );
/// ```
pub struct GraphBuilder<S, Tz: TimeZone = Local> {
    source: S,
    cutoff: NaiveDateTime,
    tz: Tz,
}

impl GraphBuilder<GitHistory> {
    /// Open the repository at `repo_path` and parse `before_date`.
    ///
    /// # Errors
    ///
    /// Returns [`GitDepsError::InvalidRepository`] if `repo_path` is not a
    /// repository, or [`GitDepsError::InvalidDate`] if `before_date` is not
    /// `YYYY-MM-DD`.
    pub fn open(repo_path: &Path, before_date: &str) -> Result<Self, GitDepsError> {
        let source = GitHistory::open(repo_path)?;
        let cutoff = parse_cutoff(before_date)?;
        Ok(Self::new(source, cutoff))
    }
}

impl<S: HistorySource> GraphBuilder<S> {
    /// Build over `source`, keeping commits made at or before `cutoff`
    /// local time.
    pub fn new(source: S, cutoff: NaiveDateTime) -> Self {
        Self {
            source,
            cutoff,
            tz: Local,
        }
    }
}

impl<S: HistorySource, Tz: TimeZone> GraphBuilder<S, Tz> {
    /// Compare commit times in `tz` instead.
    pub fn with_timezone<Tz2: TimeZone>(self, tz: Tz2) -> GraphBuilder<S, Tz2> {
        GraphBuilder {
            source: self.source,
            cutoff: self.cutoff,
            tz,
        }
    }

    /// Walk the history and collect the graph.
    ///
    /// Writes one `Processed commit` line to `progress` per recorded commit
    /// and a final line when `limit` stops the walk.
    ///
    /// # Errors
    ///
    /// Returns [`GitDepsError::Git`] if the history cannot be walked, or
    /// [`GitDepsError::Io`] if `progress` cannot be written.
    pub fn build<W: Write + ?Sized>(
        &self,
        limit: CommitLimit,
        progress: &mut W,
    ) -> Result<DependencyGraph, GitDepsError> {
        let mut graph = DependencyGraph::default();
        let mut processed = 0usize;

        for header in self.source.headers()? {
            let header = header?;
            let committed_at = self.wall_clock(header.timestamp)?;
            if committed_at > self.cutoff {
                continue;
            }

            let record = self.source.load(header)?;
            let short_id: String = record.id.chars().take(SHORT_ID_LEN).collect();
            if !graph.insert(record.id, record.files) {
                continue;
            }
            processed += 1;

            writeln!(
                progress,
                "Processed commit {short_id} ({})",
                committed_at.format("%Y-%m-%d")
            )?;

            if limit.is_reached(processed) {
                writeln!(progress, "Reached the limit of {processed} commits.")?;
                break;
            }
        }

        Ok(graph)
    }

    fn wall_clock(&self, timestamp: i64) -> Result<NaiveDateTime, GitDepsError> {
        let utc = DateTime::from_timestamp(timestamp, 0).ok_or_else(|| {
            GitDepsError::Git(format!("commit timestamp out of range: {timestamp}"))
        })?;
        Ok(utc.with_timezone(&self.tz).naive_local())
    }
}
