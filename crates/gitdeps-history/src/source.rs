//! The history collaborator: anything that can list commits newest first.

use gitdeps_core::GitDepsError;

/// Identity and time of a commit, as yielded by a history walk.
///
/// # Examples
///
/// ```
/// use gitdeps_history::CommitHeader;
///
/// let header = CommitHeader {
///     id: "3f786850e387550fdab836ed7e6dc881de23001b".into(),
///     timestamp: 1_656_633_600,
/// };
/// assert_eq!(header.timestamp, 1_656_633_600);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitHeader {
    /// Full commit id.
    pub id: String,
    /// Commit time in seconds since the Unix epoch.
    pub timestamp: i64,
}

/// A commit together with the paths it changed.
///
/// # Examples
///
/// ```
/// use gitdeps_history::CommitRecord;
///
/// let record = CommitRecord {
///     id: "deadbee".into(),
///     timestamp: 1_640_995_200,
///     files: vec!["x.txt".into(), "y.txt".into()],
/// };
/// assert_eq!(record.files.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    /// Full commit id.
    pub id: String,
    /// Commit time in seconds since the Unix epoch.
    pub timestamp: i64,
    /// Changed paths relative to the repository root, each listed once.
    pub files: Vec<String>,
}

impl CommitRecord {
    /// The header part of this record.
    pub fn header(&self) -> CommitHeader {
        CommitHeader {
            id: self.id.clone(),
            timestamp: self.timestamp,
        }
    }
}

/// Boxed iterator over commit headers, borrowed from a source.
pub type Headers<'a> = Box<dyn Iterator<Item = Result<CommitHeader, GitDepsError>> + 'a>;

/// A commit history that can be walked newest first.
///
/// Headers are cheap; the changed-file list is only produced by
/// [`HistorySource::load`] so a walk pays for diffs of the commits it keeps.
pub trait HistorySource {
    /// Walk the history. Implementations must yield headers in reverse
    /// chronological order (newest first).
    ///
    /// # Errors
    ///
    /// Returns [`GitDepsError::Git`] if the walk cannot start; individual
    /// items carry errors hit mid-walk.
    fn headers(&self) -> Result<Headers<'_>, GitDepsError>;

    /// Resolve the changed files for a commit yielded by [`HistorySource::headers`].
    ///
    /// # Errors
    ///
    /// Returns [`GitDepsError::Git`] if the commit is unknown or cannot be diffed.
    fn load(&self, header: CommitHeader) -> Result<CommitRecord, GitDepsError>;
}

impl<S: HistorySource + ?Sized> HistorySource for &S {
    fn headers(&self) -> Result<Headers<'_>, GitDepsError> {
        (**self).headers()
    }

    fn load(&self, header: CommitHeader) -> Result<CommitRecord, GitDepsError> {
        (**self).load(header)
    }
}

/// An in-memory history, ordered newest first on construction.
///
/// # Examples
///
/// ```
/// use gitdeps_history::{CommitRecord, HistorySource, MemoryHistory};
///
/// let history = MemoryHistory::new(vec![
///     CommitRecord { id: "old".into(), timestamp: 10, files: vec![] },
///     CommitRecord { id: "new".into(), timestamp: 20, files: vec![] },
/// ]);
/// let first = history.headers().unwrap().next().unwrap().unwrap();
/// assert_eq!(first.id, "new");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryHistory {
    records: Vec<CommitRecord>,
}

impl MemoryHistory {
    /// Build a history from records in any order. Records sharing a
    /// timestamp keep their relative order.
    pub fn new(mut records: Vec<CommitRecord>) -> Self {
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Self { records }
    }

    /// Returns `true` if the history has no commits.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl HistorySource for MemoryHistory {
    fn headers(&self) -> Result<Headers<'_>, GitDepsError> {
        Ok(Box::new(
            self.records
                .iter()
                .map(|r| Ok::<_, GitDepsError>(r.header())),
        ))
    }

    fn load(&self, header: CommitHeader) -> Result<CommitRecord, GitDepsError> {
        self.records
            .iter()
            .find(|r| r.id == header.id)
            .cloned()
            .ok_or_else(|| GitDepsError::Git(format!("unknown commit {}", header.id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, timestamp: i64) -> CommitRecord {
        CommitRecord {
            id: id.into(),
            timestamp,
            files: vec![format!("{id}.txt")],
        }
    }

    #[test]
    fn memory_history_yields_newest_first() {
        let history = MemoryHistory::new(vec![
            record("b", 200),
            record("a", 100),
            record("c", 300),
        ]);
        let ids: Vec<String> = history
            .headers()
            .unwrap()
            .map(|h| h.unwrap().id)
            .collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[test]
    fn equal_timestamps_keep_input_order() {
        let history = MemoryHistory::new(vec![record("first", 5), record("second", 5)]);
        let ids: Vec<String> = history
            .headers()
            .unwrap()
            .map(|h| h.unwrap().id)
            .collect();
        assert_eq!(ids, vec!["first", "second"]);
    }

    #[test]
    fn load_returns_files_for_known_commit() {
        let history = MemoryHistory::new(vec![record("a", 1)]);
        let loaded = history
            .load(CommitHeader {
                id: "a".into(),
                timestamp: 1,
            })
            .unwrap();
        assert_eq!(loaded.files, vec!["a.txt"]);
    }

    #[test]
    fn load_unknown_commit_is_git_error() {
        let history = MemoryHistory::default();
        let err = history
            .load(CommitHeader {
                id: "nope".into(),
                timestamp: 0,
            })
            .unwrap_err();
        assert!(matches!(err, GitDepsError::Git(_)));
        assert!(history.is_empty());
    }
}
