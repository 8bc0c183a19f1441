//! Git history access via git2.
//!
//! Opens a repository, walks commits from `HEAD` newest first and lists the
//! paths each commit changed relative to its first parent.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use git2::{DiffOptions, Oid, Repository, Sort};
use gitdeps_core::GitDepsError;

use crate::source::{CommitHeader, CommitRecord, Headers, HistorySource};

/// A git repository opened for history walking.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use gitdeps_history::{GitHistory, HistorySource};
///
/// let history = GitHistory::open(Path::new(".")).unwrap();
/// for header in history.headers().unwrap() {
///     let header = header.unwrap();
///     println!("{} {}", &header.id[..7], header.timestamp);
/// }
/// ```
pub struct GitHistory {
    repo: Repository,
    path: PathBuf,
}

impl GitHistory {
    /// Open the repository rooted at `path`.
    ///
    /// Parent directories are not searched: `path` itself must be the
    /// working tree (or the `.git` directory) of a repository.
    ///
    /// # Errors
    ///
    /// Returns [`GitDepsError::InvalidRepository`] if `path` is not a repository.
    pub fn open(path: &Path) -> Result<Self, GitDepsError> {
        let repo = Repository::open(path).map_err(|e| GitDepsError::InvalidRepository {
            path: path.to_path_buf(),
            reason: e.message().to_string(),
        })?;
        Ok(Self {
            repo,
            path: path.to_path_buf(),
        })
    }

    /// Path the repository was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn changed_files(&self, commit: &git2::Commit) -> Result<Vec<String>, GitDepsError> {
        let commit_tree = commit
            .tree()
            .map_err(|e| GitDepsError::Git(format!("failed to get commit tree: {e}")))?;

        let parent_tree = if commit.parent_count() > 0 {
            let parent = commit
                .parent(0)
                .map_err(|e| GitDepsError::Git(format!("failed to get parent: {e}")))?;
            Some(
                parent
                    .tree()
                    .map_err(|e| GitDepsError::Git(format!("failed to get parent tree: {e}")))?,
            )
        } else {
            None
        };

        // No rename detection: a rename shows up as the old and the new path.
        let mut diff_opts = DiffOptions::new();
        let diff = self
            .repo
            .diff_tree_to_tree(
                parent_tree.as_ref(),
                Some(&commit_tree),
                Some(&mut diff_opts),
            )
            .map_err(|e| GitDepsError::Git(format!("failed to compute diff: {e}")))?;

        let mut seen = HashSet::new();
        let mut files = Vec::with_capacity(diff.deltas().len());
        for delta in diff.deltas() {
            // Deleted files only carry a meaningful old path
            let path = delta
                .new_file()
                .path()
                .or_else(|| delta.old_file().path());
            let Some(path) = path else {
                continue;
            };
            let path = path.to_string_lossy().to_string();
            if seen.insert(path.clone()) {
                files.push(path);
            }
        }

        Ok(files)
    }
}

impl HistorySource for GitHistory {
    fn headers(&self) -> Result<Headers<'_>, GitDepsError> {
        let is_empty = self
            .repo
            .is_empty()
            .map_err(|e| GitDepsError::Git(format!("failed to read HEAD: {e}")))?;
        if is_empty {
            return Ok(Box::new(std::iter::empty()));
        }

        let mut revwalk = self
            .repo
            .revwalk()
            .map_err(|e| GitDepsError::Git(format!("failed to create revwalk: {e}")))?;

        revwalk
            .set_sorting(Sort::TIME)
            .map_err(|e| GitDepsError::Git(format!("failed to sort revwalk: {e}")))?;

        revwalk
            .push_head()
            .map_err(|e| GitDepsError::Git(format!("failed to push HEAD: {e}")))?;

        Ok(Box::new(revwalk.map(move |oid_result| {
            let oid = oid_result.map_err(|e| GitDepsError::Git(format!("revwalk error: {e}")))?;
            let commit = self
                .repo
                .find_commit(oid)
                .map_err(|e| GitDepsError::Git(format!("failed to find commit: {e}")))?;
            Ok(CommitHeader {
                id: oid.to_string(),
                timestamp: commit.time().seconds(),
            })
        })))
    }

    fn load(&self, header: CommitHeader) -> Result<CommitRecord, GitDepsError> {
        let oid = Oid::from_str(&header.id)
            .map_err(|e| GitDepsError::Git(format!("invalid commit id {}: {e}", header.id)))?;
        let commit = self
            .repo
            .find_commit(oid)
            .map_err(|e| GitDepsError::Git(format!("failed to find commit: {e}")))?;
        let files = self.changed_files(&commit)?;

        Ok(CommitRecord {
            id: header.id,
            timestamp: header.timestamp,
            files,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use git2::{Signature, Time};

    fn commit_files(
        repo: &Repository,
        dir: &Path,
        files: &[&str],
        timestamp: i64,
    ) -> Oid {
        let mut index = repo.index().unwrap();
        for file in files {
            std::fs::write(dir.join(file), format!("contents of {file}\n")).unwrap();
            index.add_path(Path::new(file)).unwrap();
        }
        index.write().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
        let sig = Signature::new("Test User", "test@example.com", &Time::new(timestamp, 0)).unwrap();
        let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, "change", &tree, &parents)
            .unwrap()
    }

    #[test]
    fn open_rejects_plain_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = GitHistory::open(dir.path()).err().unwrap();
        assert!(matches!(err, GitDepsError::InvalidRepository { .. }));
    }

    #[test]
    fn empty_repository_has_no_commits() {
        let dir = tempfile::tempdir().unwrap();
        Repository::init(dir.path()).unwrap();
        let history = GitHistory::open(dir.path()).unwrap();
        assert_eq!(history.headers().unwrap().count(), 0);
        assert_eq!(history.path(), dir.path());
    }

    #[test]
    fn headers_are_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let first = commit_files(&repo, dir.path(), &["a.txt"], 1_000_000);
        let second = commit_files(&repo, dir.path(), &["b.txt"], 2_000_000);

        let history = GitHistory::open(dir.path()).unwrap();
        let headers: Vec<CommitHeader> = history
            .headers()
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(headers.len(), 2);
        assert_eq!(headers[0].id, second.to_string());
        assert_eq!(headers[0].timestamp, 2_000_000);
        assert_eq!(headers[1].id, first.to_string());
    }

    #[test]
    fn root_commit_lists_every_added_file() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        commit_files(&repo, dir.path(), &["b.txt", "a.txt"], 1_000_000);

        let history = GitHistory::open(dir.path()).unwrap();
        let header = history.headers().unwrap().next().unwrap().unwrap();
        let record = history.load(header).unwrap();
        assert_eq!(record.files, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn later_commit_lists_only_its_own_changes() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        commit_files(&repo, dir.path(), &["a.txt"], 1_000_000);
        commit_files(&repo, dir.path(), &["c.txt"], 2_000_000);

        let history = GitHistory::open(dir.path()).unwrap();
        let header = history.headers().unwrap().next().unwrap().unwrap();
        let record = history.load(header).unwrap();
        assert_eq!(record.files, vec!["c.txt"]);
    }

    #[test]
    fn load_rejects_malformed_id() {
        let dir = tempfile::tempdir().unwrap();
        Repository::init(dir.path()).unwrap();
        let history = GitHistory::open(dir.path()).unwrap();
        let err = history
            .load(CommitHeader {
                id: "not-hex".into(),
                timestamp: 0,
            })
            .unwrap_err();
        assert!(matches!(err, GitDepsError::Git(_)));
    }
}
