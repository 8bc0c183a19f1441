//! Commit history walking and commit → file graph construction.
//!
//! Walks a repository's history newest first, keeps the commits made on or
//! before a cutoff date, and records which files each of them touched.

pub mod git;
pub mod graph;
pub mod source;

pub use git::GitHistory;
pub use graph::{parse_cutoff, DependencyGraph, GraphBuilder, GraphEntry};
pub use source::{CommitHeader, CommitRecord, Headers, HistorySource, MemoryHistory};
