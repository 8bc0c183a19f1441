//! Core types, configuration, and error handling for gitdeps.
//!
//! This crate provides the shared foundation used by the other gitdeps crates:
//! - [`GitDepsError`]: unified error type using `thiserror` and `miette`
//! - [`GitDepsConfig`]: configuration loaded from `.gitdeps.toml`
//! - Shared types: [`CommitLimit`], [`DiagramFormat`]

mod config;
mod error;
mod types;

pub use config::{GitDepsConfig, GraphConfig, OutputConfig};
pub use error::GitDepsError;
pub use types::{CommitLimit, DiagramFormat};

/// A convenience `Result` type for gitdeps operations.
pub type Result<T> = std::result::Result<T, GitDepsError>;
