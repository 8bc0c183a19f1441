//! Text renderings of a commit → file dependency graph.
//!
//! The primary output is a Mermaid flowchart; Markdown and JSON wrap the
//! same edges for other consumers.

pub mod output;

pub use output::{format_json, format_markdown, format_mermaid, DiagramRenderer, MERMAID_HEADER};
