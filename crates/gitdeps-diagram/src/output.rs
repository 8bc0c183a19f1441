use std::fmt::Write;

use gitdeps_core::{DiagramFormat, GitDepsError};
use gitdeps_history::DependencyGraph;

/// First line of every Mermaid rendering.
pub const MERMAID_HEADER: &str = "graph TD";

/// Renders a [`DependencyGraph`] in a chosen [`DiagramFormat`].
///
/// # Examples
///
/// ```
/// use gitdeps_core::DiagramFormat;
/// use gitdeps_diagram::DiagramRenderer;
/// use gitdeps_history::DependencyGraph;
///
/// let renderer = DiagramRenderer::new(DiagramFormat::Mermaid);
/// let text = renderer.render(&DependencyGraph::default()).unwrap();
/// assert_eq!(text, "graph TD");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DiagramRenderer {
    format: DiagramFormat,
}

impl DiagramRenderer {
    /// A renderer producing `format`.
    pub fn new(format: DiagramFormat) -> Self {
        Self { format }
    }

    /// The format this renderer produces.
    pub fn format(&self) -> DiagramFormat {
        self.format
    }

    /// Render `graph`.
    ///
    /// # Errors
    ///
    /// Returns [`GitDepsError::Serialization`] if JSON output fails.
    pub fn render(&self, graph: &DependencyGraph) -> Result<String, GitDepsError> {
        match self.format {
            DiagramFormat::Mermaid => Ok(format_mermaid(graph)),
            DiagramFormat::Markdown => Ok(format_markdown(graph)),
            DiagramFormat::Json => format_json(graph),
        }
    }
}

/// Generate Mermaid flowchart text with one edge per commit → file pair.
///
/// Commits appear in graph order and files in the order recorded for each
/// commit. Ids and paths are quoted but not escaped, so a `"` inside a path
/// produces invalid Mermaid. Lines are joined with `\n` and there is no
/// trailing newline.
///
/// # Examples
///
/// ```
/// use gitdeps_diagram::format_mermaid;
/// use gitdeps_history::DependencyGraph;
///
/// let mut graph = DependencyGraph::default();
/// graph.insert("deadbee".into(), vec!["x.txt".into(), "y.txt".into()]);
///
/// assert_eq!(
///     format_mermaid(&graph),
///     "graph TD\n\"deadbee\" --> \"x.txt\"\n\"deadbee\" --> \"y.txt\""
/// );
/// ```
pub fn format_mermaid(graph: &DependencyGraph) -> String {
    let mut out = String::from(MERMAID_HEADER);
    for entry in graph.entries() {
        for file in &entry.files {
            let _ = write!(out, "\n\"{}\" --> \"{file}\"", entry.id);
        }
    }
    out
}

/// Generate the Mermaid text inside a fenced `mermaid` code block. Like
/// [`format_mermaid`], the result has no trailing newline.
///
/// # Examples
///
/// ```
/// use gitdeps_diagram::format_markdown;
/// use gitdeps_history::DependencyGraph;
///
/// let md = format_markdown(&DependencyGraph::default());
/// assert_eq!(md, "```mermaid\ngraph TD\n```");
/// ```
pub fn format_markdown(graph: &DependencyGraph) -> String {
    let mut out = String::from("```mermaid\n");
    out.push_str(&format_mermaid(graph));
    out.push_str("\n```");
    out
}

/// Generate JSON listing each commit with its files.
///
/// # Errors
///
/// Returns [`GitDepsError::Serialization`] if serialization fails.
///
/// # Examples
///
/// ```
/// use gitdeps_diagram::format_json;
/// use gitdeps_history::DependencyGraph;
///
/// let json = format_json(&DependencyGraph::default()).unwrap();
/// assert!(json.contains("\"commits\": []"));
/// ```
pub fn format_json(graph: &DependencyGraph) -> Result<String, GitDepsError> {
    serde_json::to_string_pretty(graph).map_err(GitDepsError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(entries: &[(&str, Vec<&str>)]) -> DependencyGraph {
        let mut graph = DependencyGraph::default();
        for (id, files) in entries {
            graph.insert(
                (*id).to_string(),
                files.iter().map(|f| (*f).to_string()).collect(),
            );
        }
        graph
    }

    #[test]
    fn mermaid_single_commit_two_files() {
        let g = graph(&[("deadbee", vec!["x.txt", "y.txt"])]);
        let lines: Vec<String> = format_mermaid(&g).lines().map(String::from).collect();
        assert_eq!(
            lines,
            vec![
                "graph TD",
                "\"deadbee\" --> \"x.txt\"",
                "\"deadbee\" --> \"y.txt\"",
            ]
        );
    }

    #[test]
    fn mermaid_empty_graph_is_header_only() {
        assert_eq!(format_mermaid(&DependencyGraph::default()), "graph TD");
    }

    #[test]
    fn mermaid_keeps_commit_and_file_order() {
        let g = graph(&[("c2", vec!["z.rs", "a.rs"]), ("c1", vec!["m.rs"])]);
        assert_eq!(
            format_mermaid(&g),
            "graph TD\n\
             \"c2\" --> \"z.rs\"\n\
             \"c2\" --> \"a.rs\"\n\
             \"c1\" --> \"m.rs\""
        );
    }

    #[test]
    fn mermaid_repeats_shared_files() {
        let g = graph(&[("c2", vec!["shared.rs"]), ("c1", vec!["shared.rs"])]);
        let out = format_mermaid(&g);
        assert_eq!(out.matches("\"shared.rs\"").count(), 2);
    }

    #[test]
    fn commits_without_files_add_no_lines() {
        let g = graph(&[("c3", vec!["a"]), ("c2", vec![]), ("c1", vec!["b"])]);
        let out = format_mermaid(&g);
        assert_eq!(out.lines().count(), 3);
        assert!(!out.contains("\"c2\""));
        assert!(!out.contains("\n\n"));
    }

    #[test]
    fn quotes_in_paths_pass_through() {
        let g = graph(&[("c1", vec!["say \"hi\".txt"])]);
        assert_eq!(
            format_mermaid(&g),
            "graph TD\n\"c1\" --> \"say \"hi\".txt\""
        );
    }

    #[test]
    fn rendering_is_deterministic() {
        let g = graph(&[("c2", vec!["b", "a"]), ("c1", vec!["c"])]);
        for format in [
            DiagramFormat::Mermaid,
            DiagramFormat::Markdown,
            DiagramFormat::Json,
        ] {
            let renderer = DiagramRenderer::new(format);
            assert_eq!(renderer.render(&g).unwrap(), renderer.render(&g).unwrap());
        }
    }

    #[test]
    fn markdown_wraps_mermaid() {
        let g = graph(&[("c1", vec!["a.txt"])]);
        let md = format_markdown(&g);
        assert!(md.starts_with("```mermaid\ngraph TD\n"));
        assert!(md.contains("\"c1\" --> \"a.txt\""));
        assert!(md.ends_with("\"a.txt\"\n```"));
    }

    #[test]
    fn json_lists_commits_in_order() {
        let g = graph(&[("c2", vec!["b", "a"]), ("c1", vec![])]);
        let json = format_json(&g).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["commits"][0]["id"], "c2");
        assert_eq!(parsed["commits"][0]["files"], serde_json::json!(["b", "a"]));
        assert_eq!(parsed["commits"][1]["id"], "c1");
    }

    #[test]
    fn renderer_dispatches_on_format() {
        let g = graph(&[("c1", vec!["a"])]);
        assert_eq!(
            DiagramRenderer::new(DiagramFormat::Mermaid).render(&g).unwrap(),
            format_mermaid(&g)
        );
        assert_eq!(
            DiagramRenderer::default().format(),
            DiagramFormat::Mermaid
        );
        assert!(DiagramRenderer::new(DiagramFormat::Json)
            .render(&g)
            .unwrap()
            .starts_with('{'));
    }
}
