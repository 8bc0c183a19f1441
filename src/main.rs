use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Parser;
use miette::{Context, IntoDiagnostic, Result};

use gitdeps_core::{CommitLimit, DiagramFormat, GitDepsConfig, GitDepsError};
use gitdeps_diagram::DiagramRenderer;
use gitdeps_history::GraphBuilder;

const DEFAULT_CONFIG_FILE: &str = ".gitdeps.toml";

#[derive(Parser)]
#[command(
    name = "gitdeps",
    version,
    about = "Visualize which files each git commit touched",
    long_about = "Walks a repository's history newest first, keeps commits made on or before\n\
                   a cutoff date, and prints a Mermaid graph linking every commit to the files\n\
                   it changed.\n\n\
                   Examples:\n  \
                     gitdeps --repo .                            Last 100 commits before 2023-01-01\n  \
                     gitdeps --repo . --before-date 2024-06-30   Move the cutoff\n  \
                     gitdeps --repo . --max-commits 0            Walk the whole history\n  \
                     gitdeps --repo . --format markdown -o g.md  Write a Markdown file"
)]
struct Cli {
    /// Repository to analyze (default: Hello-World)
    #[arg(long)]
    repo: Option<PathBuf>,

    /// Keep commits made on or before this date (YYYY-MM-DD, default: 2023-01-01)
    #[arg(long)]
    before_date: Option<String>,

    /// Maximum commits to process, 0 for no limit (default: 100)
    #[arg(long)]
    max_commits: Option<usize>,

    /// Output format
    #[arg(
        long,
        long_help = "Output format for the rendered graph.\n\n\
                       Formats:\n  \
                         mermaid   Mermaid flowchart text (default)\n  \
                         markdown  Mermaid inside a fenced code block\n  \
                         json      Commits and their files as JSON"
    )]
    format: Option<DiagramFormat>,

    /// Write the diagram to this file instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Path to configuration file (default: .gitdeps.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short)]
    verbose: bool,
}

/// Effective settings after layering CLI flags over the config file.
struct Settings {
    repo: PathBuf,
    before_date: String,
    limit: CommitLimit,
    format: DiagramFormat,
    output: Option<PathBuf>,
}

impl Settings {
    fn resolve(cli: &Cli, config: GitDepsConfig) -> Self {
        Self {
            repo: cli
                .repo
                .clone()
                .unwrap_or_else(|| PathBuf::from(&config.graph.repo)),
            before_date: cli
                .before_date
                .clone()
                .unwrap_or_else(|| config.graph.before_date.clone()),
            limit: cli
                .max_commits
                .map_or_else(|| config.graph.limit(), CommitLimit::from_count),
            format: cli.format.unwrap_or(config.output.format),
            output: cli.output.clone().or(config.output.path),
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<(GitDepsConfig, Option<PathBuf>)> {
    match path {
        Some(path) => {
            let config = GitDepsConfig::from_file(path)
                .wrap_err(format!("loading {}", path.display()))?;
            Ok((config, Some(path.to_path_buf())))
        }
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                let config = GitDepsConfig::from_file(default_path)
                    .wrap_err(format!("loading {DEFAULT_CONFIG_FILE}"))?;
                Ok((config, Some(default_path.to_path_buf())))
            } else {
                Ok((GitDepsConfig::default(), None))
            }
        }
    }
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .expect("miette handler");
    human_panic::setup_panic!();

    let cli = Cli::parse();
    let (config, config_path) = load_config(cli.config.as_deref())?;
    let settings = Settings::resolve(&cli, config);

    if cli.verbose {
        match &config_path {
            Some(path) => eprintln!("config: {}", path.display()),
            None => eprintln!("config: defaults"),
        }
        eprintln!(
            "repo: {}, before: {}, max commits: {}, format: {}",
            settings.repo.display(),
            settings.before_date,
            settings.limit,
            settings.format,
        );
    }

    // A missing checkout is reported but is not a failure.
    if !settings.repo.exists() {
        let err = GitDepsError::MissingPath(settings.repo.clone());
        println!("Error: {err}. Make sure the repository was cloned.");
        return Ok(());
    }

    let builder = GraphBuilder::open(&settings.repo, &settings.before_date)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let graph = builder.build(settings.limit, &mut out)?;

    if cli.verbose {
        eprintln!(
            "Recorded {} commits with {} file edges.",
            graph.len(),
            graph.edge_count()
        );
    }

    let rendered = DiagramRenderer::new(settings.format).render(&graph)?;

    match &settings.output {
        Some(path) => {
            std::fs::write(path, format!("{rendered}\n"))
                .into_diagnostic()
                .wrap_err(format!("writing {}", path.display()))?;
            if cli.verbose {
                eprintln!("Wrote {}", path.display());
            }
        }
        None => {
            writeln!(out, "{rendered}")
                .into_diagnostic()
                .wrap_err("writing diagram")?;
        }
    }

    Ok(())
}
