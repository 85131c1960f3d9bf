// src/cli.rs

use clap::Parser;
use git_tikz::fixture::Fixture;
use git_tikz::{Grammar, LayoutOptions, LoadOptions, VerticalPolicy};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Branches to draw, one lane each, in this order
    #[arg(value_name = "BRANCH", default_value = "master")]
    pub branches: Vec<String>,

    /// Path to the git repository to read history from
    #[arg(short, long, default_value = ".")]
    pub repo: PathBuf,

    /// Write the result here instead of standard output
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Emit a regression fixture (JSON) instead of the diagram
    #[arg(long)]
    pub make_test: bool,

    /// Replay a previously captured fixture instead of reading the repository
    #[arg(long, value_name = "FIXTURE", conflicts_with = "stdin")]
    pub replay: Option<PathBuf>,

    /// Read log lines for the first branch from standard input
    #[arg(long)]
    pub stdin: bool,

    /// Layout of the log lines
    #[arg(long, value_enum, default_value_t = GrammarKind::Plain)]
    pub grammar: GrammarKind,

    /// Plain log lines start with the commit id, not a timestamp
    #[arg(long)]
    pub no_time: bool,

    /// Vertical placement of commits
    #[arg(long, value_enum, default_value_t = Layout::Chronological)]
    pub layout: Layout,

    /// Distance between branch lanes
    #[arg(long, default_value_t = 1.0)]
    pub lane_spacing: f64,

    /// Distance between commit rows
    #[arg(long, default_value_t = 2.0)]
    pub row_unit: f64,

    /// Keep a commit on every branch that reaches it
    #[arg(long)]
    pub allow_duplicates: bool,

    /// Handlebars template to use instead of the built-in tikzpicture
    #[arg(long, value_name = "FILE")]
    pub template: Option<PathBuf>,

    /// Do not draw a progress bar
    #[arg(long)]
    pub no_progress: bool,
}

#[derive(clap::ValueEnum, Clone, Debug, Copy)]
pub enum GrammarKind {
    /// `time id parent* message`, as produced by `git log --format`
    Plain,
    /// `git log --graph --oneline` with `*` markers
    Graph,
}

#[derive(clap::ValueEnum, Clone, Debug, Copy)]
pub enum Layout {
    /// Rows follow global commit time
    Chronological,
    /// Rows count commits within each branch
    Sequential,
}

impl Args {
    /// Standard input feeds a single branch, the first one named.
    pub fn branches_to_load(&self) -> &[String] {
        if self.stdin {
            if self.branches.len() > 1 {
                log::warn!(
                    "--stdin feeds only {}, ignoring {}",
                    self.branches[0],
                    self.branches[1..].join(", ")
                );
            }
            &self.branches[..self.branches.len().min(1)]
        } else {
            &self.branches
        }
    }

    /// Requested branches that a replayed fixture has no lines for.
    pub fn missing_from<'a>(&'a self, fixture: &Fixture) -> Vec<&'a str> {
        let known: Vec<&str> = fixture.branch_names().collect();
        self.branches_to_load()
            .iter()
            .map(String::as_str)
            .filter(|branch| !known.contains(branch))
            .collect()
    }

    pub fn grammar(&self) -> Grammar {
        match self.grammar {
            GrammarKind::Plain => Grammar::Plain {
                timestamps: !self.no_time,
            },
            GrammarKind::Graph => Grammar::Graph,
        }
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            allow_duplicate: self.allow_duplicates,
            progress: !self.no_progress,
        }
    }

    pub fn layout_options(&self) -> LayoutOptions {
        LayoutOptions {
            policy: match self.layout {
                Layout::Chronological => VerticalPolicy::Chronological,
                Layout::Sequential => VerticalPolicy::Sequential,
            },
            lane_spacing: self.lane_spacing,
            row_unit: self.row_unit,
            ..Default::default()
        }
    }
}
