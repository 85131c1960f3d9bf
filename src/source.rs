// src/source.rs

use crate::error::{Error, Result};
use crate::fixture::Fixture;
use git2::{Commit, Repository};
use std::path::{Path, PathBuf};

/// Supplies raw log lines for a branch, oldest commit first.
///
/// Implementations are called from several threads at once when branches are
/// fetched in parallel, hence `Sync`.
pub trait LogSource: Sync {
    fn load(&self, branch: &str) -> Result<Vec<String>>;
}

/// Reads history straight out of a git repository.
///
/// Lines have the shape `time short-id parent-short-id* summary`.
#[derive(Debug, Clone)]
pub struct GitSource {
    repo_path: PathBuf,
}

impl GitSource {
    pub fn new(repo_path: impl AsRef<Path>) -> Self {
        GitSource {
            repo_path: repo_path.as_ref().to_path_buf(),
        }
    }

    fn walk(&self, branch: &str) -> std::result::Result<Vec<String>, git2::Error> {
        // git2::Repository is not Sync, so every call opens its own handle.
        let repo = Repository::open(&self.repo_path)?;
        let tip = repo.resolve_reference_from_short_name(branch)?.peel_to_commit()?;

        let mut revwalk = repo.revwalk()?;
        revwalk.push(tip.id())?;
        revwalk.set_sorting(git2::Sort::TIME)?;

        let mut lines = Vec::new();
        for oid in revwalk {
            let commit = repo.find_commit(oid?)?;
            lines.push(log_line(&commit)?);
        }
        lines.reverse(); // Walk from the first commit to the last
        log::debug!("read {} commits of {} from {}", lines.len(), branch, self.repo_path.display());
        Ok(lines)
    }
}

impl LogSource for GitSource {
    fn load(&self, branch: &str) -> Result<Vec<String>> {
        self.walk(branch).map_err(|source| Error::Retrieval {
            branch: branch.to_string(),
            source,
        })
    }
}

fn short_id(commit: &Commit) -> std::result::Result<String, git2::Error> {
    let buf = commit.as_object().short_id()?;
    Ok(buf.as_str().map_or_else(|| commit.id().to_string(), str::to_string))
}

fn log_line(commit: &Commit) -> std::result::Result<String, git2::Error> {
    let mut line = format!("{} {}", commit.time().seconds(), short_id(commit)?);
    for parent in commit.parents() {
        line.push(' ');
        line.push_str(&short_id(&parent)?);
    }
    let summary = commit.summary().unwrap_or("").trim();
    if !summary.is_empty() {
        line.push(' ');
        line.push_str(summary);
    }
    Ok(line)
}

/// Replays a captured fixture instead of touching a repository.
#[derive(Debug, Clone)]
pub struct FixtureSource {
    fixture: Fixture,
}

impl FixtureSource {
    pub fn new(fixture: Fixture) -> Self {
        FixtureSource { fixture }
    }
}

impl LogSource for FixtureSource {
    fn load(&self, branch: &str) -> Result<Vec<String>> {
        self.fixture
            .lines(branch)
            .ok_or_else(|| Error::MissingFixtureBranch(branch.to_string()))
    }
}
