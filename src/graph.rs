// src/graph.rs

use crate::error::{Error, Result};
use crate::fixture::Fixture;
use crate::loader::BranchLoader;
use crate::model::{Branch, Commit};
use indexmap::IndexMap;

/// All commits and branches of one diagram.
///
/// Commits are stored once per id even when several branches reach them. Before
/// [`Repository::finalize`] the commit map is in insertion order, afterwards it is
/// in chronological order and every commit carries its `history_index`.
#[derive(Debug, Default)]
pub struct Repository {
    commits: IndexMap<String, Commit>,
    branches: IndexMap<String, Branch>,
}

impl Repository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a branch, replacing any branch of the same name.
    pub fn add_branch(&mut self, branch: Branch) {
        self.branches.insert(branch.name.clone(), branch);
    }

    /// Adds `commit` to `branch_name`. Returns whether the commit store changed.
    ///
    /// The branch's `total_commits` is bumped even when the commit is already known
    /// and `allow_duplicate` is false, in which case nothing else happens.
    pub fn add_commit(&mut self, commit: Commit, branch_name: &str, allow_duplicate: bool) -> Result<bool> {
        let branch = self
            .branches
            .get_mut(branch_name)
            .ok_or_else(|| Error::UnknownBranch(branch_name.to_string()))?;
        branch.total_commits += 1;

        if !allow_duplicate && self.commits.contains_key(&commit.id) {
            return Ok(false);
        }

        branch.commit_ids.push(commit.id.clone());
        self.commits.insert(commit.id.clone(), commit);
        Ok(true)
    }

    /// Loads every registered branch in registration order, then finalizes.
    ///
    /// Retrieval runs up front for all branches; the first branch whose retrieval
    /// failed stops the run. Branches before it stay loaded. Commits and branch
    /// contents from an earlier run are discarded first, so calling this again
    /// rebuilds the same graph.
    pub fn load_all(&mut self, loader: &BranchLoader<'_>) -> Result<()> {
        let names: Vec<String> = self.branches.keys().cloned().collect();
        let fetched = loader.fetch_all(&names);

        self.reset();
        for (name, lines) in names.iter().zip(fetched) {
            let lines = lines?;
            loader.apply(self, name, &lines)?;
        }

        self.finalize();
        Ok(())
    }

    /// Drops all commits and empties every branch, keeping registrations.
    fn reset(&mut self) {
        self.commits.clear();
        for branch in self.branches.values_mut() {
            branch.commit_ids.clear();
            branch.total_commits = 0;
        }
    }

    /// Sorts commits by time (stable, untimed commits first) and numbers them.
    pub fn finalize(&mut self) {
        self.commits.sort_by(|_, a, _, b| a.time.cmp(&b.time));
        for (index, commit) in self.commits.values_mut().enumerate() {
            commit.history_index = Some(index);
        }
    }

    pub fn commit(&self, id: &str) -> Option<&Commit> {
        self.commits.get(id)
    }

    pub fn commits(&self) -> impl Iterator<Item = &Commit> {
        self.commits.values()
    }

    pub fn commit_count(&self) -> usize {
        self.commits.len()
    }

    pub fn branch(&self, name: &str) -> Option<&Branch> {
        self.branches.get(name)
    }

    pub fn branches(&self) -> impl Iterator<Item = &Branch> {
        self.branches.values()
    }

    /// Oldest and newest timestamp among loaded commits
    pub fn time_span(&self) -> Option<(i64, i64)> {
        let mut times = self.commits.values().filter_map(|c| c.time);
        let first = times.next()?;
        Some(times.fold((first, first), |(lo, hi), t| (lo.min(t), hi.max(t))))
    }

    /// Dumps each branch's commits in canonical line form.
    pub fn to_fixture(&self) -> Fixture {
        let mut fixture = Fixture::default();
        for branch in self.branches.values() {
            let lines: Vec<String> = branch
                .commit_ids
                .iter()
                .filter_map(|id| self.commits.get(id))
                .map(Commit::to_string)
                .collect();
            fixture.insert(&branch.name, lines.join("\n"));
        }
        fixture
    }
}
