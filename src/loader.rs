// src/loader.rs

use crate::error::{Error, Result};
use crate::graph::Repository;
use crate::parser::LineParser;
use crate::source::LogSource;
use indicatif::{ParallelProgressIterator, ProgressBar};
use rayon::prelude::*;

#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    /// Store a commit again even if another branch already brought it in
    pub allow_duplicate: bool,
    /// Draw a progress bar on stderr while fetching
    pub progress: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            allow_duplicate: false,
            progress: true,
        }
    }
}

/// What happened to the lines of one branch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub lines: usize,
    pub added: usize,
    pub duplicates: usize,
    pub skipped: usize,
    pub malformed: usize,
}

/// Pulls lines for a branch out of a [`LogSource`], parses them and feeds the
/// resulting commits into a [`Repository`].
pub struct BranchLoader<'a> {
    source: &'a dyn LogSource,
    parser: LineParser,
    options: LoadOptions,
}

impl<'a> BranchLoader<'a> {
    pub fn new(source: &'a dyn LogSource, parser: LineParser, options: LoadOptions) -> Self {
        BranchLoader {
            source,
            parser,
            options,
        }
    }

    pub fn fetch(&self, branch: &str) -> Result<Vec<String>> {
        self.source.load(branch)
    }

    /// Fetches several branches in parallel. Results come back in input order.
    pub fn fetch_all(&self, branches: &[String]) -> Vec<Result<Vec<String>>> {
        let bar = if self.options.progress {
            ProgressBar::new(branches.len() as u64)
        } else {
            ProgressBar::hidden()
        };
        bar.set_message("Reading branches");

        let fetched = branches
            .par_iter()
            .progress_with(bar.clone())
            .map(|branch| self.fetch(branch))
            .collect();
        bar.finish_with_message("Branches read");
        fetched
    }

    /// Parses `lines` and adds them to `branch`.
    ///
    /// Malformed lines are reported and skipped, lines without a commit are
    /// skipped silently. Only an unknown branch aborts.
    pub fn apply(&self, repo: &mut Repository, branch: &str, lines: &[String]) -> Result<LoadStats> {
        let mut stats = LoadStats {
            lines: lines.len(),
            ..Default::default()
        };

        for (number, line) in lines.iter().enumerate() {
            match self.parser.parse(line) {
                Ok(Some(commit)) => {
                    if repo.add_commit(commit, branch, self.options.allow_duplicate)? {
                        stats.added += 1;
                    } else {
                        stats.duplicates += 1;
                    }
                }
                Ok(None) => stats.skipped += 1,
                Err(err @ Error::MalformedLine { .. }) => {
                    log::warn!("{}:{}: skipping line, {}", branch, number + 1, err);
                    stats.malformed += 1;
                }
                Err(err) => return Err(err),
            }
        }

        log::info!(
            "branch {}: {} lines, {} commits added, {} already known, {} malformed",
            branch,
            stats.lines,
            stats.added,
            stats.duplicates,
            stats.malformed
        );
        Ok(stats)
    }

    pub fn load(&self, repo: &mut Repository, branch: &str) -> Result<LoadStats> {
        let lines = self.fetch(branch)?;
        self.apply(repo, branch, &lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::Fixture;
    use crate::model::Branch;
    use crate::parser::Grammar;
    use crate::source::FixtureSource;

    fn quiet() -> LoadOptions {
        LoadOptions {
            progress: false,
            ..Default::default()
        }
    }

    #[test]
    fn malformed_lines_do_not_stop_the_branch() {
        let source = FixtureSource::new(Fixture::single(
            "master",
            "1000 aaaaaaa first\nnot-a-time bbbbbbb broken\n\n1002 XYZ bad id\n1003 ccccccc aaaaaaa third",
        ));
        let loader = BranchLoader::new(&source, LineParser::new(Grammar::default()), quiet());
        let mut repo = Repository::new();
        repo.add_branch(Branch::new("master"));

        let stats = loader.load(&mut repo, "master").unwrap();
        assert_eq!(
            stats,
            LoadStats {
                lines: 5,
                added: 2,
                duplicates: 0,
                skipped: 1,
                malformed: 2,
            }
        );
        assert_eq!(repo.branch("master").unwrap().commit_ids, vec!["aaaaaaa", "ccccccc"]);
    }

    #[test]
    fn unregistered_branch_fails_the_load() {
        let source = FixtureSource::new(Fixture::single("master", "1000 aaaaaaa first"));
        let loader = BranchLoader::new(&source, LineParser::default(), quiet());
        let mut repo = Repository::new();
        assert!(matches!(
            loader.load(&mut repo, "master"),
            Err(Error::UnknownBranch(_))
        ));
    }

    #[test]
    fn shared_commits_count_on_both_branches() {
        let mut fixture = Fixture::single("master", "1 aaaaaaa root\n3 ccccccc aaaaaaa main work");
        fixture.insert("feature", "1 aaaaaaa root\n2 bbbbbbb aaaaaaa feature work");
        let source = FixtureSource::new(fixture);
        let loader = BranchLoader::new(&source, LineParser::default(), quiet());

        let mut repo = Repository::new();
        repo.add_branch(Branch::new("master"));
        repo.add_branch(Branch::new("feature"));
        repo.load_all(&loader).unwrap();

        let feature = repo.branch("feature").unwrap();
        assert_eq!(feature.commit_ids, vec!["bbbbbbb"]);
        assert_eq!(feature.total_commits, 2);
        assert_eq!(repo.commit("bbbbbbb").unwrap().history_index, Some(1));
        assert_eq!(repo.commit("ccccccc").unwrap().history_index, Some(2));
    }

    #[test]
    fn loading_twice_rebuilds_the_same_graph() {
        let mut fixture = Fixture::single("master", "1 aaaaaaa root\n3 ccccccc aaaaaaa main work");
        fixture.insert("feature", "1 aaaaaaa root\n2 bbbbbbb aaaaaaa feature work");
        let source = FixtureSource::new(fixture);

        for allow_duplicate in [false, true] {
            let options = LoadOptions {
                allow_duplicate,
                ..quiet()
            };
            let loader = BranchLoader::new(&source, LineParser::default(), options);
            let mut repo = Repository::new();
            repo.add_branch(Branch::new("master"));
            repo.add_branch(Branch::new("feature"));

            let snapshot = |repo: &Repository| {
                let branches: Vec<Branch> = repo.branches().cloned().collect();
                let commits: Vec<(String, Option<usize>)> = repo
                    .commits()
                    .map(|c| (c.id.clone(), c.history_index))
                    .collect();
                (branches, commits)
            };

            repo.load_all(&loader).unwrap();
            let first = snapshot(&repo);
            repo.load_all(&loader).unwrap();
            assert_eq!(snapshot(&repo), first);
            assert_eq!(repo.branch("master").unwrap().total_commits, 2);
        }
    }

    #[test]
    fn failed_retrieval_keeps_earlier_branches() {
        let source = FixtureSource::new(Fixture::single("master", "1 aaaaaaa root"));
        let loader = BranchLoader::new(&source, LineParser::default(), quiet());

        let mut repo = Repository::new();
        repo.add_branch(Branch::new("master"));
        repo.add_branch(Branch::new("gone"));
        let err = repo.load_all(&loader).unwrap_err();

        assert!(matches!(err, Error::MissingFixtureBranch(name) if name == "gone"));
        assert_eq!(repo.branch("master").unwrap().commit_ids, vec!["aaaaaaa"]);
    }

    #[test]
    fn fetch_all_keeps_input_order() {
        let mut fixture = Fixture::default();
        let names: Vec<String> = (0..16).map(|i| format!("b{}", i)).collect();
        for (i, name) in names.iter().enumerate() {
            fixture.insert(name, format!("{} aaaaaaa {}", i, name));
        }
        let source = FixtureSource::new(fixture);
        let loader = BranchLoader::new(&source, LineParser::default(), quiet());

        let fetched: Vec<Vec<String>> = loader
            .fetch_all(&names)
            .into_iter()
            .collect::<Result<_>>()
            .unwrap();
        for (i, lines) in fetched.iter().enumerate() {
            assert_eq!(lines, &vec![format!("{} aaaaaaa b{}", i, i)]);
        }
    }
}
