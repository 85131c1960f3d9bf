// src/layout.rs

use crate::error::{Error, Result};
use crate::graph::Repository;
use serde::Serialize;

/// How commits are placed vertically. One policy applies to the whole diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalPolicy {
    /// `row_unit * history_index`: rows follow global commit time across lanes
    #[default]
    Chronological,
    /// `row_unit * (position in branch + 1)`: each lane counts its own commits
    Sequential,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    pub policy: VerticalPolicy,
    /// Horizontal distance between branch lanes
    pub lane_spacing: f64,
    /// Vertical distance between rows
    pub row_unit: f64,
    /// Horizontal distance from a commit node to its message label
    pub message_offset: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        LayoutOptions {
            policy: VerticalPolicy::Chronological,
            lane_spacing: 1.0,
            row_unit: 2.0,
            message_offset: 2.0,
        }
    }
}

/// Render-ready projection of a [`Repository`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutModel {
    pub policy: VerticalPolicy,
    pub lane_spacing: f64,
    pub row_unit: f64,
    /// Branches with at least one commit, in registration order
    pub branches: Vec<BranchLayout>,
    /// Child to parent pairs, grouped per commit in graph order
    pub edges: Vec<EdgeLayout>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BranchLayout {
    pub name: String,
    pub lane: usize,
    pub x: f64,
    /// Latest commit on the branch, target of the ref arrow
    pub head: String,
    /// Vertical position of the ref label, one row above the highest commit
    pub ref_y: f64,
    pub commits: Vec<NodeLayout>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeLayout {
    pub id: String,
    pub message: String,
    pub x: f64,
    pub y: f64,
    pub message_x: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeLayout {
    pub from: String,
    pub to: String,
    /// False when the parent was never loaded
    pub resolved: bool,
}

pub fn export_layout(repo: &Repository, options: &LayoutOptions) -> Result<LayoutModel> {
    let mut branches = Vec::new();

    for (lane, branch) in repo.branches().enumerate() {
        let Some(head) = branch.head() else {
            continue;
        };
        let x = lane as f64 * options.lane_spacing;

        let mut commits = Vec::with_capacity(branch.commit_ids.len());
        for (position, id) in branch.commit_ids.iter().enumerate() {
            let Some(commit) = repo.commit(id) else {
                continue;
            };
            let row = match options.policy {
                VerticalPolicy::Chronological => commit
                    .history_index
                    .ok_or_else(|| Error::Unfinalized(id.clone()))?,
                VerticalPolicy::Sequential => position + 1,
            };
            commits.push(NodeLayout {
                id: id.clone(),
                message: commit.message.clone(),
                x,
                y: row as f64 * options.row_unit,
                message_x: x + options.message_offset,
            });
        }

        let top = commits.iter().map(|c| c.y).fold(f64::MIN, f64::max);
        branches.push(BranchLayout {
            name: branch.name.clone(),
            lane,
            x,
            head: head.to_string(),
            ref_y: top + options.row_unit,
            commits,
        });
    }

    let edges = repo
        .commits()
        .flat_map(|commit| {
            commit.parents.iter().map(move |parent| EdgeLayout {
                from: commit.id.clone(),
                to: parent.clone(),
                resolved: repo.commit(parent).is_some(),
            })
        })
        .collect();

    Ok(LayoutModel {
        policy: options.policy,
        lane_spacing: options.lane_spacing,
        row_unit: options.row_unit,
        branches,
        edges,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Branch, Commit};
    use pretty_assertions::assert_eq;

    fn two_branch_repo() -> Repository {
        let mut repo = Repository::new();
        repo.add_branch(Branch::new("master"));
        repo.add_branch(Branch::new("empty"));
        repo.add_branch(Branch::new("feature"));
        let commits = [
            ("master", Commit::new("aaaaaaa").with_time(10).with_message("root")),
            ("master", Commit::new("ccccccc").with_time(30).with_parents(["aaaaaaa"])),
            ("feature", Commit::new("bbbbbbb").with_time(20).with_parents(["aaaaaaa", "fffffff"])),
        ];
        for (branch, commit) in commits {
            repo.add_commit(commit, branch, false).unwrap();
        }
        repo
    }

    #[test]
    fn chronological_rows_follow_history_index() {
        let mut repo = two_branch_repo();
        repo.finalize();
        let layout = export_layout(&repo, &LayoutOptions::default()).unwrap();

        let names: Vec<&str> = layout.branches.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["master", "feature"]);

        let master = &layout.branches[0];
        assert_eq!(master.lane, 0);
        assert_eq!(master.head, "ccccccc");
        let rows: Vec<(&str, f64)> = master.commits.iter().map(|c| (c.id.as_str(), c.y)).collect();
        assert_eq!(rows, vec![("aaaaaaa", 0.0), ("ccccccc", 4.0)]);
        assert_eq!(master.ref_y, 6.0);

        let feature = &layout.branches[1];
        assert_eq!(feature.lane, 2);
        assert_eq!(feature.x, 2.0);
        assert_eq!(feature.commits[0].y, 2.0);
        assert_eq!(feature.commits[0].message_x, 4.0);
    }

    #[test]
    fn sequential_rows_count_within_the_branch() {
        let repo = two_branch_repo();
        let options = LayoutOptions {
            policy: VerticalPolicy::Sequential,
            row_unit: 1.5,
            ..Default::default()
        };
        let layout = export_layout(&repo, &options).unwrap();

        let master: Vec<f64> = layout.branches[0].commits.iter().map(|c| c.y).collect();
        assert_eq!(master, vec![1.5, 3.0]);
        assert_eq!(layout.branches[0].ref_y, 4.5);
        assert_eq!(layout.branches[1].commits[0].y, 1.5);
        assert_eq!(layout.row_unit, 1.5);
        assert_eq!(layout.policy, VerticalPolicy::Sequential);
    }

    #[test]
    fn chronological_layout_needs_a_finalized_graph() {
        let repo = two_branch_repo();
        let err = export_layout(&repo, &LayoutOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Unfinalized(id) if id == "aaaaaaa"));
    }

    #[test]
    fn edges_point_from_child_to_each_parent() {
        let mut repo = two_branch_repo();
        repo.finalize();
        let layout = export_layout(&repo, &LayoutOptions::default()).unwrap();

        let edges: Vec<(&str, &str, bool)> = layout
            .edges
            .iter()
            .map(|e| (e.from.as_str(), e.to.as_str(), e.resolved))
            .collect();
        assert_eq!(
            edges,
            vec![
                ("bbbbbbb", "aaaaaaa", true),
                ("bbbbbbb", "fffffff", false),
                ("ccccccc", "aaaaaaa", true),
            ]
        );
    }
}
