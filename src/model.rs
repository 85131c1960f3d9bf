// src/model.rs

use std::fmt;

/// Abbreviated or full commit hash, lowercase hex
pub type CommitId = String;

/// A single commit as read from one log line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Commit {
    pub id: CommitId,
    /// Unix timestamp, absent for log formats without a time column
    pub time: Option<i64>,
    pub message: String,
    /// Parent ids in log order. A parent does not have to be loaded.
    pub parents: Vec<CommitId>,
    /// Never filled by the parser
    pub children: Vec<CommitId>,
    /// Token offset of the `*` marker in graph-style logs
    pub node_position: Option<usize>,
    /// Rank in global chronological order, set once the graph is finalized
    pub history_index: Option<usize>,
}

impl Commit {
    pub fn new(id: impl Into<CommitId>) -> Self {
        Commit {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_time(mut self, time: i64) -> Self {
        self.time = Some(time);
        self
    }

    pub fn with_parents<I, S>(mut self, parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CommitId>,
    {
        self.parents = parents.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

/// Canonical line form: `time id parent* message`, the same shape the plain parser reads.
impl fmt::Display for Commit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(time) = self.time {
            write!(f, "{} ", time)?;
        }
        f.write_str(&self.id)?;
        for parent in &self.parents {
            write!(f, " {}", parent)?;
        }
        if !self.message.is_empty() {
            write!(f, " {}", self.message)?;
        }
        Ok(())
    }
}

/// One line of history as traversed by retrieval
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Branch {
    pub name: String,
    /// Ids in load order, duplicates already seen on other branches are left out
    pub commit_ids: Vec<CommitId>,
    /// Every commit offered to this branch, duplicates included
    pub total_commits: usize,
}

impl Branch {
    pub fn new(name: impl Into<String>) -> Self {
        Branch {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn head(&self) -> Option<&str> {
        self.commit_ids.last().map(String::as_str)
    }
}
