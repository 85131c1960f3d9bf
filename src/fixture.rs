// src/fixture.rs

use crate::error::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// Captured per-branch log dump used for regression runs.
///
/// Serialized as a JSON object mapping branch name to the newline-joined
/// canonical lines of that branch, in branch order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fixture {
    branches: IndexMap<String, String>,
}

impl Fixture {
    /// A fixture holding one branch, e.g. log text piped on stdin.
    pub fn single(branch: &str, text: impl Into<String>) -> Self {
        let mut fixture = Fixture::default();
        fixture.insert(branch, text);
        fixture
    }

    pub fn insert(&mut self, branch: &str, text: impl Into<String>) {
        self.branches.insert(branch.to_string(), text.into());
    }

    pub fn get(&self, branch: &str) -> Option<&str> {
        self.branches.get(branch).map(String::as_str)
    }

    pub fn lines(&self, branch: &str) -> Option<Vec<String>> {
        self.get(branch)
            .map(|text| text.lines().map(str::to_string).collect())
    }

    pub fn branch_names(&self) -> impl Iterator<Item = &str> {
        self.branches.keys().map(String::as_str)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn write_to(&self, mut writer: impl Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writeln!(writer)?;
        Ok(())
    }
}
