// src/parser.rs

use crate::error::{Error, Result};
use crate::model::Commit;
use regex::Regex;

const COMMIT_ID_PATTERN: &str = "^[a-f0-9]{7,}$";
const QUOTES: &[char] = &['\'', '"'];
const NODE_MARKER: &str = "*";
const TREE_SPACERS: &[&str] = &["|", "/", "\\"];

/// Which token layout the log lines follow. A run uses exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    /// `[time] id parent* message`, parents end at the first non-id token
    Plain { timestamps: bool },
    /// `git log --graph` output with `*` markers and `| / \` spacers
    Graph,
}

impl Default for Grammar {
    fn default() -> Self {
        Grammar::Plain { timestamps: true }
    }
}

/// Turns raw log lines into commits.
///
/// `parse` returns `Ok(None)` for lines that carry no commit (blank lines, a bare
/// timestamp) and `Err(Error::MalformedLine)` when a required token is present but
/// does not fit its slot.
#[derive(Debug, Clone)]
pub struct LineParser {
    grammar: Grammar,
    commit_id: Regex,
}

impl LineParser {
    pub fn new(grammar: Grammar) -> Self {
        LineParser {
            grammar,
            commit_id: Regex::new(COMMIT_ID_PATTERN).expect("commit id pattern is valid"),
        }
    }

    pub fn grammar(&self) -> Grammar {
        self.grammar
    }

    pub fn is_commit_id(&self, token: &str) -> bool {
        self.commit_id.is_match(token)
    }

    pub fn parse(&self, line: &str) -> Result<Option<Commit>> {
        match self.grammar {
            Grammar::Plain { timestamps } => self.parse_plain(line, timestamps),
            Grammar::Graph => Ok(self.parse_graph(line)),
        }
    }

    fn parse_plain(&self, line: &str, timestamps: bool) -> Result<Option<Commit>> {
        let mut tokens = unquote(line.trim()).split_whitespace().peekable();

        if tokens.peek().is_none() {
            return Ok(None);
        }

        let time = if timestamps {
            let token = tokens.next().unwrap_or_default();
            let time = token
                .parse::<i64>()
                .map_err(|_| Error::malformed("could not parse time", line))?;
            Some(time)
        } else {
            None
        };

        let id = match tokens.next() {
            Some(token) if self.is_commit_id(token) => token,
            Some(_) => return Err(Error::malformed("could not parse commit id", line)),
            None => return Ok(None),
        };

        let mut commit = Commit::new(id);
        commit.time = time;
        while let Some(token) = tokens.next_if(|token| self.is_commit_id(token)) {
            commit.parents.push(token.to_string());
        }
        commit.message = tokens.collect::<Vec<_>>().join(" ");

        Ok(Some(commit))
    }

    fn parse_graph(&self, line: &str) -> Option<Commit> {
        let mut id = None;
        let mut parents = Vec::new();
        let mut node_position = None;
        let mut message_words = Vec::new();

        for (position, token) in line.split_whitespace().enumerate() {
            if self.is_commit_id(token) {
                if id.is_none() {
                    id = Some(token);
                } else {
                    parents.push(token.to_string());
                }
            } else if token == NODE_MARKER {
                node_position = Some(position);
            } else if TREE_SPACERS.contains(&token) {
                continue;
            } else {
                message_words.push(token);
            }
        }

        let mut commit = Commit::new(id?);
        commit.parents = parents;
        commit.node_position = node_position;
        commit.message = message_words.join(" ");
        Some(commit)
    }
}

/// Removes one pair of matching quotes wrapping the whole line.
fn unquote(line: &str) -> &str {
    for quote in QUOTES {
        if line.len() >= 2 && line.starts_with(*quote) && line.ends_with(*quote) {
            return &line[1..line.len() - 1];
        }
    }
    line
}

impl Default for LineParser {
    fn default() -> Self {
        LineParser::new(Grammar::default())
    }
}
