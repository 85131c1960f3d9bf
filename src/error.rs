// src/error.rs

/// Everything that can go wrong between reading log lines and emitting a diagram.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A token did not fit its slot in the line grammar. The loader skips such lines.
    #[error("{reason}: {line:?}")]
    MalformedLine { reason: &'static str, line: String },

    #[error("unknown branch: {0}")]
    UnknownBranch(String),

    #[error("could not read history of branch {branch}: {source}")]
    Retrieval {
        branch: String,
        #[source]
        source: git2::Error,
    },

    #[error("branch {0} is not present in the fixture")]
    MissingFixtureBranch(String),

    #[error("commit {0} has no history index, the graph was never finalized")]
    Unfinalized(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("template error: {0}")]
    Template(#[from] handlebars::TemplateError),

    #[error("render error: {0}")]
    Render(#[from] handlebars::RenderError),
}

impl Error {
    pub(crate) fn malformed(reason: &'static str, line: &str) -> Self {
        Error::MalformedLine {
            reason,
            line: line.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
