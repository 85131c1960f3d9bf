// src/lib.rs

//! Lay out commit history as a TikZ diagram.
//!
//! Log lines (`time id parent* message`) come from a [`source::LogSource`], are
//! parsed by [`parser::LineParser`] and collected per branch in a
//! [`graph::Repository`]. Once every branch is loaded the repository is sorted by
//! commit time, [`layout::export_layout`] assigns coordinates, and
//! [`renderer::TikzRenderer`] fills the picture template.

pub mod error;
pub mod fixture;
pub mod graph;
pub mod layout;
pub mod loader;
pub mod model;
pub mod parser;
pub mod renderer;
pub mod source;

pub use error::{Error, Result};
pub use graph::Repository;
pub use layout::{export_layout, LayoutModel, LayoutOptions, VerticalPolicy};
pub use loader::{BranchLoader, LoadOptions, LoadStats};
pub use model::{Branch, Commit};
pub use parser::{Grammar, LineParser};
