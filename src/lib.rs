//! Render Swagger / OpenAPI documents into tag-grouped markdown pseudocode.
//!
//! Pipeline:
//! 1. Parse: JSON -> [`document::Document`] (schema nodes lowered to [`ir::Schema`])
//! 2. Walk: one [`extract::Operation`] per (URI, method) pair
//! 3. Assemble: operations grouped by tag -> markdown text
pub mod document;
pub mod error;
pub mod extract;
pub mod ir;
pub mod jq_exec;
pub mod lower;
pub mod markdown;
pub mod path_de;
pub mod render;

pub use document::Document;
pub use error::{Error, Result};
pub use extract::{walk, Operation, Request};
pub use markdown::{assemble, render_document, AssembleOptions};
