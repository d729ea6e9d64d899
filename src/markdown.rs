//! Markdown assembly: operations grouped by tag.
use indexmap::IndexMap;
use serde::Deserialize;

use crate::document::Document;
use crate::error::Result;
use crate::extract::{walk, Operation};

const TOC_MARKER: &str = "[TOC]";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AssembleOptions {
    /// Section for operations that declare no tags.
    pub default_tag: String,
    /// Emit the `[TOC]` marker first.
    pub table_of_contents: bool,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self { default_tag: "Default".to_string(), table_of_contents: true }
    }
}

/// Walk `document` and assemble the markdown in one go.
pub fn render_document(document: &Document, options: &AssembleOptions) -> Result<String> {
    let operations = walk(document)?;
    Ok(assemble(&operations, options))
}

pub fn assemble(operations: &[Operation], options: &AssembleOptions) -> String {
    let mut blocks = Vec::new();
    if options.table_of_contents {
        blocks.push(TOC_MARKER.to_string());
    }
    for (tag, members) in group_by_tag(operations, &options.default_tag) {
        blocks.push(format!("# {tag}"));
        blocks.extend(members.into_iter().map(operation_block));
    }
    blocks.join("\n\n")
}

/// Tag → operations, in first-seen tag order. An operation appears once under
/// each of its tags.
pub fn group_by_tag<'a>(
    operations: &'a [Operation],
    default_tag: &'a str,
) -> IndexMap<&'a str, Vec<&'a Operation>> {
    let mut categories: IndexMap<&str, Vec<&Operation>> = IndexMap::new();
    for op in operations {
        if op.tags.is_empty() {
            categories.entry(default_tag).or_default().push(op);
        }
        for tag in &op.tags {
            categories.entry(tag.as_str()).or_default().push(op);
        }
    }
    categories
}

fn operation_block(op: &Operation) -> String {
    let mut text = match &op.summary {
        Some(summary) => format!("## {} {}\n", op.uri, summary),
        None => format!("## {}\n", op.uri),
    };
    if let Some(summary) = &op.summary {
        text.push_str(&format!("\n{} {}\n", op.name, summary));
    }

    let request = &op.request;
    push_fenced_section(&mut text, "Headers", request.headers.as_deref());
    push_fenced_section(&mut text, "SearchQueryParams", request.search_query.as_deref());
    push_fenced_section(&mut text, "PathParams", request.path_params.as_deref());

    text.push_str("\n**Request->Response:**\n```\n");
    text.push_str(&format!("{} \"{}\"", op.method.to_uppercase(), op.url));
    if let Some(data) = &request.data {
        text.push_str(" + ");
        text.push_str(data.trim());
    }
    text.push_str(" -> ");
    text.push_str(op.response.trim());
    text.push_str("\n```\n");
    text
}

fn push_fenced_section(text: &mut String, title: &str, body: Option<&str>) {
    if let Some(body) = body {
        text.push_str(&format!("\n**{title}:**\n```\n{body}\n```\n"));
    }
}
