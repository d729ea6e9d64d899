//! Schema → pseudocode renderer.
//!
//! Each call returns exactly the text for one node. Parents trim the trailing
//! whitespace of their children before joining, so indentation stays uniform
//! without a separate formatting pass.
//!
//! References are expanded in place. The chain of names currently being
//! expanded is scoped to the recursion path: a name that reappears on its own
//! path renders as a cycle marker, while siblings may expand it freely.
pub mod params;

use indexmap::IndexMap;

use crate::ir::{Schema, Shape};

/// Definition table keyed by reference name.
pub type Definitions = IndexMap<String, Schema>;

const INDENT_WIDTH: usize = 4;

pub fn indent(depth: usize) -> String {
    " ".repeat(depth * INDENT_WIDTH)
}

/// Marker emitted where a reference would re-enter itself.
pub fn cycle_marker(name: &str) -> String {
    format!("@@{name}))")
}

/// Marker emitted for a reference missing from the definition table.
pub fn unresolved_marker(name: &str) -> String {
    format!("@!!{name}))")
}

/// Render a top-level node as a bare value.
pub fn render_value(schema: &Schema, definitions: &Definitions) -> String {
    render(schema, definitions, 0, None, &[])
}

/// Render `schema` at `depth`, as `field_key: <value>` when a key is given.
pub fn render(
    schema: &Schema,
    definitions: &Definitions,
    depth: usize,
    field_key: Option<&str>,
    ancestors: &[String],
) -> String {
    let mut text = String::new();

    if depth > 0 {
        if let Some(description) = &schema.description {
            push_comment(&mut text, &comment_text(description), depth, field_key.is_some());
        }
        if let Some(name) = &schema.reference {
            push_comment(&mut text, &format!("@(({name}))"), depth, field_key.is_some());
        }
    }

    if let Some(key) = field_key {
        text.push_str(&indent(depth));
        text.push_str(key);
        text.push_str(": ");
    }

    match &schema.shape {
        Shape::Object { properties } if properties.is_empty() => text.push_str("{}"),
        Shape::Object { properties } => {
            let fields = properties
                .iter()
                .map(|(key, prop)| {
                    let rendered = render(prop, definitions, depth + 1, Some(key), ancestors);
                    rendered.trim_end().to_string()
                })
                .collect::<Vec<_>>();
            text.push_str("{\n");
            text.push_str(&fields.join("\n"));
            text.push('\n');
            text.push_str(&indent(depth));
            text.push_str("}\n");
        }
        Shape::Array { items } => {
            let inner = render(items, definitions, depth + 1, None, ancestors);
            let inner = inner.trim_end();
            if inner.contains('\n') {
                text.push_str("[\n");
                text.push_str(&indent(depth + 1));
                text.push_str(inner);
                text.push('\n');
                text.push_str(&indent(depth));
                text.push_str("]\n");
            } else {
                text.push('[');
                text.push_str(inner.trim());
                text.push(']');
            }
        }
        Shape::Primitive { ty, format } => {
            text.push_str(format.as_deref().unwrap_or(ty));
        }
        Shape::Any => text.push_str("any"),
        Shape::Reference { name } => {
            if ancestors.iter().any(|seen| seen == name) {
                tracing::debug!(reference = %name, "cyclic reference, not expanding");
                text.push_str(&cycle_marker(name));
            } else if let Some(definition) = definitions.get(name) {
                let mut chain = ancestors.to_vec();
                chain.push(name.clone());
                // references are transparent: same depth, key already written
                text.push_str(&render(definition, definitions, depth, None, &chain));
            } else {
                tracing::warn!(reference = %name, "unresolved reference");
                text.push_str(&unresolved_marker(name));
            }
        }
    }

    text
}

/// Collapse whitespace so a description always fits on one comment line.
pub(crate) fn comment_text(description: &str) -> String {
    description.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn push_comment(text: &mut String, comment: &str, depth: usize, is_field: bool) {
    if is_field {
        text.push_str(&indent(depth));
        text.push_str("// ");
        text.push_str(comment);
        text.push('\n');
    } else {
        // bare value: the caller already indented this line
        text.push_str("// ");
        text.push_str(comment);
        text.push('\n');
        text.push_str(&indent(depth));
    }
}
