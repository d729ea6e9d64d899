//! Flat record rendering for header / query / path parameters.
//!
//! These locations are conventionally non-nested, so this never recurses and
//! never consults the definition table.

use super::{comment_text, indent};
use crate::document::Parameter;

/// `None` for an empty list, so callers can omit the section entirely.
pub fn render_parameters(parameters: &[&Parameter]) -> Option<String> {
    if parameters.is_empty() {
        return None;
    }
    let mut lines = Vec::with_capacity(parameters.len() * 2);
    for param in parameters {
        if let Some(description) = &param.description {
            lines.push(format!("{}// {}", indent(1), comment_text(description)));
        }
        let optional = if param.required { "" } else { "?" };
        lines.push(format!("{}{}{}: {}", indent(1), param.name, optional, type_text(param)));
    }
    Some(format!("{{\n{}\n}}", lines.join("\n")))
}

fn type_text(param: &Parameter) -> String {
    match (param.ty.as_deref(), &param.items) {
        (Some("array"), Some(items)) => format!("[{}]", items.type_name()),
        _ => param
            .format
            .as_deref()
            .or(param.ty.as_deref())
            .unwrap_or("any")
            .to_string(),
    }
}
