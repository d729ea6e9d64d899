use jaq_core::{compile::Undefined, load, Compiler, Ctx, RcIter};
use jaq_json::Val;
use serde_json::Value;

use crate::error::{Error, Result};

/// Run a jq program over `input` and return every value it produces.
pub fn apply_filter(filter_src: &str, input: &Value) -> Result<Vec<Value>> {
    let loader = load::Loader::new(jaq_std::defs().chain(jaq_json::defs()));
    let arena = load::Arena::default();
    let program = load::File { code: filter_src, path: () };

    let modules = loader
        .load(&arena, program)
        .map_err(parse_errors)?;

    let filter = Compiler::default()
        .with_funs(jaq_std::funs().chain(jaq_json::funs()))
        .compile(modules)
        .map_err(undefined_errors)?;

    let inputs = RcIter::new(core::iter::empty());
    let outputs = filter.run((Ctx::new([], &inputs), Val::from(input.clone())));

    let mut values = Vec::new();
    for item in outputs {
        let val = item.map_err(|e| Error::Filter(format!("{e:?}")))?;
        // Val's Display is JSON text
        values.push(serde_json::from_str(&val.to_string())?);
    }
    Ok(values)
}

/// Like [`apply_filter`], for filters that must select exactly one document.
pub fn select_one(filter_src: &str, input: &Value) -> Result<Value> {
    let mut values = apply_filter(filter_src, input)?;
    match values.len() {
        1 => Ok(values.remove(0)),
        count => Err(Error::UnexpectedFilterOutput { count }),
    }
}

fn parse_errors(errs: Vec<(load::File<&str, ()>, load::Error<&str>)>) -> Error {
    let lines: Vec<String> = errs
        .into_iter()
        .map(|(file, err)| format!("parse error: {err:?} in `{}`", file.code))
        .collect();
    Error::Filter(lines.join("\n"))
}

fn undefined_errors(errs: Vec<(load::File<&str, ()>, Vec<(&str, Undefined)>)>) -> Error {
    let lines: Vec<String> = errs
        .into_iter()
        .flat_map(|(file, list)| {
            list.into_iter()
                .map(move |(name, undef)| format!("undefined `{name}`: {undef:?} in `{}`", file.code))
        })
        .collect();
    Error::Filter(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn selects_nested_document() {
        let wrapper = json!({ "export": { "swagger": "2.0", "paths": {} } });
        let doc = select_one(".export", &wrapper).unwrap();
        assert_eq!(doc, json!({ "swagger": "2.0", "paths": {} }));
    }

    #[test]
    fn multiple_outputs_are_rejected() {
        let wrapper = json!({ "docs": [{ "paths": {} }, { "paths": {} }] });
        let error = select_one(".docs[]", &wrapper).unwrap_err();
        assert!(matches!(error, Error::UnexpectedFilterOutput { count: 2 }));
    }

    #[test]
    fn bad_program_is_a_filter_error() {
        let error = apply_filter(".[", &json!({})).unwrap_err();
        assert!(matches!(error, Error::Filter(_)));
    }
}
