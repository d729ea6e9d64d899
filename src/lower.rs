use indexmap::IndexMap;
use serde::Deserialize;

use crate::ir::{Schema, Shape};

/// Schema node exactly as it appears in the source document.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSchema {
    #[serde(rename = "type")]
    pub ty: Option<String>,
    pub format: Option<String>,
    pub description: Option<String>,
    /// springfox emits the bare definition name here.
    pub original_ref: Option<String>,
    #[serde(rename = "$ref")]
    pub ref_path: Option<String>,
    pub properties: Option<IndexMap<String, Schema>>,
    pub items: Option<Box<Schema>>,
}

impl From<RawSchema> for Schema {
    fn from(raw: RawSchema) -> Self {
        lower_schema(raw)
    }
}

const REF_PREFIXES: [&str; 2] = ["#/definitions/", "#/components/schemas/"];

/// Classify a raw node into its tagged shape.
///
/// `type` wins over a reference; a node with neither lowers to [`Shape::Any`].
pub fn lower_schema(raw: RawSchema) -> Schema {
    let reference = raw
        .original_ref
        .or_else(|| raw.ref_path.as_deref().map(reference_name));

    let shape = match raw.ty {
        Some(ty) if ty == "object" => Shape::Object {
            properties: raw.properties.unwrap_or_default(),
        },
        Some(ty) if ty == "array" => Shape::Array {
            items: raw.items.unwrap_or_else(|| Box::new(Schema::any())),
        },
        Some(ty) => Shape::Primitive { ty, format: raw.format },
        None => match &reference {
            Some(name) => Shape::Reference { name: name.clone() },
            None => Shape::Any,
        },
    };

    Schema { shape, description: raw.description, reference }
}

/// `#/definitions/Pet` → `Pet`. Unknown pointer layouts keep their last segment.
pub fn reference_name(ref_path: &str) -> String {
    let tail = REF_PREFIXES
        .iter()
        .find_map(|prefix| ref_path.strip_prefix(prefix))
        .unwrap_or_else(|| ref_path.rsplit('/').next().unwrap_or(ref_path));
    tail.replace("~1", "/").replace("~0", "~")
}
