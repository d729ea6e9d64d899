//! Input document model (Swagger 2 layout).
//!
//! Only the fields the renderer reads are modeled; everything else in the
//! source (`host`, `info`, `securityDefinitions`, ...) is ignored.

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::Result;
use crate::ir::Schema;
use crate::render::Definitions;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub base_path: String,
    pub paths: IndexMap<String, PathItem>,
    #[serde(default)]
    pub definitions: Definitions,
}

/// Entries under one URI. Method keys are kept raw so that vendor extensions
/// and other non-operation keys never fail the whole document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathItem {
    /// Shared by every operation under this URI.
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(flatten)]
    pub entries: IndexMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationObject {
    #[serde(default)]
    pub tags: Vec<String>,
    pub summary: Option<String>,
    pub operation_id: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub responses: IndexMap<String, Response>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Query,
    Body,
    Header,
    Path,
    /// `formData`, `cookie`, a missing `in`, or anything else we do not render.
    #[default]
    #[serde(other)]
    Unsupported,
}

/// A parameter without `name` or `in` (including a `{"$ref": ...}` stub)
/// still deserializes; the extractor drops it.
#[derive(Debug, Clone, Deserialize)]
pub struct Parameter {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "in", default)]
    pub location: Location,
    /// `#/parameters/...` references are not resolved.
    #[serde(rename = "$ref")]
    pub ref_path: Option<String>,
    #[serde(default)]
    pub required: bool,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub ty: Option<String>,
    pub format: Option<String>,
    pub items: Option<Schema>,
    /// Only present on body parameters.
    pub schema: Option<Schema>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Response {
    pub description: Option<String>,
    pub schema: Option<Schema>,
}

impl Document {
    /// Parse a document from JSON text, reporting the JSON path of any failure.
    pub fn from_json(src: &str) -> Result<Self> {
        crate::path_de::from_str_with_path(src)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        crate::path_de::from_value_with_path(value)
    }
}
