// Typed schema tree for rendering. No serde_json::Value here.

use indexmap::IndexMap;
use serde::Deserialize;

/// Node shape, decided once when the node is lowered.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Object {
        properties: IndexMap<String, Schema>, // source order; empty renders as `{}`
    },
    Array {
        items: Box<Schema>,
    },
    Primitive {
        ty: String,
        format: Option<String>,
    },
    Reference {
        name: String,
    },
    Any,                     // neither `type` nor a reference
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "crate::lower::RawSchema")]
pub struct Schema {
    pub shape: Shape,
    pub description: Option<String>,
    /// Reference name carried by the node, kept for the `@((Name))` annotation
    /// even when a `type` took precedence.
    pub reference: Option<String>,
}

impl Schema {
    pub fn new(shape: Shape) -> Self {
        Self { shape, description: None, reference: None }
    }

    pub fn any() -> Self {
        Self::new(Shape::Any)
    }

    pub fn primitive(ty: impl Into<String>) -> Self {
        Self::new(Shape::Primitive { ty: ty.into(), format: None })
    }

    pub fn array(items: Schema) -> Self {
        Self::new(Shape::Array { items: Box::new(items) })
    }

    pub fn object<K: Into<String>>(properties: impl IntoIterator<Item = (K, Schema)>) -> Self {
        let properties = properties.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Self::new(Shape::Object { properties })
    }

    pub fn reference(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            shape: Shape::Reference { name: name.clone() },
            description: None,
            reference: Some(name),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Only meaningful on primitives; other shapes are returned unchanged.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        if let Shape::Primitive { format: slot, .. } = &mut self.shape {
            *slot = Some(format.into());
        }
        self
    }

    /// Short type label: the `type` keyword for typed nodes, the definition
    /// name for references, `any` otherwise. Used as array item text in
    /// parameter lists.
    pub fn type_name(&self) -> &str {
        match &self.shape {
            Shape::Object { .. } => "object",
            Shape::Array { .. } => "array",
            Shape::Primitive { ty, .. } => ty,
            Shape::Reference { name } => name,
            Shape::Any => "any",
        }
    }
}
