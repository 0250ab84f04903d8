//! Feature Type Schemas
//!
//! Static definitions of the feature types a user can place on the map:
//! - Geometry kind (drives which drawing tool activates)
//! - Display name and default stroke color
//! - Ordered attribute definitions with defaults

mod builtin;
mod form;
mod value;

pub use builtin::*;
pub use form::*;
pub use value::*;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::GeometryKind;

/// Schema-related errors
#[derive(Debug, Clone, Error)]
pub enum SchemaError {
    #[error("Unknown feature type: {0}")]
    UnknownType(String),

    #[error("Feature type {0} has no geometry and cannot be drawn")]
    NotDrawable(String),

    #[error("Duplicate feature type: {0}")]
    DuplicateType(String),

    #[error("Failed to parse schema definitions: {0}")]
    Parse(String),
}

/// Value kind of an attribute
///
/// Serialized as lowercase identifiers (`int`, `float`, `number`, `str`,
/// `bool`); `number` is displayed as `float | int`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeKind {
    Int,
    Float,
    /// Either a float or an int
    Number,
    Str,
    Bool,
}

impl AttributeKind {
    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            AttributeKind::Int => "int",
            AttributeKind::Float => "float",
            AttributeKind::Number => "float | int",
            AttributeKind::Str => "str",
            AttributeKind::Bool => "bool",
        }
    }
}

impl std::fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A user-editable attribute of a feature type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDef {
    pub name: String,
    pub kind: AttributeKind,
    /// Prefilled form value; `None` leaves the field empty
    #[serde(default)]
    pub default: Option<AttributeValue>,
}

impl AttributeDef {
    pub fn new(name: impl Into<String>, kind: AttributeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default: None,
        }
    }

    pub fn with_default(mut self, value: AttributeValue) -> Self {
        self.default = Some(value);
        self
    }
}

/// Definition of a feature type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureTypeSchema {
    /// Type key, e.g. `BaseFieldBlock`
    pub type_name: String,
    /// Geometry drawn for this type; `None` for derived-only types
    pub geometry: Option<GeometryKind>,
    /// EPSG code of the coordinates
    #[serde(default = "default_crs")]
    pub crs: u32,
    pub display_name: String,
    /// Default stroke color, e.g. `#75c800`
    #[serde(default)]
    pub color: Option<String>,
    /// Editable attributes in form order
    #[serde(default)]
    pub attributes: Vec<AttributeDef>,
    /// Whether boundary edges are derived from this type's polygons
    #[serde(default)]
    pub derives_edges: bool,
}

fn default_crs() -> u32 {
    4326
}

impl FeatureTypeSchema {
    pub fn new(type_name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            geometry: None,
            crs: default_crs(),
            display_name: display_name.into(),
            color: None,
            attributes: Vec::new(),
            derives_edges: false,
        }
    }

    /// Whether the user can draw features of this type
    pub fn is_creatable(&self) -> bool {
        self.geometry.is_some()
    }

    /// Geometry kind, failing for non-drawable types
    pub fn geometry_kind(&self) -> Result<GeometryKind, SchemaError> {
        self.geometry
            .ok_or_else(|| SchemaError::NotDrawable(self.type_name.clone()))
    }

    /// Get an attribute definition by name
    pub fn attribute(&self, name: &str) -> Option<&AttributeDef> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Whether the property form has any fields to fill in
    pub fn has_editable_attributes(&self) -> bool {
        !self.attributes.is_empty()
    }

    /// Default value of an attribute, if both exist
    pub fn default_value(&self, name: &str) -> Option<&AttributeValue> {
        self.attribute(name).and_then(|a| a.default.as_ref())
    }
}

/// Lookup of feature type schemas, in load order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaRegistry {
    schemas: Vec<FeatureTypeSchema>,
}

impl SchemaRegistry {
    /// Build a registry, rejecting duplicate type names
    pub fn new(schemas: Vec<FeatureTypeSchema>) -> Result<Self, SchemaError> {
        for (i, schema) in schemas.iter().enumerate() {
            if schemas[..i].iter().any(|s| s.type_name == schema.type_name) {
                return Err(SchemaError::DuplicateType(schema.type_name.clone()));
            }
        }
        Ok(Self { schemas })
    }

    /// Load schemas from a RON list of definitions
    pub fn from_ron(source: &str) -> Result<Self, SchemaError> {
        let schemas: Vec<FeatureTypeSchema> =
            ron::from_str(source).map_err(|e| SchemaError::Parse(e.to_string()))?;
        Self::new(schemas)
    }

    /// Get a schema by type name
    pub fn get(&self, type_name: &str) -> Option<&FeatureTypeSchema> {
        self.schemas.iter().find(|s| s.type_name == type_name)
    }

    /// Get a schema by type name, failing if unknown
    pub fn schema(&self, type_name: &str) -> Result<&FeatureTypeSchema, SchemaError> {
        self.get(type_name)
            .ok_or_else(|| SchemaError::UnknownType(type_name.to_string()))
    }

    /// Iterate over all schemas
    pub fn iter(&self) -> impl Iterator<Item = &FeatureTypeSchema> {
        self.schemas.iter()
    }

    /// Iterate over the schemas a user can draw
    pub fn creatable(&self) -> impl Iterator<Item = &FeatureTypeSchema> {
        self.schemas.iter().filter(|s| s.is_creatable())
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
