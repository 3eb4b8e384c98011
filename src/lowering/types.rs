//! Output records of the schema lowering engine.
//!
//! A [`GenSchema`] is the fully classified, validation-annotated node the
//! templates consume; a [`GenDefinition`] wraps the root schema of one
//! top-level definition together with everything lifted out of it.

use serde::Serialize;
use serde_json::Value;

use crate::resolver::ResolvedType;

/// The projection of schema validation facets consumed by templates.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SharedValidations {
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    pub exclusive_maximum: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    pub exclusive_minimum: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<f64>,
    #[serde(rename = "Enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items_enum: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<i64>,
    pub unique_items: bool,
    pub has_validations: bool,
    pub has_slice_validations: bool,
}

/// A lowered schema node, ready for template rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GenSchema {
    #[serde(flatten)]
    pub resolved: ResolvedType,
    #[serde(flatten)]
    pub validations: SharedValidations,

    pub name: String,
    /// `Items` or `Value` for slice elements and map values.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub suffix: String,
    /// Path expression used to build validation error paths.
    pub path: String,
    /// Value access expression, e.g. `m.Foo[i]`.
    pub value_expression: String,
    pub index_var: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub key_var: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub location: String,
    pub receiver_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub example: String,
    #[serde(rename = "XMLName", skip_serializing_if = "String::is_empty")]
    pub xml_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<GenSchema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_items: Option<Box<GenSchema>>,
    /// Sorted lexicographically by name.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<GenSchema>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<GenSchema>,
    pub has_additional_properties: bool,
    /// Set when a complex object also declares additional properties.
    pub is_additional_properties: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Box<GenSchema>>,

    pub read_only: bool,
    /// Marks definitions invented by the engine rather than the document.
    pub is_virtual: bool,
}

impl GenSchema {
    /// Look up a property by name.
    pub fn property(&self, name: &str) -> Option<&GenSchema> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Depth of the `AdditionalProperties` chain hanging off this node.
    pub fn additional_properties_depth(&self) -> usize {
        match &self.additional_properties {
            Some(inner) => 1 + inner.additional_properties_depth(),
            None => 0,
        }
    }
}

/// A lowered top-level definition: the root schema, the definitions lifted
/// out of it, and the metadata templates need to emit one model file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GenDefinition {
    #[serde(flatten)]
    pub schema: GenSchema,
    pub package: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub default_imports: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra_schemas: Vec<GenSchema>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
}

impl GenDefinition {
    /// Look up a lifted definition by its invented name.
    pub fn extra_schema(&self, name: &str) -> Option<&GenSchema> {
        self.extra_schemas.iter().find(|s| s.name == name)
    }
}
