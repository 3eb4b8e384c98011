//! Serde data model for the Swagger 2.0 subset the generator consumes.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `type` supports both a single name and an array of names.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum SchemaType {
    One(String),
    Many(Vec<String>),
}

impl SchemaType {
    /// The primary type name, or `None` when the array is empty.
    pub fn primary(&self) -> Option<&str> {
        match self {
            SchemaType::One(s) => Some(s.as_str()).filter(|s| !s.is_empty()),
            SchemaType::Many(types) => types.first().map(|s| s.as_str()).filter(|s| !s.is_empty()),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            SchemaType::One(s) => s.is_empty(),
            SchemaType::Many(types) => types.is_empty(),
        }
    }
}

/// `items` is either one schema (array) or an ordered sequence (tuple).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Items {
    Single(Box<Schema>),
    Tuple(Vec<Schema>),
}

/// `additionalProperties` / `additionalItems`: an allow-flag or a schema.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum BoolOrSchema {
    Allows(bool),
    Schema(Box<Schema>),
}

impl BoolOrSchema {
    pub fn allows(&self) -> bool {
        matches!(self, BoolOrSchema::Allows(true))
    }

    pub fn schema(&self) -> Option<&Schema> {
        match self {
            BoolOrSchema::Schema(s) => Some(s),
            BoolOrSchema::Allows(_) => None,
        }
    }

    /// True when this entry asks for additional members at all.
    pub fn wants(&self) -> bool {
        self.allows() || self.schema().is_some()
    }
}

/// XML element naming hint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct XmlInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    pub attribute: bool,
    pub wrapped: bool,
}

/// A node in the Swagger subset of JSON Schema.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Schema {
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    pub exclusive_maximum: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    pub exclusive_minimum: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<i64>,
    pub unique_items: bool,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Items>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_items: Option<Box<BoolOrSchema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Box<BoolOrSchema>>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, Schema>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<Schema>,

    pub read_only: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xml: Option<XmlInfo>,

    /// Vendor extensions (`x-...` keys) and anything else unrecognised.
    #[serde(flatten, skip_serializing_if = "IndexMap::is_empty")]
    pub extensions: IndexMap<String, Value>,
}

impl Schema {
    /// A bare `type: object` schema, used when synthesising tuple structs.
    pub fn object() -> Self {
        Schema {
            schema_type: Some(SchemaType::One("object".into())),
            ..Default::default()
        }
    }

    /// A schema that is only a reference to `#/definitions/<name>`.
    pub fn reference_to(name: &str) -> Self {
        Schema {
            reference: Some(format!("#/definitions/{}", name)),
            ..Default::default()
        }
    }

    pub fn primary_type(&self) -> Option<&str> {
        self.schema_type.as_ref().and_then(|t| t.primary())
    }

    /// `x-go-name` override for the generated identifier.
    pub fn x_go_name(&self) -> Option<&str> {
        self.extensions.get("x-go-name").and_then(|v| v.as_str())
    }

    /// `x-isnullable` marker.
    pub fn x_is_nullable(&self) -> bool {
        self.extensions
            .get("x-isnullable")
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }

    /// Single array item schema, when `items` is not a tuple.
    pub fn single_items(&self) -> Option<&Schema> {
        match self.items.as_deref() {
            Some(Items::Single(s)) => Some(s),
            _ => None,
        }
    }

    /// Tuple member schemas, when `items` is a sequence.
    pub fn tuple_items(&self) -> Option<&[Schema]> {
        match self.items.as_deref() {
            Some(Items::Tuple(s)) => Some(s),
            _ => None,
        }
    }

    /// The schema carried by `additionalProperties`, if any.
    pub fn additional_properties_schema(&self) -> Option<&Schema> {
        self.additional_properties.as_deref().and_then(|a| a.schema())
    }

    /// True when the schema names a type, has properties, or is a ref:
    /// used to tell substantive `allOf` members from bare markers.
    pub fn is_substantive(&self) -> bool {
        self.schema_type.as_ref().is_some_and(|t| !t.is_empty())
            || !self.properties.is_empty()
            || self.reference.is_some()
    }
}

/// Items description for non-body parameters and headers.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimpleItems {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SimpleItems>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_format: Option<String>,
}

/// An operation parameter: either a body schema or a simple typed value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Box<Schema>>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub param_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SimpleItems>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
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
    pub max_items: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<i64>,
    pub unique_items: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<f64>,
    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<Value>,
}

/// A response header.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Header {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub header_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SimpleItems>>,
}

/// A declared response for an operation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Response {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Box<Schema>>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, Header>,
}

/// A single HTTP operation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Operation {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub consumes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub produces: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub responses: IndexMap<String, Response>,
    pub deprecated: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub security: Vec<IndexMap<String, Vec<String>>>,
}

/// One path entry, holding up to one operation per HTTP method.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PathItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
}

impl PathItem {
    /// Operations in the fixed method order used for enumeration.
    pub fn operations(&self) -> impl Iterator<Item = (&'static str, &Operation)> {
        [
            ("GET", self.get.as_ref()),
            ("PUT", self.put.as_ref()),
            ("POST", self.post.as_ref()),
            ("DELETE", self.delete.as_ref()),
            ("OPTIONS", self.options.as_ref()),
            ("HEAD", self.head.as_ref()),
            ("PATCH", self.patch.as_ref()),
        ]
        .into_iter()
        .filter_map(|(m, op)| op.map(|op| (m, op)))
    }
}

/// Document metadata.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Info {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub version: String,
}

/// Root of a Swagger 2.0 document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Swagger {
    pub swagger: String,
    pub info: Info,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub schemes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub consumes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub produces: Vec<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub paths: IndexMap<String, PathItem>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub definitions: IndexMap<String, Schema>,
}
