//! Specification facade: an opaque handle over a parsed Swagger document.
//!
//! The rest of the generator only talks to [`Document`]: definitions lookup,
//! `$ref` resolution, and operation enumeration. The lowering engine may
//! augment the definitions table with freshly invented definitions so that
//! subsequent ref lookups succeed.

pub mod schema;

use std::path::Path;

pub use schema::{
    BoolOrSchema, Header, Info, Items, Operation, Parameter, PathItem, Response, Schema,
    SchemaType, SimpleItems, Swagger, XmlInfo,
};

use indexmap::IndexMap;

use crate::errors::{GenError, GenResult};

/// The fragment prefix for definition references.
const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// A parsed, queryable specification document.
#[derive(Debug, Clone)]
pub struct Document {
    spec: Swagger,
}

/// One enumerated operation: method, path pattern, and the operation body.
#[derive(Debug, Clone, Copy)]
pub struct OperationRef<'a> {
    pub method: &'static str,
    pub path: &'a str,
    pub path_item: &'a PathItem,
    pub operation: &'a Operation,
}

impl Document {
    /// Load a specification from a JSON or YAML file, chosen by extension.
    pub fn load(path: impl AsRef<Path>) -> GenResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| GenError::SpecLoad {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        if is_yaml {
            Self::from_yaml(&content).map_err(|e| GenError::SpecLoad {
                path: path.to_path_buf(),
                source: e.into(),
            })
        } else {
            Self::from_json(&content).map_err(|e| GenError::SpecLoad {
                path: path.to_path_buf(),
                source: e.into(),
            })
        }
    }

    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        Ok(Document {
            spec: serde_json::from_str(content)?,
        })
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        Ok(Document {
            spec: serde_yaml::from_str(content)?,
        })
    }

    /// The root document.
    pub fn spec(&self) -> &Swagger {
        &self.spec
    }

    pub fn definitions(&self) -> &IndexMap<String, Schema> {
        &self.spec.definitions
    }

    pub fn base_path(&self) -> &str {
        self.spec.base_path.as_deref().unwrap_or("/")
    }

    pub fn version(&self) -> &str {
        &self.spec.swagger
    }

    /// Resolve a `#/definitions/<name>` reference to its schema.
    pub fn resolve_ref(&self, reference: &str) -> GenResult<&Schema> {
        let name = reference.strip_prefix(DEFINITIONS_PREFIX).ok_or_else(|| {
            GenError::ref_resolution(
                reference,
                "only #/definitions/<name> references are supported",
            )
        })?;
        self.spec.definitions.get(name).ok_or_else(|| {
            GenError::ref_resolution(reference, format!("no definition named '{}'", name))
        })
    }

    /// Register a freshly invented definition so later refs resolve.
    pub fn insert_definition(&mut self, name: &str, schema: Schema) {
        self.spec.definitions.insert(name.to_string(), schema);
    }

    /// Enumerate all operations: paths in document order, methods in a fixed
    /// order per path.
    pub fn operations(&self) -> Vec<OperationRef<'_>> {
        let mut out = Vec::new();
        for (path, item) in &self.spec.paths {
            for (method, operation) in item.operations() {
                out.push(OperationRef {
                    method,
                    path,
                    path_item: item,
                    operation,
                });
            }
        }
        out
    }
}

/// The basename of a reference fragment: the segment after the last `/`.
pub fn ref_basename(reference: &str) -> &str {
    reference.rsplit('/').next().unwrap_or(reference)
}
