//! Type resolver: classifies one schema node into a [`ResolvedType`].
//!
//! Resolution is pure: the same document and schema always produce the same
//! record, and resolving twice yields equal results. The resolver never
//! recurses into the lowering engine; it only follows `$ref` chains and
//! descends `items`/`additionalProperties` far enough to compute a Go type.

pub mod tables;

use serde::Serialize;

use crate::errors::{GenError, GenResult};
use crate::naming::to_go_name;
use crate::spec::{ref_basename, Document, Items, Schema, SimpleItems};

/// A schema node classified for template consumption.
///
/// The kind flags are not mutually exclusive but obey a few invariants:
/// a map is not a complex object, a tuple is not an array, and a primitive
/// is none of the container kinds.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResolvedType {
    pub is_anonymous: bool,
    pub is_array: bool,
    pub is_map: bool,
    pub is_interface: bool,
    pub is_primitive: bool,
    pub is_custom_formatter: bool,
    pub is_nullable: bool,
    /// A tuple renders as a struct with `P{index}` properties.
    pub is_tuple: bool,
    pub has_additional_items: bool,
    pub is_complex_object: bool,

    pub go_type: String,
    pub swagger_type: String,
    pub swagger_format: String,
}

/// Resolves schemas against a document, naming referenced definitions.
#[derive(Debug, Clone)]
pub struct TypeResolver {
    /// Package prefix for model types, empty when generating in-package.
    pub models_package: String,
    /// Name of the definition currently being generated.
    pub model_name: String,
}

impl TypeResolver {
    pub fn new(models_package: impl Into<String>, model_name: impl Into<String>) -> Self {
        TypeResolver {
            models_package: models_package.into(),
            model_name: model_name.into(),
        }
    }

    /// Qualify a type name with the models package, when one is configured.
    pub fn prefixed(&self, name: &str) -> String {
        if self.models_package.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.models_package, name)
        }
    }

    /// Classify a schema. `None` stands for an absent schema and resolves to
    /// the empty interface. `anonymous` is true when the schema appears
    /// inline rather than as a named definition.
    pub fn resolve(
        &self,
        doc: &Document,
        schema: Option<&Schema>,
        anonymous: bool,
    ) -> GenResult<ResolvedType> {
        let Some(schema) = schema else {
            return Ok(ResolvedType {
                is_interface: true,
                go_type: "interface{}".into(),
                ..Default::default()
            });
        };

        if let Some(reference) = &schema.reference {
            return self.resolve_reference(doc, reference, anonymous);
        }

        if let Some(result) = self.resolve_format(schema) {
            return Ok(result);
        }

        let mut result = ResolvedType {
            is_nullable: schema.x_is_nullable(),
            ..Default::default()
        };
        let tpe = schema.primary_type().unwrap_or("object");
        match tpe {
            "array" => self.resolve_array(doc, schema),

            "file" | "number" | "integer" | "boolean" => {
                result.go_type = tables::go_type_for(tpe).unwrap_or(tpe).to_string();
                result.swagger_type = tpe.to_string();
                if tpe != "file" {
                    result.is_primitive = true;
                    result.is_custom_formatter = false;
                }
                Ok(result)
            }

            "string" => {
                result.go_type = "string".into();
                result.swagger_type = "string".into();
                result.is_primitive = true;
                Ok(result)
            }

            "object" => self.resolve_object(doc, schema, anonymous),

            other => Err(GenError::UnresolvableType {
                type_hint: other.to_string(),
                format: schema.format.clone().unwrap_or_default(),
                location: String::new(),
            }),
        }
    }

    /// Follow a `$ref` chain to its target and name the result after the
    /// first referenced definition.
    fn resolve_reference(
        &self,
        doc: &Document,
        reference: &str,
        anonymous: bool,
    ) -> GenResult<ResolvedType> {
        let mut visited: Vec<String> = Vec::new();
        let mut current = reference.to_string();
        let mut invented: Option<String> = None;

        loop {
            if visited.contains(&current) {
                return Err(GenError::ref_resolution(
                    reference,
                    format!("reference cycle through {}", visited.join(" -> ")),
                ));
            }
            visited.push(current.clone());

            let target = doc.resolve_ref(&current)?;
            if invented.is_none() {
                let name = target
                    .x_go_name()
                    .map(str::to_string)
                    .unwrap_or_else(|| to_go_name(ref_basename(&current)));
                invented = Some(name);
            }
            if let Some(next) = &target.reference {
                current = next.clone();
                continue;
            }

            let mut result = self.resolve(doc, Some(target), false)?;
            result.go_type = self.prefixed(invented.as_deref().unwrap_or_default());
            if !anonymous {
                result.is_map = false;
                result.is_complex_object = true;
            }
            return Ok(result);
        }
    }

    /// A known format yields a primitive, possibly with a formatter wrapper.
    fn resolve_format(&self, schema: &Schema) -> Option<ResolvedType> {
        let format = schema.format.as_deref().filter(|f| !f.is_empty())?;
        let stripped = format.replace('-', "");
        let go_type = tables::go_type_for(&stripped)?;
        Some(ResolvedType {
            swagger_type: schema.primary_type().unwrap_or("string").to_string(),
            swagger_format: format.to_string(),
            go_type: go_type.to_string(),
            is_primitive: true,
            is_nullable: schema.x_is_nullable(),
            is_custom_formatter: tables::is_custom_formatter(go_type),
            ..Default::default()
        })
    }

    fn resolve_array(&self, doc: &Document, schema: &Schema) -> GenResult<ResolvedType> {
        let mut result = ResolvedType {
            is_array: true,
            swagger_type: "array".into(),
            ..Default::default()
        };
        if let Some(additional) = schema.additional_items.as_deref() {
            result.has_additional_items = additional.wants();
        }
        match schema.items.as_deref() {
            None => {
                result.go_type = "[]interface{}".into();
                Ok(result)
            }
            Some(Items::Tuple(_)) => {
                result.is_array = false;
                result.is_tuple = true;
                Ok(result)
            }
            Some(Items::Single(inner)) => {
                let element = self.resolve(doc, Some(inner), true)?;
                result.go_type = format!("[]{}", element.go_type);
                Ok(result)
            }
        }
    }

    fn resolve_object(
        &self,
        doc: &Document,
        schema: &Schema,
        anonymous: bool,
    ) -> GenResult<ResolvedType> {
        let mut result = ResolvedType {
            is_anonymous: anonymous,
            ..Default::default()
        };

        if !anonymous {
            result.swagger_type = "object".into();
            result.go_type = self.prefixed(&to_go_name(&self.model_name));
        }

        // composition is handled by the lowering engine, not here
        if !schema.all_of.is_empty() {
            result.go_type = self.prefixed(&to_go_name(&self.model_name));
            result.is_complex_object = true;
            result.is_nullable = schema.all_of.iter().any(|s| s.x_is_nullable());
            result.swagger_type = "object".into();
            return Ok(result);
        }

        if !schema.properties.is_empty() {
            result.is_nullable = schema.x_is_nullable();
            result.is_complex_object = true;
            // keep going: additional properties may still apply
        }

        if let Some(value) = schema.additional_properties_schema() {
            let element = self.resolve(doc, Some(value), true)?;
            result.go_type = format!("map[string]{}", element.go_type);
            result.is_map = !result.is_complex_object;
            result.swagger_type = "object".into();
            result.is_nullable = false;
            return Ok(result);
        }

        if !schema.properties.is_empty() {
            return Ok(result);
        }

        result.go_type = "map[string]interface{}".into();
        result.is_map = !result.is_complex_object;
        result.swagger_type = "object".into();
        result.is_nullable = false;
        Ok(result)
    }
}

/// Resolve the Go type of a simple (non-body) value: headers and
/// query/path/form parameters.
pub fn resolve_simple_type(tn: &str, format: &str, items: Option<&SimpleItems>) -> String {
    if !format.is_empty() {
        if let Some(go_type) = tables::go_type_for(&format.replace('-', "")) {
            return go_type.to_string();
        }
    }
    if let Some(go_type) = tables::go_type_for(tn) {
        return go_type.to_string();
    }
    if tn == "array" {
        let Some(items) = items else {
            return "[]interface{}".to_string();
        };
        return format!(
            "[]{}",
            resolve_simple_type(
                items.item_type.as_deref().unwrap_or_default(),
                items.format.as_deref().unwrap_or_default(),
                items.items.as_deref(),
            )
        );
    }
    tn.to_string()
}
