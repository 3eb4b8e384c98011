//! Renders lowered definitions as Go model source.

use crate::errors::GenResult;
use crate::lowering::{GenDefinition, GenSchema};
use crate::naming::to_go_name;

use super::{import_block, GENERATED_HEADER};

/// Emits one `.go` model file per definition.
pub struct ModelEmitter {
    package: String,
}

impl ModelEmitter {
    pub fn new(package: impl Into<String>) -> Self {
        ModelEmitter {
            package: package.into(),
        }
    }

    pub fn emit(&self, definition: &GenDefinition) -> GenResult<String> {
        let mut out = String::new();
        out.push_str(GENERATED_HEADER);
        out.push('\n');
        out.push_str(&format!("package {}\n\n", self.package));
        out.push_str(&import_block(&definition.default_imports));

        self.emit_schema(&mut out, &definition.schema);
        for extra in &definition.extra_schemas {
            out.push('\n');
            self.emit_schema(&mut out, extra);
        }
        Ok(out)
    }

    fn emit_schema(&self, out: &mut String, gen: &GenSchema) {
        let name = to_go_name(&gen.name);
        let doc = if !gen.title.is_empty() {
            gen.title.clone()
        } else if !gen.description.is_empty() {
            gen.description.lines().next().unwrap_or_default().to_string()
        } else {
            format!("{} {}", name, gen.name)
        };
        out.push_str(&format!("// {} {}\n", name, doc.trim_start_matches(&name).trim()));

        if gen.resolved.is_tuple {
            self.emit_tuple(out, gen, &name);
        } else if gen.is_additional_properties {
            self.emit_struct(out, gen, &name, true);
        } else if !gen.properties.is_empty() || !gen.all_of.is_empty() {
            self.emit_struct(out, gen, &name, false);
        } else if gen.resolved.go_type.is_empty() || gen.resolved.is_interface {
            out.push_str(&format!("type {} interface{{}}\n", name));
        } else {
            // primitive alias, map, or array definition
            out.push_str(&format!("type {} {}\n", name, gen.resolved.go_type));
        }
    }

    fn emit_struct(&self, out: &mut String, gen: &GenSchema, name: &str, with_map: bool) {
        out.push_str(&format!("type {} struct {{\n", name));
        for member in &gen.all_of {
            if !member.resolved.go_type.is_empty() && member.properties.is_empty() {
                out.push_str(&format!("\t{}\n", member.resolved.go_type));
            } else {
                for property in &member.properties {
                    self.emit_field(out, property);
                }
            }
        }
        for property in &gen.properties {
            self.emit_field(out, property);
        }
        if with_map {
            if let Some(value) = &gen.additional_properties {
                out.push_str(&format!(
                    "\n\t// values not covered by the declared properties\n\tAdditionalProperties map[string]{} `json:\"-\"`\n",
                    field_type(value)
                ));
            }
        }
        out.push_str("}\n");
    }

    fn emit_tuple(&self, out: &mut String, gen: &GenSchema, name: &str) {
        out.push_str(&format!("type {} struct {{\n", name));
        for property in &gen.properties {
            self.emit_field(out, property);
        }
        if let Some(additional) = &gen.additional_items {
            out.push_str(&format!(
                "\n\t// {}Items holds the members past the declared tuple elements\n\t{}Items []{} `json:\"-\"`\n",
                name,
                name,
                field_type(additional)
            ));
        }
        out.push_str("}\n");
    }

    fn emit_field(&self, out: &mut String, property: &GenSchema) {
        if !property.description.is_empty() {
            for line in property.description.lines() {
                out.push_str(&format!("\t// {}\n", line));
            }
        }
        let mut tag = format!("json:\"{}", property.name);
        if !property.validations.required {
            tag.push_str(",omitempty");
        }
        tag.push('"');
        if !property.xml_name.is_empty() {
            tag.push_str(&format!(" xml:\"{}\"", property.xml_name));
        }
        out.push_str(&format!(
            "\t{} {} `{}`\n",
            to_go_name(&property.name),
            field_type(property),
            tag
        ));
    }
}

/// The Go type used for a field of this schema. Nullable scalar values
/// become pointers so absence is representable.
fn field_type(gen: &GenSchema) -> String {
    let go_type = if gen.resolved.go_type.is_empty() {
        "interface{}".to_string()
    } else {
        gen.resolved.go_type.clone()
    };
    if gen.resolved.is_nullable && !go_type.starts_with("[]") && !go_type.starts_with("map[") {
        format!("*{}", go_type)
    } else {
        go_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lowering::lower_definition;
    use crate::spec::Document;

    fn emit(definitions: &str, name: &str) -> String {
        let json = format!(
            r#"{{"swagger": "2.0", "info": {{"title": "t", "version": "1"}}, "definitions": {definitions}}}"#
        );
        let mut doc = Document::from_json(&json).unwrap();
        let def = lower_definition(&mut doc, name, "models").unwrap();
        ModelEmitter::new("models").emit(&def).unwrap()
    }

    #[test]
    fn test_emit_struct_with_tags() {
        let source = emit(
            r#"{"Thing": {
                "type": "object",
                "required": ["id"],
                "properties": {
                    "id": {"type": "integer", "format": "int64", "minimum": 1},
                    "label": {"type": "string"}
                }
            }}"#,
            "Thing",
        );
        assert!(source.contains("package models"));
        assert!(source.contains("type Thing struct {"));
        assert!(source.contains("ID int64 `json:\"id\"`"));
        assert!(source.contains("Label string `json:\"label,omitempty\"`"));
        assert!(source.contains("github.com/go-openapi/validate"));
    }

    #[test]
    fn test_emit_map_definition() {
        let source = emit(
            r#"{"M": {"additionalProperties": {"type": "string"}}}"#,
            "M",
        );
        assert!(source.contains("type M map[string]string"));
    }

    #[test]
    fn test_emit_embedded_composition() {
        let source = emit(
            r##"{
                "Animal": {"type": "object", "properties": {"name": {"type": "string"}}},
                "Dog": {"$ref": "#/definitions/Animal"}
            }"##,
            "Dog",
        );
        assert!(source.contains("type Dog struct {"));
        assert!(source.contains("\tAnimal\n"));
    }

    #[test]
    fn test_emit_lifted_extra_schema() {
        let source = emit(
            r#"{"Order": {
                "type": "object",
                "properties": {
                    "item": {"type": "object", "properties": {"sku": {"type": "string"}}}
                }
            }}"#,
            "Order",
        );
        assert!(source.contains("type Order struct {"));
        assert!(source.contains("Item OrderItem `json:\"item,omitempty\"`"));
        assert!(source.contains("type OrderItem struct {"));
    }

    #[test]
    fn test_emit_tuple_with_additional_items() {
        let source = emit(
            r#"{"Pair": {
                "type": "array",
                "items": [{"type": "string"}, {"type": "integer"}],
                "additionalItems": {"type": "boolean"}
            }}"#,
            "Pair",
        );
        assert!(source.contains("type Pair struct {"));
        assert!(source.contains("P0 string"));
        assert!(source.contains("P1 int64"));
        assert!(source.contains("PairItems []bool"));
    }

    #[test]
    fn test_emit_nullable_pointer() {
        let source = emit(
            r#"{"Box": {
                "type": "object",
                "properties": {
                    "weight": {"type": "number", "x-isnullable": true}
                }
            }}"#,
            "Box",
        );
        assert!(source.contains("Weight *float64"));
    }

    #[test]
    fn test_emit_primitive_alias() {
        let source = emit(
            r##"{
                "Age": {"type": "integer", "format": "int32"},
                "DogAge": {"$ref": "#/definitions/Age"}
            }"##,
            "DogAge",
        );
        assert!(source.contains("type DogAge Age"));
    }
}
