//! Operation and application assembler.
//!
//! Gathers lowered definitions and the operations declared under `paths`
//! into a [`GenApp`]: operations grouped by their first tag, parameters and
//! responses lowered independently, groups and operations in stable order.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::errors::GenResult;
use crate::generate::GenOpts;
use crate::lowering::{lower_definition, lower_inline, GenDefinition, GenSchema, SharedValidations};
use crate::naming::{to_file_name, to_go_name, to_var_name};
use crate::resolver::{resolve_simple_type, tables};
use crate::spec::{Document, Operation, Parameter};

/// One gathered parameter, either a lowered body schema or a simple value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GenParameter {
    pub name: String,
    pub go_name: String,
    pub var_name: String,
    /// Where the parameter lives: path, query, header, formData, or body.
    pub location: String,
    pub go_type: String,
    pub description: String,
    pub is_body: bool,
    /// String conversion helper for simple values, empty for strings.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub converter: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub formatter: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<GenSchema>,
    #[serde(flatten)]
    pub validations: SharedValidations,
}

/// One gathered response, keyed by status code; `default` has no code.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GenResponse {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    pub is_success: bool,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<GenSchema>,
}

/// One operation with its gathered parameters and responses.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GenOperation {
    pub name: String,
    pub go_name: String,
    pub package: String,
    pub method: String,
    pub path: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub summary: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<GenParameter>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub responses: Vec<GenResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_response: Option<GenResponse>,
    pub authorized: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub principal: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub default_imports: Vec<String>,
}

/// Operations sharing a tag, emitted as one client package.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GenOperationGroup {
    pub name: String,
    pub operations: Vec<GenOperation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub default_imports: Vec<String>,
}

/// The fully assembled application, ready for template rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GenApp {
    pub name: String,
    pub package: String,
    pub base_path: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub models: Vec<GenDefinition>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub operation_groups: Vec<GenOperationGroup>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub default_imports: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub principal: String,
}

/// The definition names to generate: the requested ones, or every
/// definition in document order when none were requested.
pub fn gather_model_names(doc: &Document, requested: &[String]) -> Vec<String> {
    if requested.is_empty() {
        doc.definitions().keys().cloned().collect()
    } else {
        requested.to_vec()
    }
}

/// Assemble the whole application: models, then operations grouped by tag.
pub fn assemble_app(
    doc: &mut Document,
    name: Option<&str>,
    model_names: &[String],
    operation_ids: &[String],
    opts: &GenOpts,
) -> GenResult<GenApp> {
    let app_name = app_name_or_default(doc, name);
    let base_path = doc.base_path().to_string();
    let model_import = format!("{}/{}", opts.base_import(), opts.model_package);

    let mut models = Vec::new();
    for model_name in gather_model_names(doc, model_names) {
        models.push(lower_definition(doc, &model_name, &opts.model_package)?);
    }

    // operations must be collected up front: lowering body schemas may
    // insert invented definitions into the document
    let operations: Vec<(String, String, Operation, Vec<Parameter>)> = doc
        .operations()
        .iter()
        .map(|op| {
            let mut parameters = op.path_item.parameters.clone();
            parameters.extend(op.operation.parameters.iter().cloned());
            (
                op.method.to_string(),
                op.path.to_string(),
                op.operation.clone(),
                parameters,
            )
        })
        .collect();

    let mut groups: IndexMap<String, Vec<GenOperation>> = IndexMap::new();
    for (method, path, operation, parameters) in operations {
        let op_name = operation
            .operation_id
            .clone()
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| synthesize_operation_name(&method, &path));
        if !operation_ids.is_empty() && !operation_ids.contains(&op_name) {
            continue;
        }

        let package = operation
            .tags
            .first()
            .map(|t| to_file_name(t))
            .unwrap_or_else(|| opts.api_package.clone());

        let gen = assemble_operation(
            doc,
            &op_name,
            &package,
            &method,
            &path,
            &operation,
            &parameters,
            &model_import,
            opts,
            &mut models,
        )?;
        groups.entry(package).or_default().push(gen);
    }

    // deterministic output: groups by name, operations by id
    let mut group_names: Vec<String> = groups.keys().cloned().collect();
    group_names.sort();
    let mut operation_groups = Vec::with_capacity(group_names.len());
    for group_name in group_names {
        let mut operations = groups.shift_remove(&group_name).unwrap_or_default();
        operations.sort_by(|a, b| a.name.cmp(&b.name));
        operation_groups.push(GenOperationGroup {
            name: group_name,
            operations,
            default_imports: vec![model_import.clone()],
        });
    }

    let mut default_imports = vec![model_import];
    for group in &operation_groups {
        default_imports.push(format!(
            "{}/{}/{}",
            opts.base_import(),
            opts.client_package,
            group.name
        ));
    }

    Ok(GenApp {
        name: app_name,
        package: opts.api_package.clone(),
        base_path,
        models,
        operation_groups,
        default_imports,
        principal: opts.principal.clone().unwrap_or_default(),
    })
}

#[allow(clippy::too_many_arguments)]
fn assemble_operation(
    doc: &mut Document,
    op_name: &str,
    package: &str,
    method: &str,
    path: &str,
    operation: &Operation,
    parameters: &[Parameter],
    model_import: &str,
    opts: &GenOpts,
    models: &mut Vec<GenDefinition>,
) -> GenResult<GenOperation> {
    let mut gen_parameters = Vec::with_capacity(parameters.len());
    for parameter in parameters {
        gen_parameters.push(assemble_parameter(doc, op_name, parameter, opts, models)?);
    }

    let mut responses = Vec::new();
    let mut default_response = None;
    for (code, response) in &operation.responses {
        let schema = match response.schema.as_deref() {
            Some(schema) => {
                let (gen, _extras) = lower_inline(
                    doc,
                    &opts.model_package,
                    &format!("{} {} body", op_name, code),
                    schema.clone(),
                )?;
                Some(gen)
            }
            None => None,
        };
        let parsed = code.parse::<u16>().ok();
        let gen = GenResponse {
            name: code.clone(),
            code: parsed,
            is_success: parsed.is_some_and(|c| (200..300).contains(&c)),
            description: response.description.clone(),
            schema,
        };
        if parsed.is_none() {
            default_response = Some(gen);
        } else {
            responses.push(gen);
        }
    }
    responses.sort_by_key(|r| r.code);

    let authorized = !operation.security.is_empty();
    Ok(GenOperation {
        name: op_name.to_string(),
        go_name: to_go_name(op_name),
        package: package.to_string(),
        method: method.to_string(),
        path: path.to_string(),
        summary: operation.summary.clone().unwrap_or_default(),
        description: operation.description.clone().unwrap_or_default(),
        parameters: gen_parameters,
        responses,
        default_response,
        authorized,
        principal: if authorized {
            opts.principal
                .clone()
                .unwrap_or_else(|| "interface{}".to_string())
        } else {
            String::new()
        },
        default_imports: vec![model_import.to_string()],
    })
}

fn assemble_parameter(
    doc: &mut Document,
    op_name: &str,
    parameter: &Parameter,
    opts: &GenOpts,
    models: &mut Vec<GenDefinition>,
) -> GenResult<GenParameter> {
    let is_body = parameter.location == "body";

    let (go_type, schema) = if is_body {
        let mut body = parameter
            .schema
            .as_deref()
            .cloned()
            .unwrap_or_default();
        // an inline object body becomes a named model of its own
        if body.reference.is_none() && !body.properties.is_empty() {
            let invented = to_go_name(&format!("{} {} body", op_name, parameter.name));
            doc.insert_definition(&invented, body.clone());
            models.push(lower_definition(doc, &invented, &opts.model_package)?);
            body = crate::spec::Schema::reference_to(&invented);
        }
        let (gen, _extras) = lower_inline(
            doc,
            &opts.model_package,
            &parameter.name,
            body,
        )?;
        (gen.resolved.go_type.clone(), Some(gen))
    } else {
        (
            resolve_simple_type(
                parameter.param_type.as_deref().unwrap_or_default(),
                parameter.format.as_deref().unwrap_or_default(),
                parameter.items.as_deref(),
            ),
            None,
        )
    };

    Ok(GenParameter {
        name: parameter.name.clone(),
        go_name: to_go_name(&parameter.name),
        var_name: to_var_name(&parameter.name),
        location: parameter.location.clone(),
        converter: tables::string_converter(&go_type).unwrap_or_default().to_string(),
        formatter: tables::string_formatter(&go_type).unwrap_or_default().to_string(),
        go_type,
        description: parameter.description.clone().unwrap_or_default(),
        is_body,
        default: parameter.default.clone(),
        schema,
        validations: parameter_validations(parameter),
    })
}

fn parameter_validations(parameter: &Parameter) -> SharedValidations {
    let required = parameter.required && parameter.default.is_none();
    let has_number_validation = parameter.maximum.is_some()
        || parameter.minimum.is_some()
        || parameter.multiple_of.is_some();
    let has_string_validation = parameter.max_length.is_some()
        || parameter.min_length.is_some()
        || parameter.pattern.is_some();
    let has_slice_validations =
        parameter.max_items.is_some() || parameter.min_items.is_some() || parameter.unique_items;
    let has_validations = required
        || has_number_validation
        || has_string_validation
        || has_slice_validations
        || !parameter.enum_values.is_empty();

    SharedValidations {
        required,
        maximum: parameter.maximum,
        exclusive_maximum: parameter.exclusive_maximum,
        minimum: parameter.minimum,
        exclusive_minimum: parameter.exclusive_minimum,
        max_length: parameter.max_length,
        min_length: parameter.min_length,
        pattern: parameter.pattern.clone(),
        multiple_of: parameter.multiple_of,
        enum_values: parameter.enum_values.clone(),
        items_enum: Vec::new(),
        max_items: parameter.max_items,
        min_items: parameter.min_items,
        unique_items: parameter.unique_items,
        has_validations,
        has_slice_validations,
    }
}

fn app_name_or_default(doc: &Document, name: Option<&str>) -> String {
    if let Some(name) = name.filter(|n| !n.is_empty()) {
        return to_go_name(name);
    }
    let title = &doc.spec().info.title;
    if title.is_empty() {
        "Swagger".to_string()
    } else {
        to_go_name(title)
    }
}

fn synthesize_operation_name(method: &str, path: &str) -> String {
    let cleaned = path.replace(['/', '{', '}', '-', '_', '.'], " ");
    format!("{} {}", method.to_lowercase(), cleaned.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SPEC: &str = r##"{
        "swagger": "2.0",
        "info": {"title": "pet store", "version": "1.0"},
        "basePath": "/v2",
        "paths": {
            "/pets": {
                "post": {
                    "operationId": "createPet",
                    "tags": ["pets"],
                    "security": [{"api_key": []}],
                    "parameters": [
                        {"name": "body", "in": "body", "required": true, "schema": {"$ref": "#/definitions/Pet"}}
                    ],
                    "responses": {
                        "201": {"description": "created", "schema": {"$ref": "#/definitions/Pet"}},
                        "default": {"description": "error"}
                    }
                },
                "get": {
                    "operationId": "listPets",
                    "tags": ["pets"],
                    "parameters": [
                        {"name": "limit", "in": "query", "type": "integer", "format": "int32", "maximum": 100}
                    ],
                    "responses": {"200": {"description": "ok"}}
                }
            },
            "/store/orders": {
                "get": {
                    "operationId": "listOrders",
                    "tags": ["store"],
                    "responses": {"200": {"description": "ok"}}
                }
            },
            "/untagged": {
                "get": {"responses": {"200": {"description": "ok"}}}
            }
        },
        "definitions": {
            "Pet": {"type": "object", "required": ["name"], "properties": {"name": {"type": "string"}}}
        }
    }"##;

    fn assemble() -> GenApp {
        let mut doc = Document::from_json(SPEC).unwrap();
        let opts = GenOpts::default();
        assemble_app(&mut doc, None, &[], &[], &opts).unwrap()
    }

    #[test]
    fn test_groups_sorted_by_name() {
        let app = assemble();
        let names: Vec<&str> = app.operation_groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["operations", "pets", "store"]);
    }

    #[test]
    fn test_operations_sorted_within_group() {
        let app = assemble();
        let pets = &app.operation_groups[1];
        let names: Vec<&str> = pets.operations.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["createPet", "listPets"]);
    }

    #[test]
    fn test_app_metadata() {
        let app = assemble();
        assert_eq!(app.name, "PetStore");
        assert_eq!(app.base_path, "/v2");
        assert_eq!(app.models.len(), 1);
        assert_eq!(app.models[0].schema.name, "Pet");
    }

    #[test]
    fn test_body_parameter_lowered() {
        let app = assemble();
        let create = &app.operation_groups[1].operations[0];
        assert_eq!(create.name, "createPet");
        assert!(create.authorized);
        assert_eq!(create.principal, "interface{}");

        let body = &create.parameters[0];
        assert!(body.is_body);
        assert_eq!(body.go_type, "models.Pet");
        assert!(body.validations.required);
        assert!(body.schema.is_some());
    }

    #[test]
    fn test_simple_parameter_typed_and_converted() {
        let app = assemble();
        let list = &app.operation_groups[1].operations[1];
        let limit = &list.parameters[0];
        assert_eq!(limit.go_type, "int32");
        assert_eq!(limit.converter, "swag.ConvertInt32");
        assert_eq!(limit.go_name, "Limit");
        assert_eq!(limit.var_name, "limit");
        assert!(limit.validations.has_validations);
        assert_eq!(limit.validations.maximum, Some(100.0));
        assert!(!limit.validations.required);
    }

    #[test]
    fn test_responses_sorted_default_extracted() {
        let app = assemble();
        let create = &app.operation_groups[1].operations[0];
        assert_eq!(create.responses.len(), 1);
        assert_eq!(create.responses[0].code, Some(201));
        assert!(create.responses[0].is_success);
        assert_eq!(
            create.responses[0].schema.as_ref().unwrap().resolved.go_type,
            "models.Pet"
        );
        assert!(create.default_response.is_some());
        assert!(create.default_response.as_ref().unwrap().code.is_none());
    }

    #[test]
    fn test_untagged_operation_gets_api_package_and_synthesized_name() {
        let app = assemble();
        let default_group = &app.operation_groups[0];
        assert_eq!(default_group.name, "operations");
        assert_eq!(default_group.operations[0].name, "get untagged");
        assert_eq!(default_group.operations[0].go_name, "GetUntagged");
    }

    #[test]
    fn test_inline_body_promoted_to_model() {
        let spec = r#"{
            "swagger": "2.0",
            "info": {"title": "t", "version": "1"},
            "paths": {
                "/things": {
                    "post": {
                        "operationId": "createThing",
                        "parameters": [
                            {"name": "payload", "in": "body", "schema": {
                                "type": "object",
                                "properties": {"label": {"type": "string"}}
                            }}
                        ],
                        "responses": {"201": {"description": "created"}}
                    }
                }
            }
        }"#;
        let mut doc = Document::from_json(spec).unwrap();
        let opts = GenOpts::default();
        let app = assemble_app(&mut doc, None, &[], &[], &opts).unwrap();

        let promoted = app
            .models
            .iter()
            .find(|m| m.schema.name == "CreateThingPayloadBody")
            .expect("promoted body model");
        assert!(promoted.schema.property("label").is_some());

        let body = &app.operation_groups[0].operations[0].parameters[0];
        assert_eq!(body.go_type, "models.CreateThingPayloadBody");
    }

    #[test]
    fn test_operation_filter() {
        let mut doc = Document::from_json(SPEC).unwrap();
        let opts = GenOpts::default();
        let app =
            assemble_app(&mut doc, None, &[], &["listPets".to_string()], &opts).unwrap();
        let all: Vec<&str> = app
            .operation_groups
            .iter()
            .flat_map(|g| g.operations.iter().map(|o| o.name.as_str()))
            .collect();
        assert_eq!(all, vec!["listPets"]);
    }

    #[test]
    fn test_assembly_is_deterministic() {
        let first = assemble();
        let second = assemble();
        assert_eq!(first, second);
    }
}
