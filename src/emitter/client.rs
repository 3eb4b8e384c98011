//! Renders assembled operations as Go client source.

use crate::assembler::{GenApp, GenOperation, GenOperationGroup, GenResponse};
use crate::errors::GenResult;
use crate::naming::to_go_name;

use super::{import_block, GENERATED_HEADER};

/// Emits parameter, response, per-tag client, and facade files.
pub struct ClientEmitter {
    client_package: String,
}

impl ClientEmitter {
    pub fn new(client_package: impl Into<String>) -> Self {
        ClientEmitter {
            client_package: client_package.into(),
        }
    }

    /// The parameters struct for one operation.
    pub fn emit_parameters(&self, operation: &GenOperation) -> GenResult<String> {
        let mut out = self.file_header(&operation.package);
        out.push_str(&import_block(&operation.default_imports));

        out.push_str(&format!(
            "// {}Params contains all the bound parameters for {}\n",
            operation.go_name, operation.name
        ));
        out.push_str(&format!("type {}Params struct {{\n", operation.go_name));
        for parameter in &operation.parameters {
            if !parameter.description.is_empty() {
                out.push_str(&format!("\t// {}\n", parameter.description));
            }
            out.push_str(&format!(
                "\t{} {} `in:\"{}\"`\n",
                parameter.go_name, parameter.go_type, parameter.location
            ));
        }
        out.push_str("}\n\n");
        out.push_str(&format!(
            "// New{}Params creates a new, empty parameters value.\nfunc New{}Params() *{}Params {{\n\treturn &{}Params{{}}\n}}\n",
            operation.go_name, operation.go_name, operation.go_name, operation.go_name
        ));
        Ok(out)
    }

    /// One response type per declared status, plus the default when present.
    pub fn emit_responses(&self, operation: &GenOperation) -> GenResult<String> {
        let mut out = self.file_header(&operation.package);
        out.push_str(&import_block(&operation.default_imports));

        for response in &operation.responses {
            self.emit_response(&mut out, operation, response);
        }
        if let Some(default) = &operation.default_response {
            self.emit_response(&mut out, operation, default);
        }
        Ok(out)
    }

    fn emit_response(&self, out: &mut String, operation: &GenOperation, response: &GenResponse) {
        let type_name = format!("{}{}", operation.go_name, response_suffix(response));
        out.push_str(&format!(
            "// {} described as: {}\n",
            type_name,
            response.description.trim()
        ));
        out.push_str(&format!("type {} struct {{\n", type_name));
        if let Some(schema) = &response.schema {
            let go_type = if schema.resolved.go_type.is_empty() {
                "interface{}".to_string()
            } else {
                schema.resolved.go_type.clone()
            };
            out.push_str(&format!("\tPayload {}\n", go_type));
        }
        out.push_str("}\n\n");
    }

    /// The per-tag client with one method per operation.
    pub fn emit_group_client(&self, group: &GenOperationGroup) -> GenResult<String> {
        let mut out = self.file_header(&group.name);

        let mut imports = vec![
            "github.com/go-openapi/runtime".to_string(),
            "github.com/go-openapi/strfmt".to_string(),
        ];
        imports.extend(group.default_imports.iter().cloned());
        out.push_str(&import_block(&imports));

        out.push_str(&format!(
            "// Client for the {} operations.\ntype Client struct {{\n\ttransport runtime.ClientTransport\n\tformats   strfmt.Registry\n}}\n\n",
            group.name
        ));
        out.push_str("// New creates an operations client on the given transport.\nfunc New(transport runtime.ClientTransport, formats strfmt.Registry) *Client {\n\treturn &Client{transport: transport, formats: formats}\n}\n");

        for operation in &group.operations {
            self.emit_operation_method(&mut out, operation);
        }
        Ok(out)
    }

    fn emit_operation_method(&self, out: &mut String, operation: &GenOperation) {
        let success = operation
            .responses
            .iter()
            .find(|r| r.is_success)
            .map(|r| format!("{}{}", operation.go_name, response_suffix(r)));

        out.push('\n');
        if !operation.summary.is_empty() {
            out.push_str(&format!("// {} {}\n", operation.go_name, operation.summary));
        } else {
            out.push_str(&format!(
                "// {} performs a {} request against {}\n",
                operation.go_name, operation.method, operation.path
            ));
        }
        let signature = match &success {
            Some(success) => format!(
                "func (a *Client) {}(params *{}Params) (*{}, error)",
                operation.go_name, operation.go_name, success
            ),
            None => format!(
                "func (a *Client) {}(params *{}Params) error",
                operation.go_name, operation.go_name
            ),
        };
        out.push_str(&signature);
        out.push_str(" {\n");
        out.push_str(&format!(
            "\tresult, err := a.transport.Submit(&runtime.ClientOperation{{\n\t\tID:          {:?},\n\t\tMethod:      {:?},\n\t\tPathPattern: {:?},\n\t\tParams:      params,\n\t}})\n",
            operation.name, operation.method, operation.path
        ));
        match &success {
            Some(success) => {
                out.push_str("\tif err != nil {\n\t\treturn nil, err\n\t}\n");
                out.push_str(&format!("\treturn result.(*{}), nil\n", success));
            }
            None => {
                out.push_str("\t_ = result\n\treturn err\n");
            }
        }
        out.push_str("}\n");
    }

    /// One facade bundling every per-tag client.
    pub fn emit_facade(&self, app: &GenApp) -> GenResult<String> {
        let mut out = self.file_header(&self.client_package);

        let mut imports = vec![
            "github.com/go-openapi/runtime".to_string(),
            "github.com/go-openapi/strfmt".to_string(),
        ];
        imports.extend(app.default_imports.iter().cloned());
        out.push_str(&import_block(&imports));

        let name = to_go_name(&app.name);
        out.push_str(&format!(
            "// {} is a client for the whole API, one field per operation group.\ntype {} struct {{\n",
            name, name
        ));
        for group in &app.operation_groups {
            out.push_str(&format!(
                "\t{} *{}.Client\n",
                to_go_name(&group.name),
                group.name
            ));
        }
        out.push_str("}\n\n");

        out.push_str(&format!(
            "// New{} wires every operation group onto one transport.\nfunc New{}(transport runtime.ClientTransport, formats strfmt.Registry) *{} {{\n\treturn &{}{{\n",
            name, name, name, name
        ));
        for group in &app.operation_groups {
            out.push_str(&format!(
                "\t\t{}: {}.New(transport, formats),\n",
                to_go_name(&group.name),
                group.name
            ));
        }
        out.push_str("\t}\n}\n");
        Ok(out)
    }

    fn file_header(&self, package: &str) -> String {
        format!("{}\npackage {}\n\n", GENERATED_HEADER, package)
    }
}

/// A Go-friendly suffix for a response type name.
fn response_suffix(response: &GenResponse) -> String {
    match response.code {
        Some(200) => "OK".to_string(),
        Some(201) => "Created".to_string(),
        Some(202) => "Accepted".to_string(),
        Some(204) => "NoContent".to_string(),
        Some(400) => "BadRequest".to_string(),
        Some(401) => "Unauthorized".to_string(),
        Some(403) => "Forbidden".to_string(),
        Some(404) => "NotFound".to_string(),
        Some(409) => "Conflict".to_string(),
        Some(422) => "UnprocessableEntity".to_string(),
        Some(500) => "InternalServerError".to_string(),
        Some(code) => format!("Status{}", code),
        None => "Default".to_string(),
    }
}
