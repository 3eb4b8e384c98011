//! Generation options and the top-level entry points.
//!
//! These orchestrate the pipeline: load the document, lower definitions,
//! assemble the application, then either dump the tree or render files.

use std::path::PathBuf;

use tracing::info;

use crate::assembler::{assemble_app, gather_model_names};
use crate::dump;
use crate::emitter::{write_to_file, ClientEmitter, ModelEmitter};
use crate::errors::GenResult;
use crate::lowering::{lower_definition, GenDefinition};
use crate::spec::Document;

/// Recognised generation options.
#[derive(Debug, Clone)]
pub struct GenOpts {
    /// Path to the specification document (JSON or YAML).
    pub spec: PathBuf,
    /// Output directory.
    pub target: PathBuf,
    pub api_package: String,
    pub model_package: String,
    pub server_package: String,
    pub client_package: String,
    /// Model used as the authenticated subject for authorized routes.
    pub principal: Option<String>,
    /// Emit the canonical JSON tree to stdout instead of writing files.
    pub dump_data: bool,
}

impl Default for GenOpts {
    fn default() -> Self {
        GenOpts {
            spec: PathBuf::new(),
            target: PathBuf::from("."),
            api_package: "operations".to_string(),
            model_package: "models".to_string(),
            server_package: "restapi".to_string(),
            client_package: "client".to_string(),
            principal: None,
            dump_data: false,
        }
    }
}

impl GenOpts {
    /// Base import path for generated packages, derived from the target.
    pub fn base_import(&self) -> String {
        self.target
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(".")
            .to_string()
    }
}

/// Generate model files for the named definitions, or for every definition
/// in the document when none are named.
pub fn generate_definitions(model_names: &[String], opts: &GenOpts) -> GenResult<()> {
    let mut doc = Document::load(&opts.spec)?;
    let names = gather_model_names(&doc, model_names);

    let mut definitions: Vec<GenDefinition> = Vec::with_capacity(names.len());
    for name in &names {
        definitions.push(lower_definition(&mut doc, name, &opts.model_package)?);
    }

    if opts.dump_data {
        println!("{}", dump::to_canonical_json(&definitions)?);
        return Ok(());
    }

    let emitter = ModelEmitter::new(&opts.model_package);
    let model_dir = opts.target.join(&opts.model_package);
    for (name, definition) in names.iter().zip(&definitions) {
        let rendered = emitter.emit(definition)?;
        write_to_file(&model_dir, name, rendered.as_bytes())?;
        info!(model = %name, "generated model");
    }
    Ok(())
}

/// Generate a client: models, per-tag operation clients, and a facade.
pub fn generate_client(
    name: Option<&str>,
    model_names: &[String],
    operation_ids: &[String],
    opts: &GenOpts,
) -> GenResult<()> {
    let mut doc = Document::load(&opts.spec)?;
    let app = assemble_app(&mut doc, name, model_names, operation_ids, opts)?;

    if opts.dump_data {
        println!("{}", dump::to_canonical_json(&app)?);
        return Ok(());
    }

    let model_emitter = ModelEmitter::new(&opts.model_package);
    let model_dir = opts.target.join(&opts.model_package);
    for definition in &app.models {
        let rendered = model_emitter.emit(definition)?;
        write_to_file(&model_dir, &definition.schema.name, rendered.as_bytes())?;
        info!(model = %definition.schema.name, "generated model");
    }

    let client_emitter = ClientEmitter::new(&opts.client_package);
    let client_dir = opts.target.join(&opts.client_package);
    for group in &app.operation_groups {
        let group_dir = client_dir.join(&group.name);
        for operation in &group.operations {
            let parameters = client_emitter.emit_parameters(operation)?;
            write_to_file(
                &group_dir,
                &format!("{} parameters", operation.name),
                parameters.as_bytes(),
            )?;
            let responses = client_emitter.emit_responses(operation)?;
            write_to_file(
                &group_dir,
                &format!("{} responses", operation.name),
                responses.as_bytes(),
            )?;
        }
        let client = client_emitter.emit_group_client(group)?;
        write_to_file(&group_dir, &format!("{} client", group.name), client.as_bytes())?;
        info!(tag = %group.name, operations = group.operations.len(), "generated operation group");
    }

    let facade = client_emitter.emit_facade(&app)?;
    write_to_file(&client_dir, &format!("{} client", app.name), facade.as_bytes())?;
    info!(app = %app.name, "generated client facade");
    Ok(())
}
