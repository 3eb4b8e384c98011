//! Emitters for generated Go source files.
//!
//! Render lowered definitions and assembled operations to Go source text,
//! and write the results under the target directory. The renderings cover
//! every lowered kind (primitive alias, struct, embedded composition, map,
//! tuple, lifted extras) without aiming to be a full server stack.

mod client;
mod model;

pub use client::ClientEmitter;
pub use model::ModelEmitter;

use std::path::{Path, PathBuf};

use crate::errors::GenResult;
use crate::naming::to_file_name;

/// Header stamped on every generated file.
pub(crate) const GENERATED_HEADER: &str =
    "// Code generated by swaggen. DO NOT EDIT.\n// Regenerate against the specification instead of editing this file.\n";

/// Write one generated file, creating the directory as needed. The base
/// name is snake_cased; overwrite policy belongs to the caller.
pub fn write_to_file(dir: &Path, base_name: &str, contents: &[u8]) -> GenResult<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.go", to_file_name(base_name)));
    std::fs::write(&path, contents)?;
    Ok(path)
}

/// Render an import block, or nothing when there are no imports.
pub(crate) fn import_block(imports: &[String]) -> String {
    if imports.is_empty() {
        return String::new();
    }
    let mut out = String::from("import (\n");
    for import in imports {
        out.push_str(&format!("\t\"{}\"\n", import));
    }
    out.push_str(")\n\n");
    out
}
