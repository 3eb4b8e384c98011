//! Error types and result aliases for the generator.
//!
//! All user-facing errors are variants of [`GenError`], rendered via `miette`
//! diagnostics. Errors raised while lowering a schema carry the path
//! expression of the offending node, the same path the generated validation
//! code would have reported.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for the generator
#[derive(Error, Debug, Diagnostic)]
pub enum GenError {
    #[error("failed to load specification document: {path}")]
    #[diagnostic(
        code(swaggen::spec_load),
        help("the document must be valid JSON or YAML conforming to Swagger 2.0")
    )]
    SpecLoad {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("unable to resolve reference '{reference}'")]
    #[diagnostic(code(swaggen::ref_resolution), help("{help}"))]
    RefResolution {
        reference: String,
        /// Path expression of the schema node holding the reference.
        location: String,
        help: String,
    },

    #[error("unresolvable type: {type_hint:?} (format {format:?})")]
    #[diagnostic(
        code(swaggen::unresolvable_type),
        help("a schema needs a type, a format, properties, additionalProperties, or a $ref")
    )]
    UnresolvableType {
        type_hint: String,
        format: String,
        location: String,
    },

    #[error("invalid schema combination for {name}: {message}")]
    #[diagnostic(code(swaggen::invalid_combination))]
    InvalidCombination {
        name: String,
        message: String,
        location: String,
    },

    #[error("model {name} not found in definitions")]
    #[diagnostic(
        code(swaggen::model_not_found),
        help("check the spelling against the definitions section of the document")
    )]
    ModelNotFound { name: String },

    #[error("failed to render {name}: {message}")]
    #[diagnostic(code(swaggen::template_render))]
    TemplateRender { name: String, message: String },

    #[error("I/O error: {message}")]
    #[diagnostic(code(swaggen::io))]
    Io { message: String },
}

impl GenError {
    pub fn ref_resolution(reference: impl Into<String>, help: impl Into<String>) -> Self {
        GenError::RefResolution {
            reference: reference.into(),
            location: String::new(),
            help: help.into(),
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        GenError::Io {
            message: message.into(),
        }
    }

    /// Attach a schema path expression to errors that locate a node.
    ///
    /// Leaves the location alone when a deeper frame already set one.
    pub fn at(mut self, path: &str) -> Self {
        match &mut self {
            GenError::RefResolution { location, .. }
            | GenError::UnresolvableType { location, .. }
            | GenError::InvalidCombination { location, .. } => {
                if location.is_empty() {
                    *location = path.to_string();
                }
            }
            _ => {}
        }
        self
    }

    /// The schema path expression for this error, if it carries one.
    pub fn location(&self) -> Option<&str> {
        match self {
            GenError::RefResolution { location, .. }
            | GenError::UnresolvableType { location, .. }
            | GenError::InvalidCombination { location, .. } => {
                Some(location.as_str()).filter(|l| !l.is_empty())
            }
            _ => None,
        }
    }
}

impl From<std::io::Error> for GenError {
    fn from(err: std::io::Error) -> Self {
        GenError::io(err.to_string())
    }
}

/// Result type for generator operations
pub type GenResult<T> = Result<T, GenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_sets_location_once() {
        let err = GenError::ref_resolution("#/definitions/Missing", "definition does not exist")
            .at("\"pet\"+\".\"+\"owner\"");
        assert_eq!(err.location(), Some("\"pet\"+\".\"+\"owner\""));

        // a second call must not clobber the deeper location
        let err = err.at("\"pet\"");
        assert_eq!(err.location(), Some("\"pet\"+\".\"+\"owner\""));
    }

    #[test]
    fn test_at_ignores_io() {
        let err = GenError::io("disk full").at("\"pet\"");
        assert_eq!(err.location(), None);
    }

    #[test]
    fn test_display_messages() {
        let err = GenError::UnresolvableType {
            type_hint: "[]".into(),
            format: "".into(),
            location: "\"id\"".into(),
        };
        assert!(err.to_string().contains("unresolvable type"));

        let err = GenError::ModelNotFound { name: "Pet".into() };
        assert!(err.to_string().contains("Pet"));
    }
}
