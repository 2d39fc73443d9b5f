//! Error types for spec import and module generation.
//!
//! Every variant except [`GeneratorError::InvalidConfig`] aborts a generation
//! run. Skipping a protected file is not an error; it is reported through
//! [`crate::generator::SkippedFile`].

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while importing a spec or generating a module.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// The spec file could not be read
    #[error("failed to read spec '{}': {source}", path.display())]
    SpecUnreadable {
        /// Path of the spec file
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The spec could not be parsed as structured data, or a required field
    /// is missing
    #[error("malformed spec at {location}: {reason}")]
    MalformedSpec {
        /// Where in the document the problem was found (e.g. `paths./pets.get`)
        location: String,
        /// What is wrong
        reason: String,
    },

    /// A `$ref` does not point at a declared component
    #[error("unresolved reference '{reference}' used by {location}")]
    UnresolvedReference {
        /// The reference as written in the spec
        reference: String,
        /// The path, method, component or property using it
        location: String,
    },

    /// A type token that is neither a known primitive nor a reference
    #[error("unknown type '{token}' used by {location}")]
    UnknownType {
        /// The raw type token
        token: String,
        /// The component property or parameter declaring it
        location: String,
    },

    /// A named template is neither in the override directory nor built in
    #[error("template '{name}' not found")]
    TemplateMissing {
        /// Template file name (e.g. `Model.java.tpl`)
        name: String,
    },

    /// A template override exists but could not be read
    #[error("failed to read template '{}': {source}", path.display())]
    TemplateUnreadable {
        /// Path of the override file
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An output directory or file could not be created or written
    #[error("failed to write '{}': {source}", path.display())]
    OutputPath {
        /// Directory or file being created
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A required module configuration value is missing or invalid
    #[error("invalid module configuration '{field}': {reason}")]
    InvalidConfig {
        /// Configuration key
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

impl GeneratorError {
    pub(crate) fn malformed(location: impl Into<String>, reason: impl Into<String>) -> Self {
        GeneratorError::MalformedSpec {
            location: location.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unresolved(reference: impl Into<String>, location: impl Into<String>) -> Self {
        GeneratorError::UnresolvedReference {
            reference: reference.into(),
            location: location.into(),
        }
    }

    pub(crate) fn output(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GeneratorError::OutputPath {
            path: path.into(),
            source,
        }
    }
}

/// Result alias used throughout the library.
pub type GeneratorResult<T> = Result<T, GeneratorError>;
