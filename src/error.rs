//! Error taxonomy.
//!
//! Every error here is fatal to the run that hits it. Generation is cheap and
//! deterministic, so nothing retries: fix the input and run again.
use std::path::PathBuf;
use thiserror::Error;

/// Malformed schema. Raised before any unit is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("duplicate base type `{name}`")]
    DuplicateBaseType { name: String },

    #[error("duplicate variant `{variant}` in base type `{base}`")]
    DuplicateVariant { base: String, variant: String },

    #[error("duplicate field `{field}` in `{base}.{variant}`")]
    DuplicateField { base: String, variant: String, field: String },

    #[error("`{name}` is not a valid identifier (in {context})")]
    InvalidIdentifier { name: String, context: String },

    #[error("variant `{base}.{variant}` shares its name with a base type")]
    VariantShadowsBase { base: String, variant: String },

    #[error("malformed type `{text}` for field `{context}`")]
    MalformedType { text: String, context: String },

    #[error("reference to undeclared base type `{name}` from `{context}`")]
    UnknownBaseType { name: String, context: String },

    #[error("base type `{base}` has no variant `{variant}` (referenced from `{context}`)")]
    UnknownVariant { base: String, variant: String, context: String },

    #[error("`{first}` and `{second}` both become `{emitted}` in {backend} output (in `{context}`)")]
    NameCollision {
        first: String,
        second: String,
        emitted: String,
        backend: &'static str,
        context: String,
    },

    #[error("`{name}` is reserved by the {backend} backend (declared in `{context}`)")]
    ReservedName { name: String, backend: &'static str, context: String },
}

/// Failure to read a schema document.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read schema document {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid schema document {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("JSON pointer `{pointer}` selects nothing in {path}")]
    Pointer { pointer: String, path: PathBuf },

    #[error("jq filter failed on {path}: {message}")]
    Jq { path: PathBuf, message: String },

    #[error("bad input pattern `{pattern}`: {message}")]
    Pattern { pattern: String, message: String },
}

/// Failure to persist generated units.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
