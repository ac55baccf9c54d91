//! Error taxonomy for the help-generation pipeline.
//!
//! Every variant is fatal: when one is returned the invocation produced no
//! partial output. Non-fatal conditions travel as [`crate::model::Warning`]
//! values next to a successful result instead.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The resource identifier resolved to nothing usable.
    #[error("resource not found: {0}")]
    NotFound(String),

    /// Directory or catalog resolution did not yield exactly one module
    /// file and one schema file.
    #[error("expected exactly one module and one schema file in {dir}: found {modules} module(s), {schemas} schema(s)")]
    AmbiguousOrMissingPair {
        dir: PathBuf,
        modules: usize,
        schemas: usize,
    },

    /// The module source failed to parse into a syntax tree.
    #[error("failed to parse module {path}: {detail}")]
    SyntaxParse { path: PathBuf, detail: String },

    /// The schema source failed to parse.
    #[error("failed to parse schema {path}: {detail}")]
    SchemaParse { path: PathBuf, detail: String },

    /// None of the requested function names exist in the module.
    #[error("none of the target functions ({0}) were found in the module")]
    NoTargetFunctionsFound(String),

    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
