//! Data model for the help-generation pipeline — format-agnostic.

use std::path::PathBuf;

/// The concrete file pair a resource identifier resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceFileSet {
    /// Script module implementing the lifecycle functions (`.psm1`).
    pub module_path: PathBuf,
    /// Declarative schema describing the resource's fields (`.schema.mof`).
    pub schema_path: PathBuf,
}

/// One typed, described field from a schema file, in schema order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub declared_type: String,
    /// Text of the `Description(...)` qualifier; empty when absent.
    pub description: String,
}

/// One declared parameter of a target function, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDescriptor {
    pub name: String,
    /// Declared type as written in the parameter attribute, e.g.
    /// `System.String`; empty when the parameter is untyped.
    pub declared_type: String,
}

/// A target function that was actually found in the module, with its
/// parameters. An empty `parameters` vector means the function declares no
/// parameters — distinct from the function being absent, which is recorded
/// in [`FunctionExtraction::missing`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionParameters {
    pub name: String,
    pub parameters: Vec<ParameterDescriptor>,
}

/// Result of searching a module for a set of target functions.
///
/// `functions` keeps document order; `missing` lists requested names that
/// did not appear in the syntax tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionExtraction {
    pub functions: Vec<FunctionParameters>,
    pub missing: Vec<String>,
}

/// One rendered comment-help block, keyed by the function it documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentBlock {
    pub function_name: String,
    /// Full block text, newline-terminated, ready for insertion directly
    /// above the function definition.
    pub text: String,
}

/// Non-fatal conditions reported alongside a successful result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// Some (but not all) requested functions were not found in the module.
    MissingFunctions(Vec<String>),
    /// A found function declares no parameters.
    NoParameters(String),
}
