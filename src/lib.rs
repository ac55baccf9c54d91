//! dscdoc — comment-based help skeletons for DSC-style resource modules.
//!
//! Given a resource identifier (module path, schema path, directory, or
//! catalog name) the pipeline resolves the module/schema file pair, parses
//! the module into a syntax tree, extracts the declared parameters of the
//! lifecycle functions, matches each parameter against the schema's field
//! descriptions, and renders one `<# ... #>` help block per function.
//!
//! The pipeline is synchronous and single-pass: locate → {schema reader,
//! syntax extractor} → synthesizer. Fatal errors abort with no partial
//! output; partial conditions (some functions missing, a function without
//! parameters) are returned as [`Warning`] values next to the result.

pub mod error;
pub mod extract;
pub mod locate;
pub mod messages;
pub mod model;
pub mod render;
pub mod schema;
pub mod syntax;

pub use error::{Error, Result};
pub use extract::DEFAULT_TARGETS;
pub use locate::{DirCatalog, ResourceCatalog};
pub use messages::Messages;
pub use model::{
    CommentBlock, FieldDescriptor, FunctionExtraction, FunctionParameters, ParameterDescriptor,
    ResourceFileSet, Warning,
};

/// Everything one invocation produces.
#[derive(Debug)]
pub struct GeneratedHelp {
    /// The file pair the identifier resolved to.
    pub resource: ResourceFileSet,
    /// One rendered block per found function, in document order.
    pub blocks: Vec<CommentBlock>,
    /// Non-fatal conditions encountered along the way.
    pub warnings: Vec<Warning>,
}

/// Run the whole pipeline for one resource identifier.
///
/// `targets` overrides the documented function set; pass an empty slice
/// for the default lifecycle triad.
pub fn generate(
    identifier: &str,
    targets: &[String],
    catalog: &dyn ResourceCatalog,
) -> Result<GeneratedHelp> {
    let default_targets: Vec<String>;
    let targets = if targets.is_empty() {
        default_targets = DEFAULT_TARGETS.iter().map(ToString::to_string).collect();
        default_targets.as_slice()
    } else {
        targets
    };

    let resource = locate::resolve(identifier, catalog)?;
    let fields = schema::read_fields(&resource.schema_path)?;
    let extraction = extract::extract_parameters(&resource.module_path, targets)?;

    let mut warnings = Vec::new();
    if !extraction.missing.is_empty() {
        warnings.push(Warning::MissingFunctions(extraction.missing.clone()));
    }
    for func in &extraction.functions {
        if func.parameters.is_empty() {
            warnings.push(Warning::NoParameters(func.name.clone()));
        }
    }

    let blocks = render::synthesize(&extraction, &fields);
    Ok(GeneratedHelp {
        resource,
        blocks,
        warnings,
    })
}
