//! Resource locator — resolves a loose identifier to a module/schema pair.
//!
//! An identifier may be a direct path to either file of the pair, a
//! directory containing exactly one of each, or a logical name looked up
//! through a [`ResourceCatalog`]. Resolution is read-only and uncached.

use crate::error::{Error, Result};
use crate::model::ResourceFileSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Naming suffix of script module files.
pub const MODULE_SUFFIX: &str = ".psm1";
/// Naming suffix of schema files.
pub const SCHEMA_SUFFIX: &str = ".schema.mof";

/// External catalog mapping a logical resource name to its module file.
pub trait ResourceCatalog {
    fn lookup(&self, name: &str) -> Option<PathBuf>;
}

/// Catalog backed by a list of root directories, checked in order.
/// A resource `Widget` registered under root `R` lives at
/// `R/Widget/Widget.psm1`; the first root with a hit wins.
#[derive(Debug, Default)]
pub struct DirCatalog {
    roots: Vec<PathBuf>,
}

impl DirCatalog {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }
}

impl ResourceCatalog for DirCatalog {
    fn lookup(&self, name: &str) -> Option<PathBuf> {
        for root in &self.roots {
            let candidate = root.join(name).join(format!("{name}{MODULE_SUFFIX}"));
            if candidate.is_file() {
                return Some(candidate);
            }
        }
        None
    }
}

/// Resolve `identifier` into a concrete module/schema file pair.
///
/// Resolution order: schema-file path, module-file path, directory scan,
/// catalog lookup. Suffix matching is case-sensitive.
pub fn resolve(identifier: &str, catalog: &dyn ResourceCatalog) -> Result<ResourceFileSet> {
    if let Some(stem) = identifier.strip_suffix(SCHEMA_SUFFIX) {
        let schema = PathBuf::from(identifier);
        let module = PathBuf::from(format!("{stem}{MODULE_SUFFIX}"));
        return pair_if_exists(module, schema, identifier);
    }

    if let Some(stem) = identifier.strip_suffix(MODULE_SUFFIX) {
        let module = PathBuf::from(identifier);
        let schema = PathBuf::from(format!("{stem}{SCHEMA_SUFFIX}"));
        return pair_if_exists(module, schema, identifier);
    }

    let path = Path::new(identifier);
    if path.is_dir() {
        return resolve_directory(path);
    }

    if let Some(module) = catalog.lookup(identifier) {
        let module_str = module.to_string_lossy();
        let stem = module_str
            .strip_suffix(MODULE_SUFFIX)
            .ok_or_else(|| Error::NotFound(identifier.to_string()))?;
        let schema = PathBuf::from(format!("{stem}{SCHEMA_SUFFIX}"));
        return pair_if_exists(module, schema, identifier);
    }

    Err(Error::NotFound(identifier.to_string()))
}

/// Both files of the pair must exist; the identifier is otherwise treated
/// as resolving to nothing.
fn pair_if_exists(module: PathBuf, schema: PathBuf, identifier: &str) -> Result<ResourceFileSet> {
    if !module.is_file() || !schema.is_file() {
        return Err(Error::NotFound(identifier.to_string()));
    }
    Ok(ResourceFileSet {
        module_path: module,
        schema_path: schema,
    })
}

/// Scan a directory's immediate children for exactly one module file and
/// exactly one schema file.
fn resolve_directory(dir: &Path) -> Result<ResourceFileSet> {
    let entries = fs::read_dir(dir).map_err(|source| Error::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut modules: Vec<PathBuf> = Vec::new();
    let mut schemas: Vec<PathBuf> = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.ends_with(SCHEMA_SUFFIX) {
            schemas.push(path);
        } else if name.ends_with(MODULE_SUFFIX) {
            modules.push(path);
        }
    }

    if modules.len() != 1 || schemas.len() != 1 {
        return Err(Error::AmbiguousOrMissingPair {
            dir: dir.to_path_buf(),
            modules: modules.len(),
            schemas: schemas.len(),
        });
    }

    Ok(ResourceFileSet {
        module_path: modules.remove(0),
        schema_path: schemas.remove(0),
    })
}
