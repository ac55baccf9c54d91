//! dscdoc — generate comment-based help skeletons for resource modules.
//!
//! Each identifier may be a module file, a schema file, a directory
//! containing one of each, or a catalog name resolved against
//! `--catalog-root` directories. Blocks go to stdout by default, or one
//! file per block with `-o`.

use anyhow::{Context, Result};
use clap::Parser;
use dscdoc::{generate, DirCatalog, Messages, Warning};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "dscdoc",
    about = "Generate comment-based help skeletons for DSC-style resource modules"
)]
struct Cli {
    /// Resource identifiers: module/schema file paths (glob patterns
    /// supported), directories, or catalog names.
    #[arg(required = true)]
    identifiers: Vec<String>,

    /// Target function name. Repeatable; default is the lifecycle triad
    /// Get-/Set-/Test-TargetResource.
    #[arg(short = 'f', long = "function")]
    functions: Vec<String>,

    /// Output directory: write one file per block instead of stdout.
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Root directory for catalog-name lookup. Repeatable, checked in order.
    #[arg(long = "catalog-root")]
    catalog_roots: Vec<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let catalog = DirCatalog::new(cli.catalog_roots.clone());
    let messages = Messages;

    if let Some(ref output) = cli.output {
        fs::create_dir_all(output)
            .with_context(|| format!("failed to create output directory: {}", output.display()))?;
    }

    for identifier in expand_identifiers(&cli.identifiers)? {
        let help = generate(&identifier, &cli.functions, &catalog)
            .with_context(|| format!("failed to process {identifier}"))?;

        for warning in &help.warnings {
            eprintln!("warning: {}", format_warning(messages, warning));
        }

        let stem = help
            .resource
            .module_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "resource".to_string());

        for block in &help.blocks {
            match cli.output {
                Some(ref dir) => {
                    let path = dir.join(format!("{stem}.{}.help.txt", block.function_name));
                    fs::write(&path, &block.text)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                }
                None => print!("{}", block.text),
            }
        }
    }

    Ok(())
}

fn format_warning(messages: Messages, warning: &Warning) -> String {
    match warning {
        Warning::MissingFunctions(names) => {
            messages.format("warning_missing_functions", &[&names.join(", ")])
        }
        Warning::NoParameters(name) => messages.format("warning_no_parameters", &[name]),
    }
}

/// Expand glob patterns among the identifiers. Existing paths and
/// non-matching strings (catalog names) pass through unchanged.
fn expand_identifiers(identifiers: &[String]) -> Result<Vec<String>> {
    let mut expanded = Vec::new();
    for identifier in identifiers {
        if Path::new(identifier).exists() {
            expanded.push(identifier.clone());
            continue;
        }
        let matches: Vec<String> = glob::glob(identifier)
            .with_context(|| format!("invalid glob pattern: {identifier}"))?
            .filter_map(|r| r.ok())
            .map(|p| p.to_string_lossy().into_owned())
            .collect();
        if matches.is_empty() {
            // Not a path and not a glob hit: let the locator try it as a
            // catalog name.
            expanded.push(identifier.clone());
        } else {
            expanded.extend(matches);
        }
    }
    expanded.sort();
    expanded.dedup();
    Ok(expanded)
}
