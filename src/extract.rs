//! Module syntax extractor — finds target functions and their parameters.

use crate::error::{Error, Result};
use crate::model::{FunctionExtraction, FunctionParameters, ParameterDescriptor};
use crate::syntax::{self, SyntaxNode};
use std::fs;
use std::path::Path;

/// The well-known lifecycle triad documented by default.
pub const DEFAULT_TARGETS: [&str; 3] = [
    "Get-TargetResource",
    "Set-TargetResource",
    "Test-TargetResource",
];

/// Read a module file and extract the parameter lists of `targets`.
///
/// Parse issues are fatal. Finding none of the targets is fatal; finding
/// only some is not — the absent names are recorded in
/// [`FunctionExtraction::missing`] and processing continues.
pub fn extract_parameters(module_path: &Path, targets: &[String]) -> Result<FunctionExtraction> {
    let source = fs::read_to_string(module_path).map_err(|source| Error::Io {
        path: module_path.to_path_buf(),
        source,
    })?;
    extract_from_source(&source, targets).map_err(|err| match err {
        Error::SyntaxParse { detail, .. } => Error::SyntaxParse {
            path: module_path.to_path_buf(),
            detail,
        },
        other => other,
    })
}

/// Extract target function parameters from already-loaded module source.
pub fn extract_from_source(source: &str, targets: &[String]) -> Result<FunctionExtraction> {
    let (tree, issues) = syntax::parse(source);
    if !issues.is_empty() {
        let detail = issues
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(Error::SyntaxParse {
            path: Path::new("<source>").to_path_buf(),
            detail,
        });
    }

    let matches = tree.find_all(&|node| {
        matches!(node, SyntaxNode::Function { name, .. } if targets.iter().any(|t| t == name))
    });

    let mut functions: Vec<FunctionParameters> = Vec::new();
    for node in matches {
        let SyntaxNode::Function { name, .. } = node else {
            continue;
        };
        // A target defined twice keeps only its first (document-order)
        // definition.
        if functions.iter().any(|f| &f.name == name) {
            continue;
        }
        functions.push(FunctionParameters {
            name: name.clone(),
            parameters: own_parameters(node),
        });
    }

    if functions.is_empty() {
        return Err(Error::NoTargetFunctionsFound(targets.join(", ")));
    }

    let missing = targets
        .iter()
        .filter(|t| !functions.iter().any(|f| &f.name == *t))
        .cloned()
        .collect();

    Ok(FunctionExtraction { functions, missing })
}

/// Parameters of the function's own param block, ignoring blocks that
/// belong to functions nested inside its body.
fn own_parameters(func: &SyntaxNode) -> Vec<ParameterDescriptor> {
    fn first_block(node: &SyntaxNode) -> Option<&SyntaxNode> {
        for child in node.children() {
            match child {
                SyntaxNode::ParamBlock { .. } => return Some(child),
                SyntaxNode::Function { .. } => continue,
                _ => {
                    if let Some(found) = first_block(child) {
                        return Some(found);
                    }
                }
            }
        }
        None
    }

    let Some(block) = first_block(func) else {
        return Vec::new();
    };
    block
        .children()
        .iter()
        .filter_map(|child| match child {
            SyntaxNode::Parameter {
                name,
                declared_type,
            } => Some(ParameterDescriptor {
                name: name.clone(),
                declared_type: declared_type.clone(),
            }),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    const MODULE: &str = r#"
function Get-TargetResource
{
    param
    (
        [Parameter(Mandatory = $true)]
        [System.String]
        $Name,

        [System.UInt32]
        $Id
    )
    @{}
}

function Set-TargetResource
{
    param
    (
        [System.String]
        $Name
    )
}

function Test-TargetResource
{
    param
    (
        [System.String]
        $Name
    )
    $false
}
"#;

    #[test]
    fn all_three_targets_found() {
        let result = extract_from_source(MODULE, &targets(&DEFAULT_TARGETS)).unwrap();
        assert_eq!(result.functions.len(), 3);
        assert!(result.missing.is_empty());
        let first = &result.functions[0];
        assert_eq!(first.name, "Get-TargetResource");
        let names: Vec<_> = first.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Name", "Id"]);
    }

    #[test]
    fn partial_match_reports_missing() {
        let source = r#"
function Get-TargetResource { param([System.String] $Name) }
function Test-TargetResource { param([System.String] $Name) }
"#;
        let result = extract_from_source(source, &targets(&DEFAULT_TARGETS)).unwrap();
        assert_eq!(result.functions.len(), 2);
        assert_eq!(result.missing, ["Set-TargetResource"]);
    }

    #[test]
    fn no_targets_found_is_fatal() {
        let source = "function Helper { param($X) }\n";
        let err = extract_from_source(source, &targets(&DEFAULT_TARGETS)).unwrap_err();
        assert!(matches!(err, Error::NoTargetFunctionsFound(_)));
    }

    #[test]
    fn parse_issue_is_fatal() {
        let source = "function Get-TargetResource {\n  param($Name)\n";
        let err = extract_from_source(source, &targets(&DEFAULT_TARGETS)).unwrap_err();
        assert!(matches!(err, Error::SyntaxParse { .. }));
    }

    #[test]
    fn parameterless_function_is_present_with_empty_list() {
        let source = "function Test-TargetResource {\n  $true\n}\n";
        let result = extract_from_source(source, &targets(&["Test-TargetResource"])).unwrap();
        assert_eq!(result.functions.len(), 1);
        assert!(result.functions[0].parameters.is_empty());
        assert!(result.missing.is_empty());
    }

    #[test]
    fn nested_param_block_not_attributed_to_outer() {
        let source = r#"
function Get-TargetResource
{
    function Helper { param($Inner) }
    $null
}
"#;
        let result = extract_from_source(source, &targets(&["Get-TargetResource"])).unwrap();
        assert!(result.functions[0].parameters.is_empty());
    }

    #[test]
    fn caller_supplied_target_override() {
        let source = "function Invoke-Thing { param([System.String] $Path) }\n";
        let result = extract_from_source(source, &targets(&["Invoke-Thing"])).unwrap();
        assert_eq!(result.functions[0].name, "Invoke-Thing");
        assert_eq!(result.functions[0].parameters[0].name, "Path");
    }

    #[test]
    fn here_string_body_does_not_fail_extraction() {
        let source = "function Get-TargetResource\n{\n    param([System.String] $Name)\n    $text = @\"\nIt's a } brace\n\"@\n    return $Name\n}\n";
        let result = extract_from_source(source, &targets(&["Get-TargetResource"])).unwrap();
        assert_eq!(result.functions[0].parameters[0].name, "Name");
        assert!(result.missing.is_empty());
    }

    #[test]
    fn duplicate_definition_keeps_first() {
        let source = r#"
function Get-TargetResource { param($First) }
function Get-TargetResource { param($Second) }
"#;
        let result = extract_from_source(source, &targets(&["Get-TargetResource"])).unwrap();
        assert_eq!(result.functions.len(), 1);
        assert_eq!(result.functions[0].parameters[0].name, "First");
    }
}
