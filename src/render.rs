//! Comment-block synthesizer — joins parameters against schema fields and
//! renders one comment-help block per function.
//!
//! The template is fixed for compatibility with tooling that re-inserts
//! these blocks above function definitions: opening `<#`, a `.SYNOPSIS`
//! section with the literal placeholder body, one `.PARAMETER` section per
//! declared parameter, closing `#>`. Nesting steps are 4 spaces; a section
//! whose body is empty contributes a single blank line.

use crate::model::{CommentBlock, FieldDescriptor, FunctionExtraction, FunctionParameters};

const SYNOPSIS_PLACEHOLDER: &str = "Synopsis here";
const INDENT: &str = "    ";

/// Render one block per extracted function, in extraction order.
///
/// Pure function of its inputs; identical inputs yield byte-identical
/// output. Field matching is case-sensitive; the first field with a given
/// name wins.
pub fn synthesize(extraction: &FunctionExtraction, fields: &[FieldDescriptor]) -> Vec<CommentBlock> {
    extraction
        .functions
        .iter()
        .map(|func| CommentBlock {
            function_name: func.name.clone(),
            text: render_block(func, fields),
        })
        .collect()
}

fn render_block(func: &FunctionParameters, fields: &[FieldDescriptor]) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push("<#".to_string());

    lines.push(format!("{INDENT}.SYNOPSIS"));
    lines.push(format!("{INDENT}{INDENT}{SYNOPSIS_PLACEHOLDER}"));
    lines.push(String::new());

    for parameter in &func.parameters {
        lines.push(format!("{INDENT}.PARAMETER {}", parameter.name));
        match field_description(fields, &parameter.name) {
            Some(description) if !description.is_empty() => {
                for line in description.lines() {
                    lines.push(format!("{INDENT}{INDENT}{line}"));
                }
                lines.push(String::new());
            }
            _ => lines.push(String::new()),
        }
    }

    lines.push("#>".to_string());
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// First field whose name matches exactly (case-sensitive).
fn field_description<'a>(fields: &'a [FieldDescriptor], name: &str) -> Option<&'a str> {
    fields
        .iter()
        .find(|f| f.name == name)
        .map(|f| f.description.as_str())
}
