//! Schema reader — parses a `.schema.mof` file into field descriptors.
//!
//! The schema grammar is a single class block whose body is a sequence of
//! `;`-terminated property statements:
//!
//! ```text
//! [ClassVersion("1.0.0.0"), FriendlyName("Widget")]
//! class MSFT_Widget : OMI_BaseResource
//! {
//!     [Key, Description("Widget name.")] String Name;
//!     [Write, ValueMap{"Present","Absent"}] String Ensure;
//! };
//! ```
//!
//! Field order follows statement order. Duplicate names are kept as-is;
//! callers matching by name take the first occurrence.

use crate::error::{Error, Result};
use crate::model::FieldDescriptor;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

static RE_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"class\s+[A-Za-z_][A-Za-z0-9_]*").unwrap());

// Property statement: optional [qualifiers], declared type, name, optional
// array marker. Qualifiers may contain nested braces (ValueMap) and quoted
// strings, so the capture is anchored to the statement end and backtracks
// to the final closing bracket.
static RE_PROPERTY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)^(?:\[(?P<quals>.*)\]\s*)?(?P<type>[A-Za-z_][A-Za-z0-9_]*)\s+(?P<name>[A-Za-z_][A-Za-z0-9_]*)(?:\[\])?$",
    )
    .unwrap()
});

static RE_DESCRIPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"Description\s*\(\s*"(?P<text>(?:[^"\\]|\\.)*)"\s*\)"#).unwrap()
});

/// Read a schema file and reshape it into field descriptors.
pub fn read_fields(schema_path: &Path) -> Result<Vec<FieldDescriptor>> {
    let source = fs::read_to_string(schema_path).map_err(|source| Error::Io {
        path: schema_path.to_path_buf(),
        source,
    })?;
    parse(&source).map_err(|detail| Error::SchemaParse {
        path: schema_path.to_path_buf(),
        detail,
    })
}

/// Parse schema text into field descriptors. Errors carry a human-readable
/// detail string; the caller attaches the file path.
pub fn parse(source: &str) -> std::result::Result<Vec<FieldDescriptor>, String> {
    let class = RE_CLASS
        .find(source)
        .ok_or_else(|| "no class definition found".to_string())?;
    let body = class_body(&source[class.end()..])?;

    let mut fields = Vec::new();
    for statement in split_statements(body) {
        let statement = statement.trim();
        if statement.is_empty() {
            continue;
        }
        if let Some(caps) = RE_PROPERTY.captures(statement) {
            let description = caps
                .name("quals")
                .and_then(|q| RE_DESCRIPTION.captures(q.as_str()))
                .map(|d| unescape(&d["text"]))
                .unwrap_or_default();
            fields.push(FieldDescriptor {
                name: caps["name"].to_string(),
                declared_type: caps["type"].to_string(),
                description,
            });
        }
    }
    Ok(fields)
}

/// Extract the text between the class's braces, honoring nested braces
/// (ValueMap/Values qualifiers) and quoted strings.
fn class_body(after_class: &str) -> std::result::Result<&str, String> {
    let open = after_class
        .find('{')
        .ok_or_else(|| "class has no body".to_string())?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, ch) in after_class[open..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(&after_class[open + 1..open + i]);
                }
            }
            _ => {}
        }
    }
    Err("unterminated class body".to_string())
}

/// Split the class body on `;`, ignoring semicolons inside quoted strings.
fn split_statements(body: &str) -> Vec<&str> {
    let mut statements = Vec::new();
    let mut start = 0;
    let mut in_string = false;
    let mut escaped = false;
    for (i, ch) in body.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            ';' => {
                statements.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    statements.push(&body[start..]);
    statements
}

fn unescape(text: &str) -> String {
    text.replace("\\\"", "\"").replace("\\\\", "\\")
}
