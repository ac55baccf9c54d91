//! Syntax-tree collaborator — parses module source into a searchable tree.
//!
//! The tree is a small sum type over the node kinds the pipeline cares
//! about (module, function, param block, parameter) with a depth-first,
//! document-order predicate search. The shipped reader understands the
//! PowerShell subset found in resource modules: `function Name { ... }`
//! definitions (brace on the same or a following line), one `param ( ... )`
//! block per function, and `[Type] $Name` parameter entries with optional
//! attributes and default values.
//!
//! Comments (`#`, `<# ... #>`) and string literals are blanked before the
//! structural scan so braces and keywords inside them cannot confuse it.

use regex::Regex;
use std::sync::LazyLock;

static RE_FUNC_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_:.-]*").unwrap());

// A bracketed group is a type constraint when it is a bare (possibly
// dotted, possibly array) type name: [System.String], [string], [int[]].
// Attribute groups like [Parameter(Mandatory = $true)] fail this shape.
static RE_TYPE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_.]*(?:\[\])?$").unwrap());

static RE_VAR_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*").unwrap());

/// A node of the parsed module tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxNode {
    /// Root of a parsed source file.
    Module { children: Vec<SyntaxNode> },
    /// A function definition and everything nested inside its body.
    Function { name: String, children: Vec<SyntaxNode> },
    /// A `param ( ... )` declaration block.
    ParamBlock { children: Vec<SyntaxNode> },
    /// One declared parameter. `declared_type` is empty for untyped
    /// parameters.
    Parameter { name: String, declared_type: String },
}

impl SyntaxNode {
    pub fn children(&self) -> &[SyntaxNode] {
        match self {
            SyntaxNode::Module { children }
            | SyntaxNode::Function { children, .. }
            | SyntaxNode::ParamBlock { children } => children,
            SyntaxNode::Parameter { .. } => &[],
        }
    }

    /// Collect all descendants (self excluded) matching `predicate`,
    /// depth-first in document order.
    pub fn find_all<'a>(&'a self, predicate: &dyn Fn(&SyntaxNode) -> bool) -> Vec<&'a SyntaxNode> {
        let mut found = Vec::new();
        for child in self.children() {
            if predicate(child) {
                found.push(child);
            }
            found.extend(child.find_all(predicate));
        }
        found
    }
}

/// A problem reported by the reader. Any issue is fatal for the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxIssue {
    pub line: usize,
    pub detail: String,
}

impl std::fmt::Display for SyntaxIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.detail)
    }
}

/// Parse module source into a tree. Issues are returned alongside the
/// (possibly partial) tree; callers decide whether they are fatal.
pub fn parse(source: &str) -> (SyntaxNode, Vec<SyntaxIssue>) {
    let (clean, mut issues) = sanitize(source);
    let bytes = clean.as_bytes();

    // Stack of functions whose body is still open: (name, brace depth at
    // which the body opened, children accumulated so far).
    let mut stack: Vec<(String, usize, Vec<SyntaxNode>)> = Vec::new();
    let mut root: Vec<SyntaxNode> = Vec::new();
    let mut pending_function: Option<String> = None;
    let mut pending_params: Option<SyntaxNode> = None;
    let mut brace_depth = 0usize;

    let mut i = 0;
    while i < bytes.len() {
        let ch = bytes[i];

        if is_word_byte(ch) && (i == 0 || !is_word_byte(bytes[i - 1])) {
            if let Some(rest) = keyword_at(&clean, i, "function") {
                let ws = clean[rest..].len() - clean[rest..].trim_start_matches([' ', '\t']).len();
                if let Some(m) = RE_FUNC_NAME.find(&clean[rest + ws..]) {
                    pending_function = Some(clean[rest + ws..rest + ws + m.end()].to_string());
                    i = rest + ws + m.end();
                    // Inline parameter list: function Name ($A, $B) { ... }
                    if let Some(open) = next_non_space(bytes, i) {
                        if bytes[open] == b'(' {
                            if let Some(close) = matching_paren(bytes, open) {
                                pending_params = Some(parse_param_block(&clean[open + 1..close]));
                                i = close + 1;
                            }
                        }
                    }
                    continue;
                }
            }
            if let Some(rest) = keyword_at(&clean, i, "param") {
                if let Some(open) = next_non_space(bytes, rest) {
                    if bytes[open] == b'(' {
                        match matching_paren(bytes, open) {
                            Some(close) => {
                                let block = parse_param_block(&clean[open + 1..close]);
                                push_child(&mut stack, &mut root, block);
                                i = close + 1;
                                continue;
                            }
                            None => {
                                issues.push(SyntaxIssue {
                                    line: line_of(&clean, open),
                                    detail: "unterminated param block".to_string(),
                                });
                                i = bytes.len();
                                continue;
                            }
                        }
                    }
                }
            }
            // Skip the rest of this word
            while i < bytes.len() && is_word_byte(bytes[i]) {
                i += 1;
            }
            continue;
        }

        match ch {
            b'{' => {
                brace_depth += 1;
                if let Some(name) = pending_function.take() {
                    let children = pending_params.take().into_iter().collect();
                    stack.push((name, brace_depth, children));
                }
            }
            b'}' => {
                if let Some((_, open_depth, _)) = stack.last() {
                    if *open_depth == brace_depth {
                        let (name, _, children) = stack.pop().unwrap_or_default();
                        push_child(&mut stack, &mut root, SyntaxNode::Function { name, children });
                    }
                }
                brace_depth = brace_depth.saturating_sub(1);
            }
            _ => {}
        }
        i += 1;
    }

    for (name, _, children) in stack.drain(..).rev() {
        issues.push(SyntaxIssue {
            line: clean.lines().count(),
            detail: format!("unterminated body of function {name}"),
        });
        root.push(SyntaxNode::Function { name, children });
    }

    (SyntaxNode::Module { children: root }, issues)
}

fn push_child(
    stack: &mut [(String, usize, Vec<SyntaxNode>)],
    root: &mut Vec<SyntaxNode>,
    node: SyntaxNode,
) {
    match stack.last_mut() {
        Some((_, _, children)) => children.push(node),
        None => root.push(node),
    }
}

/// Match a case-insensitive keyword at byte offset `i`, requiring a
/// non-word byte (or end) after it. Returns the offset just past the
/// keyword.
fn keyword_at(text: &str, i: usize, keyword: &str) -> Option<usize> {
    let end = i + keyword.len();
    if end > text.len() {
        return None;
    }
    // Compare bytes, not a str slice: `end` can land inside a multibyte
    // character when the word starts with one.
    if !text.as_bytes()[i..end].eq_ignore_ascii_case(keyword.as_bytes()) {
        return None;
    }
    if end < text.len() && is_word_byte(text.as_bytes()[end]) {
        return None;
    }
    Some(end)
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-' || b > 0x7f
}

fn next_non_space(bytes: &[u8], mut i: usize) -> Option<usize> {
    while i < bytes.len() {
        if !bytes[i].is_ascii_whitespace() {
            return Some(i);
        }
        i += 1;
    }
    None
}

/// Index of the `)` matching the `(` at `open`.
fn matching_paren(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, &b) in bytes.iter().enumerate().skip(open) {
        match b {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn line_of(text: &str, offset: usize) -> usize {
    text[..offset].bytes().filter(|&b| b == b'\n').count() + 1
}

/// Parse the inside of a `param ( ... )` block into a ParamBlock node.
///
/// Entries are split on commas at nesting depth zero; each entry is an
/// optional run of bracketed groups (attributes and/or one type
/// constraint) followed by `$Name` and an optional default value.
fn parse_param_block(inner: &str) -> SyntaxNode {
    let mut children = Vec::new();
    for entry in split_top_level(inner) {
        if let Some(param) = parse_parameter(entry) {
            children.push(param);
        }
    }
    SyntaxNode::ParamBlock { children }
}

/// Split on commas that are outside parentheses and brackets.
fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut depth = 0usize;
    for (i, ch) in text.char_indices() {
        match ch {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

fn parse_parameter(entry: &str) -> Option<SyntaxNode> {
    let bytes = entry.as_bytes();
    let mut declared_type = String::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'[' => {
                let close = matching_bracket(bytes, i)?;
                let group = entry[i + 1..close].trim();
                if RE_TYPE_NAME.is_match(group) {
                    declared_type = group.to_string();
                }
                i = close + 1;
            }
            b'$' => {
                let name = RE_VAR_NAME.find(&entry[i + 1..])?;
                return Some(SyntaxNode::Parameter {
                    name: entry[i + 1..i + 1 + name.end()].to_string(),
                    declared_type,
                });
            }
            _ => i += 1,
        }
    }
    None
}

/// Index of the `]` matching the `[` at `open`, honoring nesting
/// (e.g. `[ValidateRange(1, [int]::MaxValue)]`).
fn matching_bracket(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, &b) in bytes.iter().enumerate().skip(open) {
        match b {
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Blank out comments and string literals, preserving byte offsets and
/// line structure. Unterminated block comments and strings are reported.
fn sanitize(source: &str) -> (String, Vec<SyntaxIssue>) {
    #[derive(PartialEq)]
    enum State {
        Code,
        LineComment,
        BlockComment,
        Single,
        Double,
        HereSingle,
        HereDouble,
    }

    let mut out = String::with_capacity(source.len());
    let mut issues = Vec::new();
    let mut state = State::Code;
    let mut opened_at = 0usize;
    let mut at_line_start = true;
    let mut chars = source.char_indices().peekable();

    while let Some((i, ch)) = chars.next() {
        let line_start = at_line_start;
        at_line_start = ch == '\n';
        match state {
            State::Code => match ch {
                '<' if matches!(chars.peek(), Some((_, '#'))) => {
                    chars.next();
                    out.push_str("  ");
                    state = State::BlockComment;
                    opened_at = i;
                }
                '#' => {
                    out.push(' ');
                    state = State::LineComment;
                }
                // Here-string: @' or @" opens, closed only by a
                // line-initial '@ or "@.
                '@' if matches!(chars.peek(), Some((_, '\'' | '"'))) => {
                    let quote = chars.next().map(|(_, q)| q);
                    out.push_str("  ");
                    state = if quote == Some('\'') {
                        State::HereSingle
                    } else {
                        State::HereDouble
                    };
                    opened_at = i;
                }
                '\'' => {
                    out.push(' ');
                    state = State::Single;
                    opened_at = i;
                }
                '"' => {
                    out.push(' ');
                    state = State::Double;
                    opened_at = i;
                }
                _ => out.push(ch),
            },
            State::LineComment => {
                if ch == '\n' {
                    out.push('\n');
                    state = State::Code;
                } else {
                    out.push(' ');
                }
            }
            State::BlockComment => {
                if ch == '#' && matches!(chars.peek(), Some((_, '>'))) {
                    chars.next();
                    out.push_str("  ");
                    state = State::Code;
                } else {
                    out.push(if ch == '\n' { '\n' } else { ' ' });
                }
            }
            State::Single => {
                if ch == '\'' {
                    // Doubled quote is an escaped quote inside the string.
                    if matches!(chars.peek(), Some((_, '\''))) {
                        chars.next();
                        out.push_str("  ");
                    } else {
                        out.push(' ');
                        state = State::Code;
                    }
                } else {
                    out.push(if ch == '\n' { '\n' } else { ' ' });
                }
            }
            State::Double => match ch {
                '`' => {
                    out.push(' ');
                    if let Some((_, next)) = chars.next() {
                        at_line_start = next == '\n';
                        out.push(if next == '\n' { '\n' } else { ' ' });
                    }
                }
                '"' => {
                    out.push(' ');
                    state = State::Code;
                }
                _ => out.push(if ch == '\n' { '\n' } else { ' ' }),
            },
            State::HereSingle | State::HereDouble => {
                let quote = if state == State::HereSingle { '\'' } else { '"' };
                if line_start && ch == quote && matches!(chars.peek(), Some((_, '@'))) {
                    chars.next();
                    out.push_str("  ");
                    state = State::Code;
                } else {
                    out.push(if ch == '\n' { '\n' } else { ' ' });
                }
            }
        }
    }

    match state {
        State::BlockComment => issues.push(SyntaxIssue {
            line: line_of(source, opened_at),
            detail: "unterminated block comment".to_string(),
        }),
        State::Single | State::Double => issues.push(SyntaxIssue {
            line: line_of(source, opened_at),
            detail: "unterminated string literal".to_string(),
        }),
        State::HereSingle | State::HereDouble => issues.push(SyntaxIssue {
            line: line_of(source, opened_at),
            detail: "unterminated here-string".to_string(),
        }),
        _ => {}
    }

    (out, issues)
}
