//! User-facing message table.
//!
//! Loaded once per process and never mutated, so it is safe to share across
//! threads if a caller fans out over independent resource identifiers.
//! Messages use `{0}`-style positional placeholders.

use std::collections::HashMap;
use std::sync::LazyLock;

static TABLE: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        (
            "warning_missing_functions",
            "functions not found in module, skipped: {0}",
        ),
        (
            "warning_no_parameters",
            "function {0} declares no parameters",
        ),
    ])
});

/// Handle to the process-wide message table.
#[derive(Debug, Clone, Copy, Default)]
pub struct Messages;

impl Messages {
    /// Look up a raw message by key. Unknown keys fall back to the key
    /// itself so a missing entry never panics or hides information.
    pub fn get(self, key: &str) -> &'static str {
        TABLE.get(key).copied().unwrap_or_else(|| {
            // Leaking is fine: keys are a small fixed set known at compile
            // time, so this branch only fires for programmer typos.
            Box::leak(key.to_string().into_boxed_str())
        })
    }

    /// Look up a message and substitute `{0}`, `{1}`, ... positionally.
    pub fn format(self, key: &str, args: &[&str]) -> String {
        let mut text = self.get(key).to_string();
        for (i, arg) in args.iter().enumerate() {
            text = text.replace(&format!("{{{i}}}"), arg);
        }
        text
    }
}
