//! Per-section module builders.
//!
//! Each builder turns one definition section into a `Module` subtree whose
//! paths are relative to the section's own directory; the caller relocates
//! the subtree with `unshift` before composing the final tree.

pub mod actions;
pub mod channels;
pub mod configuration;
pub mod events;
pub mod secrets;
pub mod states;

use crate::util::{quote_if_needed, sanitize_identifier};
use std::collections::HashSet;

/// One member of a section aggregate type.
pub(crate) struct AggregateEntry {
    /// Object key in the aggregate type (the definition's name).
    pub key: String,
    /// Namespace identifier the entry is imported under.
    pub alias: String,
    /// Exported type name inside the entry's file.
    pub type_name: String,
    /// Import specifier relative to the aggregate's directory.
    pub from: String,
}

/// Compose the aggregate type for a section index: one `import * as` line
/// per entry, then `export type {name} = { key: alias.Type; ... };`.
pub(crate) fn aggregate_source(name: &str, entries: &[AggregateEntry], doc: &[String]) -> String {
    let mut out = String::new();
    for entry in entries {
        out.push_str(&format!(
            "import * as {} from \"{}\";\n",
            entry.alias, entry.from
        ));
    }
    if !entries.is_empty() {
        out.push('\n');
    }
    if !doc.is_empty() {
        out.push_str("/**\n");
        for line in doc {
            out.push_str(&format!(" * {line}\n"));
        }
        out.push_str(" */\n");
    }
    if entries.is_empty() {
        out.push_str(&format!("export type {name} = {{}};\n"));
        return out;
    }
    out.push_str(&format!("export type {name} = {{\n"));
    for entry in entries {
        out.push_str(&format!(
            "  {}: {}.{};\n",
            quote_if_needed(&entry.key),
            entry.alias,
            entry.type_name
        ));
    }
    out.push_str("};\n");
    out
}

/// Sanitize `name` into an identifier not yet in `used`, suffixing with a
/// counter on collision.
pub(crate) fn unique_alias(used: &mut HashSet<String>, name: &str) -> String {
    let base = sanitize_identifier(name);
    if used.insert(base.clone()) {
        return base;
    }
    let mut i = 2;
    loop {
        let candidate = format!("{base}{i}");
        if used.insert(candidate.clone()) {
            return candidate;
        }
        i += 1;
    }
}
