//! Casing and identifier utilities for TypeScript emission.
//!
//! Generated identifiers must be valid TypeScript: reserved words are
//! escaped, names starting with digits are prefixed, and property keys
//! that are not plain identifiers are quoted.

use std::collections::HashSet;
use std::sync::LazyLock;

/// TypeScript reserved words that cannot be used as identifiers.
static RESERVED_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "break",
        "case",
        "catch",
        "class",
        "const",
        "continue",
        "debugger",
        "default",
        "delete",
        "do",
        "else",
        "enum",
        "export",
        "extends",
        "false",
        "finally",
        "for",
        "function",
        "if",
        "import",
        "in",
        "instanceof",
        "new",
        "null",
        "return",
        "super",
        "switch",
        "this",
        "throw",
        "true",
        "try",
        "typeof",
        "var",
        "void",
        "while",
        "with",
        "yield",
        "let",
        "static",
        "implements",
        "interface",
        "package",
        "private",
        "protected",
        "public",
        "await",
        "async",
    ]
    .into_iter()
    .collect()
});

/// Split a name into lowercase words.
///
/// Breaks on `-`, `_`, `.` and spaces, and on lower-to-upper camelCase
/// boundaries ("myEvent" -> ["my", "event"]).
fn words(name: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;
    for c in name.chars() {
        if matches!(c, '-' | '_' | '.' | ' ') {
            if !current.is_empty() {
                out.push(current.clone());
                current.clear();
            }
            prev_lower = false;
            continue;
        }
        if c.is_ascii_uppercase() && prev_lower && !current.is_empty() {
            out.push(current.clone());
            current.clear();
        }
        prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// Convert a name to PascalCase.
pub fn pascal_case(name: &str) -> String {
    let mut out = String::new();
    for word in words(name) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.extend(chars);
        }
    }
    out
}

/// Convert a name to camelCase.
pub fn camel_case(name: &str) -> String {
    let mut out = String::new();
    for (i, word) in words(name).into_iter().enumerate() {
        if i == 0 {
            out.push_str(&word);
        } else {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                out.extend(first.to_uppercase());
                out.extend(chars);
            }
        }
    }
    out
}

/// Convert a name to kebab-case.
pub fn kebab_case(name: &str) -> String {
    words(name).join("-")
}

/// Check that an identifier is SCREAMING_SNAKE_CASE (the required format
/// for secret identifiers).
pub fn is_screaming_snake_case(name: &str) -> bool {
    let mut chars = name.chars();
    let starts_with_letter = chars.next().is_some_and(|c| c.is_ascii_uppercase());
    starts_with_letter
        && name
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

/// Sanitize a name into a valid camelCase TypeScript identifier.
///
/// Prepends `_` if the result starts with a digit or is a reserved word.
pub fn sanitize_identifier(name: &str) -> String {
    let mut result = camel_case(name);
    if result.is_empty() {
        return "_empty".to_string();
    }
    if result.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        result = format!("_{result}");
    }
    if RESERVED_WORDS.contains(result.as_str()) {
        result = format!("_{result}");
    }
    result
}

/// Check whether a property key needs quoting in TypeScript.
pub fn needs_quoting(name: &str) -> bool {
    name.is_empty()
        || !name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Escape a string for use in a TypeScript string literal.
pub fn escape_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

/// Quote a property key if it is not a valid plain identifier.
pub fn quote_if_needed(name: &str) -> String {
    if needs_quoting(name) {
        format!("\"{}\"", escape_string(name))
    } else {
        name.to_string()
    }
}
