//! Error taxonomy for the code-generation engine.
//!
//! Every failure is a deterministic function of the input definition: the
//! same definition always fails with the same error, and no partial output
//! is ever surfaced alongside one.

use thiserror::Error;

/// All the ways a generation run can fail.
///
/// Variants carry enough context (schema location, offending identifier,
/// module name, resolved path) for a presentation layer to report the
/// failure without re-running generation.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// The schema uses a construct with no defined mapping to the
    /// intermediate representation.
    #[error("unsupported schema construct at `{location}`: {reason}")]
    UnsupportedSchema { location: String, reason: String },

    /// A secret identifier is not SCREAMING_SNAKE_CASE.
    #[error("secret `{name}` must be in SCREAMING_SNAKE_CASE")]
    InvalidSecretFormat { name: String },

    /// The same secret identifier appears more than once.
    #[error("secret `{name}` is duplicated; it appears {count} times")]
    DuplicateSecret { name: String, count: usize },

    /// Two names normalize to the same generated identifier.
    #[error(
        "`{first}` and `{second}` both normalize to identifier `{identifier}`"
    )]
    NameCollision {
        identifier: String,
        first: String,
        second: String,
    },

    /// A module (or one of its ancestors) was already flattened; the tree
    /// is frozen and no further mutation is allowed.
    #[error("module `{module}` is frozen; `{operation}` is not allowed after flatten")]
    ModuleFrozen {
        module: String,
        operation: &'static str,
    },

    /// Two modules with different contents resolved to the same output path.
    #[error("two files with different contents resolved to `{path}`")]
    PathCollision { path: String },
}
