//! Typed code generation for bot and integration definitions.
//!
//! Takes a definition (configuration, events, states, actions, channels,
//! secrets), translates each schema into an intermediate representation,
//! renders TypeScript type declarations, and composes them into a file
//! tree through a mutable module structure:
//!
//! 1. [`definition`]: the serde data model a definition deserializes into.
//! 2. [`ir`]: schema translation and TypeScript rendering.
//! 3. [`module`]: the module tree, with `unshift` relocation and `flatten`.
//! 4. Entry points: [`generate_typings`], [`generate_integration_instance`],
//!    [`generate_bot_index`].
//!
//! Output is deterministic: the same definition always yields the same
//! files in the same order.

pub mod definition;
pub mod error;
pub mod ir;
pub mod module;

mod generate;
mod sections;
mod util;

pub use error::CodegenError;
pub use generate::{
    INDEX_FILE, INTEGRATION_JSON, generate_bot_index, generate_bot_typings,
    generate_integration_instance, generate_integration_typings, generate_typings,
};
pub use module::{File, GENERATED_HEADER, Module};
pub use sections::secrets::secret_env_variable_name;
