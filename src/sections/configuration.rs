//! Configuration section builder.

use crate::definition::{ConfigurationDefinition, Schema};
use crate::error::CodegenError;
use crate::generate::INDEX_FILE;
use crate::ir;
use crate::module::Module;

/// Build the configuration subtree: an `index.ts` re-export over a
/// `configuration.ts` holding type `Configuration`.
///
/// An absent configuration section still produces a type, as an empty
/// object, so downstream aggregates can always reference it.
pub async fn create(
    configuration: Option<&ConfigurationDefinition>,
) -> Result<Module, CodegenError> {
    let schema = match configuration {
        Some(config) => config.schema.clone(),
        None => Schema::empty_object(),
    };
    let source = ir::type_source(&schema, "Configuration", "configuration.schema", &[]).await?;
    let mut index = Module::re_export("configuration", Some(INDEX_FILE.to_string()));
    index.push_dep(Module::content(
        "Configuration",
        "configuration.ts",
        source,
    ))?;
    Ok(index)
}
