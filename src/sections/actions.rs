//! Actions section builder.
//!
//! Each action file declares `<Pascal>Input` and `<Pascal>Output` from the
//! action's two payload schemas, then a combined `<Pascal>` type over them.

use crate::definition::ActionDefinition;
use crate::error::CodegenError;
use crate::generate::INDEX_FILE;
use crate::ir;
use crate::module::Module;
use crate::sections::{AggregateEntry, aggregate_source, unique_alias};
use crate::util::pascal_case;
use futures_util::future::try_join_all;
use std::collections::{BTreeMap, HashSet};

/// Build the actions subtree: one file per action plus a mixed `index.ts`
/// declaring the `Actions` aggregate.
pub async fn create(actions: &BTreeMap<String, ActionDefinition>) -> Result<Module, CodegenError> {
    let modules = try_join_all(
        actions
            .iter()
            .map(|(name, action)| build_action(name, action)),
    )
    .await?;

    let mut used = HashSet::new();
    let entries: Vec<AggregateEntry> = actions
        .keys()
        .map(|name| AggregateEntry {
            key: name.clone(),
            alias: unique_alias(&mut used, name),
            type_name: pascal_case(name),
            from: format!("./{name}"),
        })
        .collect();

    let mut index = Module::mixed(
        "actions",
        INDEX_FILE,
        aggregate_source("Actions", &entries, &[]),
    );
    for module in modules {
        index.push_dep(module)?;
    }
    Ok(index)
}

async fn build_action(name: &str, action: &ActionDefinition) -> Result<Module, CodegenError> {
    let type_name = pascal_case(name);
    let input_type = format!("{type_name}Input");
    let output_type = format!("{type_name}Output");
    let input_location = format!("actions.{name}.input.schema");
    let output_location = format!("actions.{name}.output.schema");
    let (input, output) = futures_util::try_join!(
        ir::type_source(&action.input.schema, &input_type, &input_location, &[]),
        ir::type_source(&action.output.schema, &output_type, &output_location, &[]),
    )?;
    let combined = format!(
        "export type {type_name} = {{\n  input: {type_name}Input;\n  output: {type_name}Output;\n}};\n"
    );
    let source = format!("{input}\n{output}\n{combined}");
    Ok(Module::content(name, format!("{name}.ts"), source))
}
