//! States section builder.
//!
//! State scope and expiry are persistence metadata, not payload fields;
//! they surface as a doc comment on each state's declaration.

use crate::definition::StateDefinition;
use crate::error::CodegenError;
use crate::generate::INDEX_FILE;
use crate::ir;
use crate::module::Module;
use crate::sections::{AggregateEntry, aggregate_source, unique_alias};
use crate::util::pascal_case;
use futures_util::future::try_join_all;
use std::collections::{BTreeMap, HashSet};

/// Build the states subtree: one file per state plus a mixed `index.ts`
/// declaring the `States` aggregate.
pub async fn create(states: &BTreeMap<String, StateDefinition>) -> Result<Module, CodegenError> {
    let modules = try_join_all(
        states
            .iter()
            .map(|(name, state)| build_state(name, state)),
    )
    .await?;

    let mut used = HashSet::new();
    let entries: Vec<AggregateEntry> = states
        .keys()
        .map(|name| AggregateEntry {
            key: name.clone(),
            alias: unique_alias(&mut used, name),
            type_name: pascal_case(name),
            from: format!("./{name}"),
        })
        .collect();

    let mut index = Module::mixed(
        "states",
        INDEX_FILE,
        aggregate_source("States", &entries, &[]),
    );
    for module in modules {
        index.push_dep(module)?;
    }
    Ok(index)
}

async fn build_state(name: &str, state: &StateDefinition) -> Result<Module, CodegenError> {
    let type_name = pascal_case(name);
    let location = format!("states.{name}.schema");
    let mut doc = vec![format!("scope: {}", state.scope.as_str())];
    if let Some(expiry_ms) = state.expiry_ms {
        doc.push(format!("expires after {expiry_ms} ms"));
    }
    let source = ir::type_source(&state.schema, &type_name, &location, &doc).await?;
    Ok(Module::content(name, format!("{name}.ts"), source))
}
