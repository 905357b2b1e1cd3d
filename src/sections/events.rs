//! Events section builder.

use crate::definition::EventDefinition;
use crate::error::CodegenError;
use crate::generate::INDEX_FILE;
use crate::ir;
use crate::module::Module;
use crate::sections::{AggregateEntry, aggregate_source, unique_alias};
use crate::util::pascal_case;
use futures_util::future::try_join_all;
use std::collections::{BTreeMap, HashSet};

/// Build the events subtree: one file per event plus a mixed `index.ts`
/// that re-exports every event and declares the `Events` aggregate.
pub async fn create(events: &BTreeMap<String, EventDefinition>) -> Result<Module, CodegenError> {
    let modules = try_join_all(
        events
            .iter()
            .map(|(name, event)| build_event(name, event)),
    )
    .await?;

    let mut used = HashSet::new();
    let entries: Vec<AggregateEntry> = events
        .keys()
        .map(|name| AggregateEntry {
            key: name.clone(),
            alias: unique_alias(&mut used, name),
            type_name: pascal_case(name),
            from: format!("./{name}"),
        })
        .collect();

    let mut index = Module::mixed(
        "events",
        INDEX_FILE,
        aggregate_source("Events", &entries, &[]),
    );
    for module in modules {
        index.push_dep(module)?;
    }
    Ok(index)
}

async fn build_event(name: &str, event: &EventDefinition) -> Result<Module, CodegenError> {
    let type_name = pascal_case(name);
    let location = format!("events.{name}.schema");
    let source = ir::type_source(&event.schema, &type_name, &location, &[]).await?;
    Ok(Module::content(name, format!("{name}.ts"), source))
}
