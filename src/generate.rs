//! Top-level generation entry points.
//!
//! These compose the section builders into full output trees: standalone
//! typings for a bot or integration, an installed integration instance
//! with its sidecar record, and the bot root index tying instances
//! together.

use crate::definition::{BotDefinition, Definition, IntegrationDefinition, IntegrationInstance};
use crate::error::CodegenError;
use crate::module::{File, GENERATED_HEADER, Module};
use crate::sections;
use crate::sections::unique_alias;
use crate::util::{escape_string, kebab_case, pascal_case, sanitize_identifier};
use futures_util::try_join;
use std::collections::{BTreeMap, HashSet};

pub const INDEX_FILE: &str = "index.ts";
pub const INTEGRATION_JSON: &str = "integration.json";

/// Generate typings for a definition under `typings_dir`.
pub async fn generate_typings(
    definition: &Definition,
    typings_dir: &str,
) -> Result<Vec<File>, CodegenError> {
    match definition {
        Definition::Bot(bot) => generate_bot_typings(bot, typings_dir).await,
        Definition::Integration(integration) => {
            generate_integration_typings(integration, typings_dir).await
        }
    }
}

/// Generate a bot's typings: configuration, events, and states under
/// `typings_dir`, tied together by a root re-export index.
pub async fn generate_bot_typings(
    bot: &BotDefinition,
    typings_dir: &str,
) -> Result<Vec<File>, CodegenError> {
    let (mut configuration, mut events, mut states) = try_join!(
        sections::configuration::create(bot.configuration.as_ref()),
        sections::events::create(&bot.events),
        sections::states::create(&bot.states),
    )?;
    configuration.unshift("configuration")?;
    events.unshift("events")?;
    states.unshift("states")?;

    let mut root = Module::re_export("Bot", Some(INDEX_FILE.to_string()));
    root.push_dep(configuration)?;
    root.push_dep(events)?;
    root.push_dep(states)?;
    root.unshift(typings_dir)?;

    let files = root.flatten()?;
    tracing::debug!(file_count = files.len(), "generated bot typings");
    Ok(files)
}

/// Generate an integration's typings: all six sections under
/// `typings_dir`, tied together by a root re-export index.
pub async fn generate_integration_typings(
    integration: &IntegrationDefinition,
    typings_dir: &str,
) -> Result<Vec<File>, CodegenError> {
    let (mut configuration, mut events, mut states, mut actions, mut channels) =
        schema_sections(integration).await?;
    let mut secrets = sections::secrets::create(&integration.secrets)?;
    configuration.unshift("configuration")?;
    events.unshift("events")?;
    states.unshift("states")?;
    actions.unshift("actions")?;
    channels.unshift("channels")?;
    secrets.unshift("secrets")?;

    let mut root = Module::re_export("Integration", Some(INDEX_FILE.to_string()));
    root.push_dep(configuration)?;
    root.push_dep(events)?;
    root.push_dep(states)?;
    root.push_dep(actions)?;
    root.push_dep(channels)?;
    root.push_dep(secrets)?;
    root.unshift(typings_dir)?;

    let files = root.flatten()?;
    tracing::debug!(
        integration = %integration.name,
        file_count = files.len(),
        "generated integration typings"
    );
    Ok(files)
}

/// Generate an installed integration instance under
/// `{install_dir}/{kebab(name)}`: a mixed root index whose own content is
/// the hand-composed `T<Pascal>` aggregate, the schema sections (secrets
/// are not part of an instance's surface), and the `integration.json`
/// sidecar record.
pub async fn generate_integration_instance(
    instance: &IntegrationInstance,
    install_dir: &str,
) -> Result<Vec<File>, CodegenError> {
    let definition = &instance.definition;
    let dirname = kebab_case(&definition.name);
    let (mut configuration, mut events, mut states, mut actions, mut channels) =
        schema_sections(definition).await?;
    configuration.unshift("configuration")?;
    events.unshift("events")?;
    states.unshift("states")?;
    actions.unshift("actions")?;
    channels.unshift("channels")?;

    let type_name = format!("T{}", pascal_case(&definition.name));
    let mut root = Module::mixed(
        type_name.clone(),
        INDEX_FILE,
        instance_aggregate(&type_name, &definition.name, &definition.version),
    );
    root.push_dep(configuration)?;
    root.push_dep(events)?;
    root.push_dep(states)?;
    root.push_dep(actions)?;
    root.push_dep(channels)?;
    root.unshift(&dirname)?;
    root.unshift(install_dir)?;

    let mut files = root.flatten()?;
    let sidecar = serde_json::json!({
        "name": definition.name,
        "version": definition.version,
        "id": instance.id,
    });
    files.push(File {
        path: format!("{install_dir}/{dirname}/{INTEGRATION_JSON}"),
        content: format!("{sidecar:#}\n"),
    });
    tracing::debug!(
        integration = %definition.name,
        instance_id = %instance.id,
        file_count = files.len(),
        "generated integration instance"
    );
    Ok(files)
}

/// Generate the bot root `index.ts`: imports and re-exports every
/// installed instance under its camelCase identifier and declares the
/// `TBot` aggregate over instance typings plus the bot's own states and
/// events.
pub fn generate_bot_index(
    typings_dir: &str,
    install_dir: &str,
    instances: &[IntegrationInstance],
) -> Result<File, CodegenError> {
    let mut by_ident: BTreeMap<String, String> = BTreeMap::new();
    let mut used = HashSet::new();
    let mut entries = Vec::new();
    for instance in instances {
        let dirname = kebab_case(&instance.definition.name);
        let ident = sanitize_identifier(&dirname);
        if let Some(first) = by_ident.get(&ident) {
            return Err(CodegenError::NameCollision {
                identifier: ident,
                first: first.clone(),
                second: instance.definition.name.clone(),
            });
        }
        by_ident.insert(ident.clone(), instance.definition.name.clone());
        used.insert(ident.clone());
        let type_name = format!("T{}", pascal_case(&instance.definition.name));
        entries.push((ident, dirname, type_name));
    }
    let states_alias = unique_alias(&mut used, "states");
    let events_alias = unique_alias(&mut used, "events");

    let mut body = String::new();
    for (ident, dirname, _) in &entries {
        body.push_str(&format!(
            "import * as {ident} from \"./{install_dir}/{dirname}/index\";\n"
        ));
        body.push_str(&format!(
            "export * as {ident} from \"./{install_dir}/{dirname}/index\";\n"
        ));
    }
    body.push_str(&format!(
        "import * as {states_alias} from \"./{typings_dir}/states/index\";\n"
    ));
    body.push_str(&format!(
        "import * as {events_alias} from \"./{typings_dir}/events/index\";\n"
    ));
    body.push('\n');

    body.push_str("export type TBot = {\n  integrations: {\n");
    for (ident, _, type_name) in &entries {
        body.push_str(&format!("    {ident}: {ident}.{type_name};\n"));
    }
    body.push_str("  };\n");
    body.push_str(&format!("  states: {states_alias}.States;\n"));
    body.push_str(&format!("  events: {events_alias}.Events;\n"));
    body.push_str("};\n");

    tracing::debug!(instance_count = entries.len(), "generated bot index");
    Ok(File {
        path: INDEX_FILE.to_string(),
        content: format!("{GENERATED_HEADER}{body}"),
    })
}

async fn schema_sections(
    integration: &IntegrationDefinition,
) -> Result<(Module, Module, Module, Module, Module), CodegenError> {
    try_join!(
        sections::configuration::create(integration.configuration.as_ref()),
        sections::events::create(&integration.events),
        sections::states::create(&integration.states),
        sections::actions::create(&integration.actions),
        sections::channels::create(&integration.channels),
    )
}

fn instance_aggregate(type_name: &str, name: &str, version: &str) -> String {
    let mut out = String::new();
    out.push_str("import * as configuration from \"./configuration/index\";\n");
    out.push_str("import * as actions from \"./actions/index\";\n");
    out.push_str("import * as channels from \"./channels/index\";\n");
    out.push_str("import * as events from \"./events/index\";\n");
    out.push_str("import * as states from \"./states/index\";\n");
    out.push('\n');
    out.push_str(&format!("export type {type_name} = {{\n"));
    out.push_str(&format!("  name: \"{}\";\n", escape_string(name)));
    out.push_str(&format!("  version: \"{}\";\n", escape_string(version)));
    out.push_str("  configuration: configuration.Configuration;\n");
    out.push_str("  actions: actions.Actions;\n");
    out.push_str("  channels: channels.Channels;\n");
    out.push_str("  events: events.Events;\n");
    out.push_str("  states: states.States;\n");
    out.push_str("};\n");
    out
}
