//! Channels section builder.
//!
//! Channels nest one level deeper than the other sections: each channel
//! gets its own directory of message files under a channel index, and the
//! section index aggregates the channels.

use crate::definition::{ChannelDefinition, Tag};
use crate::error::CodegenError;
use crate::generate::INDEX_FILE;
use crate::ir;
use crate::module::Module;
use crate::sections::{AggregateEntry, aggregate_source, unique_alias};
use crate::util::{pascal_case, quote_if_needed};
use futures_util::future::try_join_all;
use std::collections::{BTreeMap, HashSet};

/// Build the channels subtree: per channel a directory of message files
/// under a mixed `<channel>/index.ts`, and a section-level mixed
/// `index.ts` declaring the `Channels` aggregate.
pub async fn create(channels: &BTreeMap<String, ChannelDefinition>) -> Result<Module, CodegenError> {
    let modules = try_join_all(
        channels
            .iter()
            .map(|(name, channel)| build_channel(name, channel)),
    )
    .await?;

    let mut used = HashSet::new();
    let entries: Vec<AggregateEntry> = channels
        .keys()
        .map(|name| AggregateEntry {
            key: name.clone(),
            alias: unique_alias(&mut used, name),
            type_name: pascal_case(name),
            from: format!("./{name}/index"),
        })
        .collect();

    let mut index = Module::mixed(
        "channels",
        INDEX_FILE,
        aggregate_source("Channels", &entries, &[]),
    );
    for module in modules {
        index.push_dep(module)?;
    }
    Ok(index)
}

async fn build_channel(name: &str, channel: &ChannelDefinition) -> Result<Module, CodegenError> {
    let messages = try_join_all(
        channel
            .messages
            .iter()
            .map(|(message_name, message)| async move {
                let type_name = pascal_case(message_name);
                let location = format!("channels.{name}.messages.{message_name}.schema");
                let source = ir::type_source(&message.schema, &type_name, &location, &[]).await?;
                Ok::<Module, CodegenError>(Module::content(
                    message_name,
                    format!("{message_name}.ts"),
                    source,
                ))
            }),
    )
    .await?;

    let mut index = Module::mixed(name, INDEX_FILE, channel_aggregate(name, channel));
    for message in messages {
        index.push_dep(message)?;
    }
    index.unshift(name)?;
    Ok(index)
}

/// The channel's own aggregate: message imports, tag documentation, and a
/// `{ messages: {...} }` type named after the channel.
fn channel_aggregate(name: &str, channel: &ChannelDefinition) -> String {
    let mut used = HashSet::new();
    let aliases: Vec<(String, String)> = channel
        .messages
        .keys()
        .map(|message| (message.clone(), unique_alias(&mut used, message)))
        .collect();

    let mut out = String::new();
    for (message, alias) in &aliases {
        out.push_str(&format!("import * as {alias} from \"./{message}\";\n"));
    }
    if !aliases.is_empty() {
        out.push('\n');
    }

    let doc: Vec<String> = [
        tag_line("channel tags", &channel.tags),
        tag_line("conversation tags", &channel.conversation_tags),
        tag_line("message tags", &channel.message_tags),
    ]
    .into_iter()
    .flatten()
    .collect();
    if !doc.is_empty() {
        out.push_str("/**\n");
        for line in &doc {
            out.push_str(&format!(" * {line}\n"));
        }
        out.push_str(" */\n");
    }

    let type_name = pascal_case(name);
    if aliases.is_empty() {
        out.push_str(&format!("export type {type_name} = {{\n  messages: {{}};\n}};\n"));
        return out;
    }
    out.push_str(&format!("export type {type_name} = {{\n  messages: {{\n"));
    for (message, alias) in &aliases {
        out.push_str(&format!(
            "    {}: {}.{};\n",
            quote_if_needed(message),
            alias,
            pascal_case(message)
        ));
    }
    out.push_str("  };\n};\n");
    out
}

fn tag_line(label: &str, tags: &BTreeMap<String, Tag>) -> Option<String> {
    if tags.is_empty() {
        return None;
    }
    let parts: Vec<String> = tags
        .iter()
        .map(|(name, tag)| match &tag.title {
            Some(title) => format!("{name} ({title})"),
            None => name.clone(),
        })
        .collect();
    Some(format!("{label}: {}", parts.join(", ")))
}
