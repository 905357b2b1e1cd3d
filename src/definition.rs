//! Input data model: bot and integration definitions and their schemas.
//!
//! This module defines the serde structs a definition file deserializes
//! into. Schemas are a JSON-Schema subset; constructs outside that subset
//! are rejected later during translation, not here.

use serde::Deserialize;
use std::collections::BTreeMap;

/// A top-level definition: either a bot or an integration.
///
/// The two kinds share schema-bearing sections but have different section
/// sets, so they are distinct structs behind one tagged entry point.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Definition {
    Bot(BotDefinition),
    Integration(IntegrationDefinition),
}

/// A bot definition: configuration, events, and states.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BotDefinition {
    pub configuration: Option<ConfigurationDefinition>,
    #[serde(default)]
    pub events: BTreeMap<String, EventDefinition>,
    #[serde(default)]
    pub states: BTreeMap<String, StateDefinition>,
}

/// An integration definition: everything a bot has, plus actions,
/// channels, and secrets.
#[derive(Debug, Clone, Deserialize)]
pub struct IntegrationDefinition {
    pub name: String,
    pub version: String,
    pub configuration: Option<ConfigurationDefinition>,
    #[serde(default)]
    pub events: BTreeMap<String, EventDefinition>,
    #[serde(default)]
    pub states: BTreeMap<String, StateDefinition>,
    #[serde(default)]
    pub actions: BTreeMap<String, ActionDefinition>,
    #[serde(default)]
    pub channels: BTreeMap<String, ChannelDefinition>,
    #[serde(default)]
    pub secrets: Vec<String>,
}

/// An integration attached to a bot, with its deployment id.
#[derive(Debug, Clone, Deserialize)]
pub struct IntegrationInstance {
    pub id: String,
    pub definition: IntegrationDefinition,
}

/// Configuration section: a single schema.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigurationDefinition {
    #[serde(default)]
    pub schema: Schema,
}

/// One named event and its payload schema.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventDefinition {
    #[serde(default)]
    pub schema: Schema,
}

/// One named state: a schema plus persistence metadata.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateDefinition {
    #[serde(rename = "type")]
    pub scope: StateScope,
    pub expiry_ms: Option<u64>,
    #[serde(default)]
    pub schema: Schema,
}

/// What a state is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateScope {
    Conversation,
    User,
    Bot,
}

impl StateScope {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Conversation => "conversation",
            Self::User => "user",
            Self::Bot => "bot",
        }
    }
}

/// One named action with input and output payloads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActionDefinition {
    #[serde(default)]
    pub input: ActionPayload,
    #[serde(default)]
    pub output: ActionPayload,
}

/// One side of an action (input or output).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActionPayload {
    #[serde(default)]
    pub schema: Schema,
}

/// One named channel: tag declarations and message types.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelDefinition {
    #[serde(default)]
    pub tags: BTreeMap<String, Tag>,
    #[serde(default)]
    pub conversation_tags: BTreeMap<String, Tag>,
    #[serde(default)]
    pub message_tags: BTreeMap<String, Tag>,
    #[serde(default)]
    pub messages: BTreeMap<String, MessageDefinition>,
}

/// Human-readable metadata attached to a tag declaration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Tag {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// One named message type within a channel.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageDefinition {
    #[serde(default)]
    pub schema: Schema,
}

/// JSON Schema subset used by definition sections.
///
/// Everything is optional; which combinations are meaningful is decided
/// during translation to the intermediate representation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// The type keyword (a single type or an array of types).
    #[serde(rename = "type")]
    pub schema_type: Option<SchemaType>,

    /// Reference to another schema. Not supported; kept so translation
    /// can reject it with a precise error instead of ignoring it.
    #[serde(rename = "$ref")]
    pub ref_path: Option<String>,

    /// Properties for object types.
    pub properties: Option<BTreeMap<String, Schema>>,

    /// Required property names for object types.
    pub required: Option<Vec<String>>,

    /// Item schema for array types.
    pub items: Option<Box<Schema>>,

    /// Enum values (strings, integers, floats, booleans, or null).
    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<EnumValue>>,

    /// Union type (any of these schemas).
    #[serde(rename = "anyOf")]
    pub any_of: Option<Vec<Schema>>,

    /// Additional properties for map-like object types.
    pub additional_properties: Option<AdditionalProperties>,

    /// Constant value: the schema matches only this exact value.
    #[serde(rename = "const")]
    pub const_value: Option<serde_json::Value>,

    /// OpenAPI 3.0 style nullable flag (3.1 uses type arrays instead).
    pub nullable: Option<bool>,

    /// Minimum length for strings; surfaced as a doc comment on fields.
    pub min_length: Option<u64>,

    /// Schema title, used for documentation only.
    pub title: Option<String>,

    /// Schema description, used for documentation only.
    pub description: Option<String>,
}

impl Schema {
    /// An object schema with no properties. Sections fall back to this
    /// when a definition omits an optional schema.
    pub fn empty_object() -> Self {
        Self {
            schema_type: Some(SchemaType::Single("object".to_string())),
            properties: Some(BTreeMap::new()),
            ..Self::default()
        }
    }
}

/// Enum value can be string, integer, float, boolean, or null.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EnumValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

/// Schema type can be a single type or an array of types (for nullable).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SchemaType {
    Single(String),
    Multiple(Vec<String>),
}

/// Additional properties can be a boolean or a schema.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Bool(bool),
    Schema(Box<Schema>),
}
