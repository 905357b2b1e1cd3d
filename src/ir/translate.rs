//! Translation from the JSON-Schema subset into the intermediate
//! representation.
//!
//! Translation is total over the supported subset and rejects everything
//! else with a [`CodegenError::UnsupportedSchema`] carrying the dotted
//! location of the offending construct.

use crate::definition::{AdditionalProperties, EnumValue, Schema, SchemaType};
use crate::error::CodegenError;
use crate::ir::node::{FieldNode, LiteralNode, SchemaNode};

/// Maximum schema nesting depth before translation bails out.
const MAX_DEPTH: usize = 64;

/// Translate a schema into a [`SchemaNode`].
///
/// `location` is a dotted path ("configuration.schema.properties.token")
/// used only for error reporting.
pub fn to_intermediate(schema: &Schema, location: &str) -> Result<SchemaNode, CodegenError> {
    translate(schema, location, 0)
}

fn translate(schema: &Schema, location: &str, depth: usize) -> Result<SchemaNode, CodegenError> {
    if depth > MAX_DEPTH {
        return Err(unsupported(location, "schema nesting exceeds maximum depth"));
    }

    if let Some(ref_path) = &schema.ref_path {
        return Err(unsupported(
            location,
            format!("`$ref` to `{ref_path}` is not supported; inline the schema"),
        ));
    }

    let node = if let Some(value) = &schema.const_value {
        literal_from_value(value, location)?
    } else if let Some(values) = &schema.enum_values {
        translate_enum(values, location)?
    } else if let Some(members) = &schema.any_of {
        translate_any_of(members, location, depth)?
    } else {
        match &schema.schema_type {
            // A bare `properties`/`additionalProperties` schema is the
            // common shorthand for an object; only a schema with no shape
            // at all maps to `unknown`.
            None if schema.properties.is_some() || schema.additional_properties.is_some() => {
                translate_object(schema, location, depth)?
            }
            None => SchemaNode::Unknown,
            Some(SchemaType::Single(name)) => {
                translate_named_type(schema, name, location, depth)?
            }
            Some(SchemaType::Multiple(names)) => {
                let mut members = Vec::new();
                for name in names {
                    let member = translate_named_type(schema, name, location, depth)?;
                    if !members.contains(&member) {
                        members.push(member);
                    }
                }
                into_union(members, location)?
            }
        }
    };

    if schema.nullable == Some(true) {
        Ok(add_null(node))
    } else {
        Ok(node)
    }
}

fn translate_named_type(
    schema: &Schema,
    name: &str,
    location: &str,
    depth: usize,
) -> Result<SchemaNode, CodegenError> {
    match name {
        "string" => Ok(SchemaNode::String {
            min_length: schema.min_length,
        }),
        "number" | "integer" => Ok(SchemaNode::Number),
        "boolean" => Ok(SchemaNode::Boolean),
        "null" => Ok(SchemaNode::Null),
        "array" => {
            let items = match &schema.items {
                Some(items) => translate(items, &format!("{location}.items"), depth + 1)?,
                None => SchemaNode::Unknown,
            };
            Ok(SchemaNode::Array(Box::new(items)))
        }
        "object" => translate_object(schema, location, depth),
        other => Err(unsupported(location, format!("unknown type `{other}`"))),
    }
}

fn translate_object(
    schema: &Schema,
    location: &str,
    depth: usize,
) -> Result<SchemaNode, CodegenError> {
    if let Some(properties) = &schema.properties {
        match &schema.additional_properties {
            Some(AdditionalProperties::Schema(_)) | Some(AdditionalProperties::Bool(true)) => {
                return Err(unsupported(
                    location,
                    "object mixes `properties` with open `additionalProperties`",
                ));
            }
            Some(AdditionalProperties::Bool(false)) | None => {}
        }
        let required = schema.required.clone().unwrap_or_default();
        let mut fields = Vec::new();
        for (name, property) in properties {
            let node = translate(
                property,
                &format!("{location}.properties.{name}"),
                depth + 1,
            )?;
            fields.push(FieldNode {
                name: name.clone(),
                node,
                optional: !required.iter().any(|r| r == name),
            });
        }
        return Ok(SchemaNode::Object(fields));
    }

    match &schema.additional_properties {
        Some(AdditionalProperties::Schema(value)) => {
            let node = translate(
                value,
                &format!("{location}.additionalProperties"),
                depth + 1,
            )?;
            Ok(SchemaNode::Record(Box::new(node)))
        }
        Some(AdditionalProperties::Bool(false)) => Ok(SchemaNode::Object(Vec::new())),
        Some(AdditionalProperties::Bool(true)) | None => {
            Ok(SchemaNode::Record(Box::new(SchemaNode::Unknown)))
        }
    }
}

fn translate_enum(values: &[EnumValue], location: &str) -> Result<SchemaNode, CodegenError> {
    if values.is_empty() {
        return Err(unsupported(location, "`enum` with no values"));
    }
    let mut members = Vec::new();
    for value in values {
        let member = match value {
            EnumValue::String(s) => SchemaNode::Literal(LiteralNode::String(s.clone())),
            EnumValue::Integer(i) => SchemaNode::Literal(LiteralNode::Int(*i)),
            EnumValue::Float(f) => SchemaNode::Literal(LiteralNode::Number(*f)),
            EnumValue::Bool(b) => SchemaNode::Literal(LiteralNode::Bool(*b)),
            EnumValue::Null => SchemaNode::Null,
        };
        if !members.contains(&member) {
            members.push(member);
        }
    }
    into_union(members, location)
}

fn translate_any_of(
    members: &[Schema],
    location: &str,
    depth: usize,
) -> Result<SchemaNode, CodegenError> {
    if members.is_empty() {
        return Err(unsupported(location, "`anyOf` with no members"));
    }
    let mut nodes = Vec::new();
    for (i, member) in members.iter().enumerate() {
        let node = translate(member, &format!("{location}.anyOf.{i}"), depth + 1)?;
        if !nodes.contains(&node) {
            nodes.push(node);
        }
    }
    into_union(nodes, location)
}

/// Build a union from translated members, collapsing singletons and
/// rejecting unions the renderer cannot express as one declaration.
///
/// Aside from `null`, a union may hold either a single member of any
/// kind, or several primitives/literals that all share one base kind.
/// Mixing composites forces ambiguous naming of hoisted declarations,
/// and heterogeneous primitive unions have no defined mapping.
fn into_union(members: Vec<SchemaNode>, location: &str) -> Result<SchemaNode, CodegenError> {
    let non_null: Vec<&SchemaNode> = members
        .iter()
        .filter(|m| !matches!(m, SchemaNode::Null))
        .collect();
    if non_null.len() > 1 {
        let kinds: Vec<Option<&'static str>> = non_null.iter().map(|m| base_kind(m)).collect();
        if kinds.iter().any(Option::is_none) {
            return Err(unsupported(
                location,
                "union of multiple object, array, or record members",
            ));
        }
        if kinds.windows(2).any(|pair| pair[0] != pair[1]) {
            return Err(unsupported(
                location,
                "union mixing incompatible member kinds",
            ));
        }
    }
    let mut members = members;
    match members.len() {
        0 => Err(unsupported(location, "union with no members")),
        1 => Ok(members.remove(0)),
        _ => Ok(SchemaNode::Union(members)),
    }
}

/// The primitive base kind of a union member, `None` for composites.
fn base_kind(node: &SchemaNode) -> Option<&'static str> {
    match node {
        SchemaNode::String { .. } | SchemaNode::Literal(LiteralNode::String(_)) => Some("string"),
        SchemaNode::Number
        | SchemaNode::Literal(LiteralNode::Int(_))
        | SchemaNode::Literal(LiteralNode::Number(_)) => Some("number"),
        SchemaNode::Boolean | SchemaNode::Literal(LiteralNode::Bool(_)) => Some("boolean"),
        SchemaNode::Unknown => Some("unknown"),
        SchemaNode::Null
        | SchemaNode::Array(_)
        | SchemaNode::Record(_)
        | SchemaNode::Union(_)
        | SchemaNode::Object(_) => None,
    }
}

fn add_null(node: SchemaNode) -> SchemaNode {
    match node {
        SchemaNode::Null => SchemaNode::Null,
        SchemaNode::Union(mut members) => {
            if !members.contains(&SchemaNode::Null) {
                members.push(SchemaNode::Null);
            }
            SchemaNode::Union(members)
        }
        other => SchemaNode::Union(vec![other, SchemaNode::Null]),
    }
}

fn literal_from_value(
    value: &serde_json::Value,
    location: &str,
) -> Result<SchemaNode, CodegenError> {
    match value {
        serde_json::Value::String(s) => {
            Ok(SchemaNode::Literal(LiteralNode::String(s.clone())))
        }
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(SchemaNode::Literal(LiteralNode::Int(i)))
            } else if let Some(f) = n.as_f64() {
                Ok(SchemaNode::Literal(LiteralNode::Number(f)))
            } else {
                Err(unsupported(location, "`const` number out of range"))
            }
        }
        serde_json::Value::Bool(b) => Ok(SchemaNode::Literal(LiteralNode::Bool(*b))),
        serde_json::Value::Null => Ok(SchemaNode::Null),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => Err(unsupported(
            location,
            "`const` with a composite value",
        )),
    }
}

fn unsupported(location: &str, reason: impl Into<String>) -> CodegenError {
    CodegenError::UnsupportedSchema {
        location: location.to_string(),
        reason: reason.into(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Schema {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_object_with_required_and_optional_fields() {
        let schema = parse(
            r#"{
                "type": "object",
                "properties": {
                    "token": { "type": "string" },
                    "retries": { "type": "number" }
                },
                "required": ["token"]
            }"#,
        );
        let node = to_intermediate(&schema, "configuration.schema").unwrap();
        let SchemaNode::Object(fields) = node else {
            panic!("expected an object node");
        };
        assert_eq!(fields.len(), 2);
        let token = fields.iter().find(|f| f.name == "token").unwrap();
        assert!(!token.optional);
        let retries = fields.iter().find(|f| f.name == "retries").unwrap();
        assert!(retries.optional);
    }

    #[test]
    fn test_enum_becomes_literal_union() {
        let schema = parse(r#"{ "type": "string", "enum": ["draft", "live"] }"#);
        let node = to_intermediate(&schema, "t").unwrap();
        assert_eq!(
            node,
            SchemaNode::Union(vec![
                SchemaNode::Literal(LiteralNode::String("draft".to_string())),
                SchemaNode::Literal(LiteralNode::String("live".to_string())),
            ])
        );
    }

    #[test]
    fn test_single_member_enum_collapses() {
        let schema = parse(r#"{ "enum": ["only"] }"#);
        let node = to_intermediate(&schema, "t").unwrap();
        assert_eq!(
            node,
            SchemaNode::Literal(LiteralNode::String("only".to_string()))
        );
    }

    #[test]
    fn test_nullable_flag_adds_null_member() {
        let schema = parse(r#"{ "type": "string", "nullable": true }"#);
        let node = to_intermediate(&schema, "t").unwrap();
        assert_eq!(
            node,
            SchemaNode::Union(vec![
                SchemaNode::String { min_length: None },
                SchemaNode::Null,
            ])
        );
    }

    #[test]
    fn test_any_of_with_null() {
        let schema = parse(r#"{ "anyOf": [{ "type": "number" }, { "type": "null" }] }"#);
        let node = to_intermediate(&schema, "t").unwrap();
        assert_eq!(
            node,
            SchemaNode::Union(vec![SchemaNode::Number, SchemaNode::Null])
        );
    }

    #[test]
    fn test_type_array() {
        let schema = parse(r#"{ "type": ["string", "null"] }"#);
        let node = to_intermediate(&schema, "t").unwrap();
        assert_eq!(
            node,
            SchemaNode::Union(vec![
                SchemaNode::String { min_length: None },
                SchemaNode::Null,
            ])
        );
    }

    #[test]
    fn test_additional_properties_schema_becomes_record() {
        let schema = parse(
            r#"{ "type": "object", "additionalProperties": { "type": "string" } }"#,
        );
        let node = to_intermediate(&schema, "t").unwrap();
        assert_eq!(
            node,
            SchemaNode::Record(Box::new(SchemaNode::String { min_length: None }))
        );
    }

    #[test]
    fn test_bare_object_becomes_open_record() {
        let schema = parse(r#"{ "type": "object" }"#);
        let node = to_intermediate(&schema, "t").unwrap();
        assert_eq!(node, SchemaNode::Record(Box::new(SchemaNode::Unknown)));
    }

    #[test]
    fn test_closed_empty_object() {
        let schema = parse(r#"{ "type": "object", "additionalProperties": false }"#);
        let node = to_intermediate(&schema, "t").unwrap();
        assert_eq!(node, SchemaNode::Object(Vec::new()));
    }

    #[test]
    fn test_ref_is_rejected_with_location() {
        let schema = parse(
            r##"{
                "type": "object",
                "properties": { "user": { "$ref": "#/defs/User" } }
            }"##,
        );
        let err = to_intermediate(&schema, "events.created.schema").unwrap_err();
        let CodegenError::UnsupportedSchema { location, .. } = err else {
            panic!("expected an unsupported-schema error");
        };
        assert_eq!(location, "events.created.schema.properties.user");
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let schema = parse(r#"{ "type": "tuple" }"#);
        let err = to_intermediate(&schema, "t").unwrap_err();
        assert!(matches!(err, CodegenError::UnsupportedSchema { .. }));
    }

    #[test]
    fn test_union_of_two_objects_is_rejected() {
        let schema = parse(
            r#"{
                "anyOf": [
                    { "type": "object", "properties": { "a": { "type": "string" } } },
                    { "type": "object", "properties": { "b": { "type": "string" } } }
                ]
            }"#,
        );
        let err = to_intermediate(&schema, "t").unwrap_err();
        assert!(matches!(err, CodegenError::UnsupportedSchema { .. }));
    }

    #[test]
    fn test_union_mixing_primitive_kinds_is_rejected() {
        let schema = parse(r#"{ "anyOf": [{ "type": "string" }, { "type": "number" }] }"#);
        let err = to_intermediate(&schema, "t").unwrap_err();
        assert!(matches!(err, CodegenError::UnsupportedSchema { .. }));
    }

    #[test]
    fn test_literal_union_of_one_kind_is_accepted() {
        let schema = parse(r#"{ "enum": ["draft", "live", null] }"#);
        let node = to_intermediate(&schema, "t").unwrap();
        assert_eq!(
            node,
            SchemaNode::Union(vec![
                SchemaNode::Literal(LiteralNode::String("draft".to_string())),
                SchemaNode::Literal(LiteralNode::String("live".to_string())),
                SchemaNode::Null,
            ])
        );
    }

    #[test]
    fn test_open_additional_properties_with_properties_is_rejected() {
        let schema = parse(
            r#"{
                "type": "object",
                "properties": { "a": { "type": "string" } },
                "additionalProperties": true
            }"#,
        );
        let err = to_intermediate(&schema, "t").unwrap_err();
        assert!(matches!(err, CodegenError::UnsupportedSchema { .. }));
    }

    #[test]
    fn test_depth_limit() {
        let mut schema = Schema {
            schema_type: Some(SchemaType::Single("string".to_string())),
            ..Schema::default()
        };
        for _ in 0..100 {
            schema = Schema {
                schema_type: Some(SchemaType::Single("array".to_string())),
                items: Some(Box::new(schema)),
                ..Schema::default()
            };
        }
        let err = to_intermediate(&schema, "t").unwrap_err();
        assert!(matches!(err, CodegenError::UnsupportedSchema { .. }));
    }

    #[test]
    fn test_typeless_schema_with_properties_is_an_object() {
        let schema = parse(
            r#"{
                "properties": { "token": { "type": "string" } },
                "required": ["token"]
            }"#,
        );
        let node = to_intermediate(&schema, "t").unwrap();
        let SchemaNode::Object(fields) = node else {
            panic!("expected an object node");
        };
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name, "token");
        assert!(!fields[0].optional);
    }

    #[test]
    fn test_typeless_schema_with_additional_properties_is_a_record() {
        let schema = parse(r#"{ "additionalProperties": { "type": "number" } }"#);
        let node = to_intermediate(&schema, "t").unwrap();
        assert_eq!(node, SchemaNode::Record(Box::new(SchemaNode::Number)));
    }

    #[test]
    fn test_const_string() {
        let schema = parse(r#"{ "const": "fixed" }"#);
        let node = to_intermediate(&schema, "t").unwrap();
        assert_eq!(
            node,
            SchemaNode::Literal(LiteralNode::String("fixed".to_string()))
        );
    }

    #[test]
    fn test_min_length_is_carried() {
        let schema = parse(r#"{ "type": "string", "minLength": 1 }"#);
        let node = to_intermediate(&schema, "t").unwrap();
        assert_eq!(node, SchemaNode::String { min_length: Some(1) });
    }
}
