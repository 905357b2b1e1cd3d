//! Rendering of the intermediate representation into TypeScript source.
//!
//! Nested object nodes are hoisted into named declarations so every object
//! shape gets an addressable type. Hoisted declarations are emitted before
//! the declaration that references them.

use crate::ir::node::{FieldNode, LiteralNode, SchemaNode};
use crate::util::{escape_string, pascal_case, quote_if_needed};
use std::collections::HashSet;

/// Render a translated schema as TypeScript type-declaration source.
///
/// The result is one `export type {type_name} = ...;` declaration plus any
/// hoisted declarations it depends on. `doc` becomes a JSDoc block on the
/// main declaration (one line per entry).
pub fn render_type_source(node: &SchemaNode, type_name: &str, doc: &[String]) -> String {
    let mut renderer = Renderer::new(type_name);

    let body = match node {
        SchemaNode::Object(fields) => renderer.render_object_body(fields, type_name),
        other => renderer.render_node(other, type_name),
    };

    let mut main = String::new();
    if !doc.is_empty() {
        main.push_str("/**\n");
        for line in doc {
            main.push_str(&format!(" * {line}\n"));
        }
        main.push_str(" */\n");
    }
    main.push_str(&format!("export type {type_name} = {body};"));
    renderer.declarations.push(main);

    let mut out = renderer.declarations.join("\n\n");
    out.push('\n');
    out
}

struct Renderer {
    /// Completed declarations, dependencies before dependents.
    declarations: Vec<String>,
    used_names: HashSet<String>,
}

impl Renderer {
    fn new(type_name: &str) -> Self {
        let mut used_names = HashSet::new();
        used_names.insert(type_name.to_string());
        Self {
            declarations: Vec::new(),
            used_names,
        }
    }

    /// Render a node inline, hoisting object nodes into named declarations.
    ///
    /// `hint` seeds the name of any declaration hoisted beneath this node.
    fn render_node(&mut self, node: &SchemaNode, hint: &str) -> String {
        match node {
            SchemaNode::String { .. } => "string".to_string(),
            SchemaNode::Number => "number".to_string(),
            SchemaNode::Boolean => "boolean".to_string(),
            SchemaNode::Null => "null".to_string(),
            SchemaNode::Unknown => "unknown".to_string(),
            SchemaNode::Literal(literal) => render_literal(literal),
            SchemaNode::Array(inner) => {
                let rendered = self.render_node(inner, &format!("{hint}Item"));
                if matches!(**inner, SchemaNode::Union(_)) {
                    format!("({rendered})[]")
                } else {
                    format!("{rendered}[]")
                }
            }
            SchemaNode::Record(value) => {
                let rendered = self.render_node(value, &format!("{hint}Value"));
                format!("Record<string, {rendered}>")
            }
            SchemaNode::Union(members) => members
                .iter()
                .map(|m| self.render_node(m, hint))
                .collect::<Vec<_>>()
                .join(" | "),
            SchemaNode::Object(fields) => {
                let name = self.claim_name(hint);
                let body = self.render_object_body(fields, &name);
                self.declarations
                    .push(format!("export type {name} = {body};"));
                name
            }
        }
    }

    fn render_object_body(&mut self, fields: &[FieldNode], parent_name: &str) -> String {
        if fields.is_empty() {
            return "{}".to_string();
        }
        let mut body = String::from("{\n");
        for field in fields {
            let hint = format!("{parent_name}{}", pascal_case(&field.name));
            let rendered = self.render_node(&field.node, &hint);
            if let SchemaNode::String {
                min_length: Some(n),
            } = &field.node
            {
                body.push_str(&format!("  /** minimum length: {n} */\n"));
            }
            let key = quote_if_needed(&field.name);
            let marker = if field.optional { "?" } else { "" };
            body.push_str(&format!("  {key}{marker}: {rendered};\n"));
        }
        body.push('}');
        body
    }

    /// Reserve a declaration name, suffixing with a counter on collision.
    fn claim_name(&mut self, hint: &str) -> String {
        if self.used_names.insert(hint.to_string()) {
            return hint.to_string();
        }
        let mut i = 2;
        loop {
            let candidate = format!("{hint}{i}");
            if self.used_names.insert(candidate.clone()) {
                return candidate;
            }
            i += 1;
        }
    }
}

fn render_literal(literal: &LiteralNode) -> String {
    match literal {
        LiteralNode::String(s) => format!("\"{}\"", escape_string(s)),
        LiteralNode::Int(i) => i.to_string(),
        LiteralNode::Number(f) => f.to_string(),
        LiteralNode::Bool(b) => b.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    fn field(name: &str, node: SchemaNode, optional: bool) -> FieldNode {
        FieldNode {
            name: name.to_string(),
            node,
            optional,
        }
    }

    #[test]
    fn test_render_simple_object() {
        let node = SchemaNode::Object(vec![
            field("token", SchemaNode::String { min_length: None }, false),
            field("retries", SchemaNode::Number, true),
        ]);
        let source = render_type_source(&node, "Configuration", &[]);
        assert_eq!(
            source,
            "export type Configuration = {\n  token: string;\n  retries?: number;\n};\n"
        );
    }

    #[test]
    fn test_nested_object_is_hoisted_before_parent() {
        let node = SchemaNode::Object(vec![field(
            "database",
            SchemaNode::Object(vec![field(
                "url",
                SchemaNode::String { min_length: None },
                false,
            )]),
            false,
        )]);
        let source = render_type_source(&node, "Configuration", &[]);
        let hoisted = source
            .find("export type ConfigurationDatabase = {")
            .unwrap();
        let main = source.find("export type Configuration = {").unwrap();
        assert!(hoisted < main, "hoisted declaration must come first");
        assert!(source.contains("database: ConfigurationDatabase;"));
    }

    #[test]
    fn test_hoisted_name_collision_gets_suffix() {
        let inner = SchemaNode::Object(vec![field(
            "x",
            SchemaNode::String { min_length: None },
            false,
        )]);
        let node = SchemaNode::Object(vec![
            field("data-base", inner.clone(), false),
            field("data base", inner, false),
        ]);
        let source = render_type_source(&node, "Payload", &[]);
        assert!(source.contains("export type PayloadDataBase = {"));
        assert!(source.contains("export type PayloadDataBase2 = {"));
    }

    #[test]
    fn test_array_of_union_is_parenthesized() {
        let node = SchemaNode::Array(Box::new(SchemaNode::Union(vec![
            SchemaNode::String { min_length: None },
            SchemaNode::Number,
        ])));
        let source = render_type_source(&node, "Items", &[]);
        assert_eq!(source, "export type Items = (string | number)[];\n");
    }

    #[test]
    fn test_record_rendering() {
        let node = SchemaNode::Record(Box::new(SchemaNode::Unknown));
        let source = render_type_source(&node, "Anything", &[]);
        assert_eq!(source, "export type Anything = Record<string, unknown>;\n");
    }

    #[test]
    fn test_literal_union() {
        let node = SchemaNode::Union(vec![
            SchemaNode::Literal(LiteralNode::String("draft".to_string())),
            SchemaNode::Literal(LiteralNode::String("live".to_string())),
            SchemaNode::Null,
        ]);
        let source = render_type_source(&node, "Status", &[]);
        assert_eq!(source, "export type Status = \"draft\" | \"live\" | null;\n");
    }

    #[test]
    fn test_min_length_doc_comment() {
        let node = SchemaNode::Object(vec![field(
            "name",
            SchemaNode::String { min_length: Some(1) },
            false,
        )]);
        let source = render_type_source(&node, "Input", &[]);
        assert!(source.contains("  /** minimum length: 1 */\n  name: string;\n"));
    }

    #[test]
    fn test_doc_block_on_main_declaration() {
        let node = SchemaNode::Object(Vec::new());
        let doc = vec!["scope: conversation".to_string(), "expires after 60000 ms".to_string()];
        let source = render_type_source(&node, "Flows", &doc);
        assert_eq!(
            source,
            "/**\n * scope: conversation\n * expires after 60000 ms\n */\nexport type Flows = {};\n"
        );
    }

    #[test]
    fn test_quoted_property_key() {
        let node = SchemaNode::Object(vec![field(
            "content-type",
            SchemaNode::String { min_length: None },
            false,
        )]);
        let source = render_type_source(&node, "Headers", &[]);
        assert!(source.contains("  \"content-type\": string;\n"));
    }
}
