//! Intermediate representation of schemas.
//!
//! Translation produces these nodes from the JSON-Schema subset; rendering
//! turns them into TypeScript declaration source. Keeping the two phases
//! apart means rendering never has to consult the input schema again.

/// A schema translated into renderable form.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    /// `string`, with an optional minimum-length annotation surfaced as
    /// documentation on the enclosing field.
    String { min_length: Option<u64> },
    /// `number` (integers and floats both map here).
    Number,
    /// `boolean`
    Boolean,
    /// `null`
    Null,
    /// `unknown`: the schema gave no usable type information.
    Unknown,
    /// A literal type such as `"draft"` or `42`.
    Literal(LiteralNode),
    /// `T[]`
    Array(Box<SchemaNode>),
    /// `Record<string, V>`
    Record(Box<SchemaNode>),
    /// `A | B | ...`
    Union(Vec<SchemaNode>),
    /// An object with a fixed field list.
    Object(Vec<FieldNode>),
}

/// A literal value usable as a TypeScript literal type.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralNode {
    String(String),
    Int(i64),
    Number(f64),
    Bool(bool),
}

/// One field of an object node.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldNode {
    pub name: String,
    pub node: SchemaNode,
    pub optional: bool,
}

impl SchemaNode {
    /// Whether this node renders inline without a hoisted declaration.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            Self::String { .. }
                | Self::Number
                | Self::Boolean
                | Self::Null
                | Self::Unknown
                | Self::Literal(_)
        )
    }
}
