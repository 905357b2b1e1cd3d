//! Schema-to-TypeScript pipeline: translate, then render.

pub mod node;
pub mod render;
pub mod translate;

pub use node::{FieldNode, LiteralNode, SchemaNode};
pub use render::render_type_source;
pub use translate::to_intermediate;

use crate::definition::Schema;
use crate::error::CodegenError;

/// Produce TypeScript declaration source for one schema.
///
/// Async so callers can fan out independent sections concurrently; the
/// work itself is pure.
pub async fn type_source(
    schema: &Schema,
    type_name: &str,
    location: &str,
    doc: &[String],
) -> Result<String, CodegenError> {
    let node = to_intermediate(schema, location)?;
    Ok(render_type_source(&node, type_name, doc))
}
