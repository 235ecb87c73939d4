use serde_json::Value;

use crate::models::{BlockMeta, ContentBlock};
use crate::wire::WireBlock;

/// Parse a JSON literal into wire blocks
pub fn wire_blocks(value: Value) -> Vec<WireBlock> {
    serde_json::from_value(value).unwrap()
}

/// Blocks reduced to (type, content, meta), ignoring ids
pub fn block_shapes(blocks: &[ContentBlock]) -> Vec<(String, String, BlockMeta)> {
    blocks
        .iter()
        .map(|block| {
            (
                block.type_name().to_string(),
                block.content.clone(),
                block.meta.clone(),
            )
        })
        .collect()
}
