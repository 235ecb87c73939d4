//! Conversion between the in-memory block list and the JSON array the
//! backend stores as a document's `content` field.
//!
//! On the way out every block loses its local id. On the way in each element
//! gets an id back: the server's own per-element id when it has one that is
//! not already taken in this document, otherwise a freshly minted one.

pub mod payload;

use log::debug;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value, json};
use std::collections::HashSet;

use crate::models::{BlockId, BlockMeta, BlockType, ContentBlock, HeadingSize};

pub use payload::{DocumentPayload, DocumentSummary, RemoteDocument};

#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("Invalid document content: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Document content must be an array of blocks, found {found}")]
    NotAnArray { found: &'static str },
}

/// A block as sent to and received from the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireBlock {
    /// Server-assigned element ids. Read on load, never written.
    #[serde(rename = "_id", default, skip_serializing, deserialize_with = "lenient_id")]
    pub object_id: Option<String>,
    #[serde(default, skip_serializing, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

impl WireBlock {
    pub fn new(kind: impl Into<String>, content: impl Into<String>, meta: Option<Value>) -> Self {
        Self {
            object_id: None,
            id: None,
            kind: kind.into(),
            content: content.into(),
            meta,
        }
    }

    pub fn server_id(&self) -> Option<&str> {
        self.object_id.as_deref().or(self.id.as_deref())
    }
}

fn nullable_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// Ids show up as strings from document stores and as numbers from SQL backends
pub(crate) fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Serialize blocks for the backend, dropping local ids and keeping order
pub fn to_wire_format(blocks: &[ContentBlock]) -> Vec<WireBlock> {
    blocks
        .iter()
        .map(|block| {
            WireBlock::new(
                block.type_name(),
                block.content.clone(),
                meta_to_wire(&block.meta),
            )
        })
        .collect()
}

/// Rebuild blocks from the backend array, attaching a unique id to each
pub fn from_wire_format(raw: Vec<WireBlock>) -> Vec<ContentBlock> {
    let mut seen: HashSet<String> = HashSet::with_capacity(raw.len());

    raw.into_iter()
        .map(|wire| {
            let id = match wire.server_id() {
                Some(server_id) if !seen.contains(server_id) => BlockId::from(server_id),
                Some(server_id) => {
                    debug!("duplicate block id {server_id} in document, minting a new one");
                    BlockId::generate()
                }
                None => BlockId::generate(),
            };
            seen.insert(id.as_str().to_string());

            ContentBlock {
                id,
                content: wire.content,
                meta: meta_from_wire(&wire.kind, wire.meta),
            }
        })
        .collect()
}

/// Parse the backend's `content` value. A JSON string holding the array is
/// accepted as well, since some stores keep the field as text.
pub fn parse_content_value(value: Value) -> Result<Vec<WireBlock>, WireError> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(_) => Ok(serde_json::from_value(value)?),
        Value::String(text) if text.trim().is_empty() => Ok(Vec::new()),
        Value::String(text) => parse_content_value(serde_json::from_str(&text)?),
        Value::Bool(_) => Err(WireError::NotAnArray { found: "a boolean" }),
        Value::Number(_) => Err(WireError::NotAnArray { found: "a number" }),
        Value::Object(_) => Err(WireError::NotAnArray { found: "an object" }),
    }
}

pub fn parse_content_json(text: &str) -> Result<Vec<ContentBlock>, WireError> {
    let value: Value = serde_json::from_str(text)?;
    Ok(from_wire_format(parse_content_value(value)?))
}

pub fn render_content_json(blocks: &[ContentBlock]) -> Result<String, WireError> {
    Ok(serde_json::to_string(&to_wire_format(blocks))?)
}

pub fn meta_to_wire(meta: &BlockMeta) -> Option<Value> {
    match meta {
        BlockMeta::Heading { size } => Some(json!({ "size": size.as_str() })),
        BlockMeta::Paragraph => None,
        BlockMeta::List { items } => Some(json!({ "items": items })),
        BlockMeta::Image { caption } => caption.as_ref().map(|c| json!({ "caption": c })),
        BlockMeta::Unknown { meta, .. } => meta.clone(),
    }
}

pub fn meta_from_wire(kind: &str, meta: Option<Value>) -> BlockMeta {
    let Ok(block_type) = kind.parse::<BlockType>() else {
        debug!("passing through block of unknown type {kind:?}");
        return BlockMeta::Unknown {
            type_name: kind.to_string(),
            meta,
        };
    };

    let fields = match meta {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };

    match block_type {
        BlockType::Heading => BlockMeta::Heading {
            size: fields
                .get("size")
                .and_then(Value::as_str)
                .map(HeadingSize::parse_or_default)
                .unwrap_or_default(),
        },
        BlockType::Paragraph => BlockMeta::Paragraph,
        BlockType::List => BlockMeta::List {
            items: fields.get("items").map(list_items).unwrap_or_default(),
        },
        BlockType::Image => BlockMeta::Image {
            caption: fields
                .get("caption")
                .and_then(Value::as_str)
                .map(str::to_string),
        },
    }
}

/// Items of a list block. Non-string entries are kept as their JSON text.
pub(crate) fn list_items(value: &Value) -> Vec<String> {
    match value {
        Value::Array(values) => values
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        _ => Vec::new(),
    }
}
