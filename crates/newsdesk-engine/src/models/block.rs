use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlockParseError {
    #[error("Unknown block type: {0}")]
    UnknownType(String),
    #[error("Invalid heading size: {0} (expected h1, h2 or h3)")]
    InvalidHeadingSize(String),
}

/// Process-local block identifier.
///
/// Only used to address blocks inside one editor. It is stripped before the
/// document is sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(String);

impl BlockId {
    /// Mint a fresh random id
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for BlockId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for BlockId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// The closed set of block variants an editor can create
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockType {
    Heading,
    Paragraph,
    List,
    Image,
}

impl BlockType {
    pub const ALL: [BlockType; 4] = [
        BlockType::Heading,
        BlockType::Paragraph,
        BlockType::List,
        BlockType::Image,
    ];

    /// Name used for the `type` field on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Heading => "heading",
            BlockType::Paragraph => "paragraph",
            BlockType::List => "list",
            BlockType::Image => "image",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockType {
    type Err = BlockParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "heading" => Ok(BlockType::Heading),
            "paragraph" => Ok(BlockType::Paragraph),
            "list" => Ok(BlockType::List),
            "image" => Ok(BlockType::Image),
            other => Err(BlockParseError::UnknownType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingSize {
    H1,
    #[default]
    H2,
    H3,
}

impl HeadingSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            HeadingSize::H1 => "h1",
            HeadingSize::H2 => "h2",
            HeadingSize::H3 => "h3",
        }
    }

    /// Parse a size, falling back to the default for anything unrecognised
    pub fn parse_or_default(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }

    /// Next size in h1 -> h2 -> h3 -> h1 order
    pub fn cycle(self) -> Self {
        match self {
            HeadingSize::H1 => HeadingSize::H2,
            HeadingSize::H2 => HeadingSize::H3,
            HeadingSize::H3 => HeadingSize::H1,
        }
    }
}

impl fmt::Display for HeadingSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HeadingSize {
    type Err = BlockParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "h1" => Ok(HeadingSize::H1),
            "h2" => Ok(HeadingSize::H2),
            "h3" => Ok(HeadingSize::H3),
            other => Err(BlockParseError::InvalidHeadingSize(other.to_string())),
        }
    }
}

/// Variant-specific metadata. The variant also decides the block's type.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockMeta {
    Heading {
        size: HeadingSize,
    },
    Paragraph,
    List {
        items: Vec<String>,
    },
    Image {
        caption: Option<String>,
    },
    /// A block whose `type` this editor does not know. Kept verbatim so a
    /// load/save cycle does not lose it.
    Unknown {
        type_name: String,
        meta: Option<Value>,
    },
}

impl BlockMeta {
    /// Metadata a freshly created block of `kind` starts with
    pub fn default_for(kind: BlockType) -> Self {
        match kind {
            BlockType::Heading => BlockMeta::Heading {
                size: HeadingSize::default(),
            },
            BlockType::Paragraph => BlockMeta::Paragraph,
            BlockType::List => BlockMeta::List {
                items: vec![String::new()],
            },
            BlockType::Image => BlockMeta::Image { caption: None },
        }
    }

    /// `None` for unknown blocks
    pub fn block_type(&self) -> Option<BlockType> {
        match self {
            BlockMeta::Heading { .. } => Some(BlockType::Heading),
            BlockMeta::Paragraph => Some(BlockType::Paragraph),
            BlockMeta::List { .. } => Some(BlockType::List),
            BlockMeta::Image { .. } => Some(BlockType::Image),
            BlockMeta::Unknown { .. } => None,
        }
    }

    pub fn type_name(&self) -> &str {
        match self {
            BlockMeta::Unknown { type_name, .. } => type_name,
            known => known
                .block_type()
                .map(|kind| kind.as_str())
                .unwrap_or_default(),
        }
    }
}

/// One addressable unit of document content
#[derive(Debug, Clone, PartialEq)]
pub struct ContentBlock {
    pub id: BlockId,
    pub content: String,
    pub meta: BlockMeta,
}

impl ContentBlock {
    /// Create an empty block of `kind` with a fresh id and default metadata
    pub fn new(kind: BlockType) -> Self {
        Self::with_id(BlockId::generate(), kind)
    }

    pub fn with_id(id: BlockId, kind: BlockType) -> Self {
        Self {
            id,
            content: String::new(),
            meta: BlockMeta::default_for(kind),
        }
    }

    pub fn block_type(&self) -> Option<BlockType> {
        self.meta.block_type()
    }

    pub fn type_name(&self) -> &str {
        self.meta.type_name()
    }

    pub fn heading_size(&self) -> Option<HeadingSize> {
        match &self.meta {
            BlockMeta::Heading { size } => Some(*size),
            _ => None,
        }
    }

    pub fn list_items(&self) -> Option<&[String]> {
        match &self.meta {
            BlockMeta::List { items } => Some(items),
            _ => None,
        }
    }

    pub fn caption(&self) -> Option<&str> {
        match &self.meta {
            BlockMeta::Image { caption } => caption.as_deref(),
            _ => None,
        }
    }
}
