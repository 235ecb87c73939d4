pub mod block;
pub mod document;

pub use block::{BlockId, BlockMeta, BlockParseError, BlockType, ContentBlock, HeadingSize};
pub use document::{ContentKind, DocumentFields, PublishStatus};
