use crate::models::{BlockId, BlockType, HeadingSize};

/// Direction for moving a block within the list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Typed metadata update. Applied only to blocks of the matching variant.
#[derive(Debug, Clone, PartialEq)]
pub enum MetaPatch {
    HeadingSize(HeadingSize),
    ListItems(Vec<String>),
    ImageCaption(Option<String>),
}

/// Every mutation the block editor supports
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    Append {
        kind: BlockType,
    },
    UpdateContent {
        id: BlockId,
        content: String,
    },
    UpdateMeta {
        id: BlockId,
        patch: MetaPatch,
    },
    Remove {
        id: BlockId,
    },
    UpdateListItem {
        id: BlockId,
        index: usize,
        text: String,
    },
    AddListItem {
        id: BlockId,
    },
    RemoveListItem {
        id: BlockId,
        index: usize,
    },
    Move {
        id: BlockId,
        direction: Direction,
    },
}
