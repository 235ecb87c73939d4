use log::debug;
use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::editing::{Cmd, Direction, MetaPatch, Patch};
use crate::models::{BlockId, BlockMeta, BlockType, ContentBlock, HeadingSize};
use crate::wire::{self, WireBlock};

/// Ordered list of content blocks addressed by id.
///
/// List order is display order. Mutations that address a missing block (or
/// a list item index out of range) leave the list untouched and report
/// `false`; the version only moves when something actually changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockListEditor {
    blocks: Vec<ContentBlock>,
    version: u64,
}

impl BlockListEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from existing blocks, re-minting any id that repeats
    pub fn from_blocks(blocks: Vec<ContentBlock>) -> Self {
        let mut seen = HashSet::with_capacity(blocks.len());
        let blocks = blocks
            .into_iter()
            .map(|mut block| {
                if !seen.insert(block.id.clone()) {
                    debug!("re-minting repeated block id {}", block.id);
                    block.id = BlockId::generate();
                    seen.insert(block.id.clone());
                }
                block
            })
            .collect();

        Self { blocks, version: 0 }
    }

    pub fn from_wire(raw: Vec<WireBlock>) -> Self {
        Self::from_blocks(wire::from_wire_format(raw))
    }

    pub fn to_wire(&self) -> Vec<WireBlock> {
        wire::to_wire_format(&self.blocks)
    }

    pub fn blocks(&self) -> &[ContentBlock] {
        &self.blocks
    }

    pub fn into_blocks(self) -> Vec<ContentBlock> {
        self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn get(&self, id: &BlockId) -> Option<&ContentBlock> {
        self.blocks.iter().find(|block| &block.id == id)
    }

    pub fn position(&self, id: &BlockId) -> Option<usize> {
        self.blocks.iter().position(|block| &block.id == id)
    }

    /// Apply a command, returning what changed
    pub fn apply(&mut self, cmd: Cmd) -> Patch {
        let (changed, block) = match cmd {
            Cmd::Append { kind } => (true, Some(self.append(kind))),
            Cmd::UpdateContent { id, content } => (self.update_content(&id, content), Some(id)),
            Cmd::UpdateMeta { id, patch } => (self.update_meta(&id, patch), Some(id)),
            Cmd::Remove { id } => (self.remove(&id), Some(id)),
            Cmd::UpdateListItem { id, index, text } => {
                (self.update_list_item(&id, index, text), Some(id))
            }
            Cmd::AddListItem { id } => (self.add_list_item(&id), Some(id)),
            Cmd::RemoveListItem { id, index } => (self.remove_list_item(&id, index), Some(id)),
            Cmd::Move { id, direction } => (self.move_block(&id, direction), Some(id)),
        };

        Patch {
            changed,
            block: block.filter(|_| changed),
            version: self.version,
        }
    }

    /// Create a block of `kind` at the end of the list
    pub fn append(&mut self, kind: BlockType) -> BlockId {
        let block = ContentBlock::new(kind);
        let id = block.id.clone();
        self.blocks.push(block);
        self.bump();
        id
    }

    pub fn update_content(&mut self, id: &BlockId, content: impl Into<String>) -> bool {
        let content = content.into();
        let Some(block) = self.find_mut(id) else {
            return false;
        };
        if block.content == content {
            return false;
        }
        block.content = content;
        self.bump();
        true
    }

    /// Apply a typed metadata patch. A patch for another variant is ignored.
    pub fn update_meta(&mut self, id: &BlockId, patch: MetaPatch) -> bool {
        let Some(block) = self.find_mut(id) else {
            return false;
        };

        let changed = match (&mut block.meta, patch) {
            (BlockMeta::Heading { size }, MetaPatch::HeadingSize(new_size)) => {
                replace(size, new_size)
            }
            (BlockMeta::List { items }, MetaPatch::ListItems(new_items)) => {
                replace(items, new_items)
            }
            (BlockMeta::Image { caption }, MetaPatch::ImageCaption(new_caption)) => {
                replace(caption, new_caption)
            }
            (meta, patch) => {
                debug!(
                    "ignoring {patch:?} for {} block {id}",
                    meta.type_name()
                );
                false
            }
        };

        if changed {
            self.bump();
        }
        changed
    }

    pub fn set_heading_size(&mut self, id: &BlockId, size: HeadingSize) -> bool {
        self.update_meta(id, MetaPatch::HeadingSize(size))
    }

    pub fn set_list_items(&mut self, id: &BlockId, items: Vec<String>) -> bool {
        self.update_meta(id, MetaPatch::ListItems(items))
    }

    pub fn set_image_caption(&mut self, id: &BlockId, caption: Option<String>) -> bool {
        self.update_meta(id, MetaPatch::ImageCaption(caption))
    }

    /// Shallow-merge untyped metadata into a block.
    ///
    /// Keys the block's variant understands are applied when their values are
    /// valid; a heading size outside h1..h3 is dropped. Blocks of unknown type
    /// take every key verbatim.
    pub fn merge_meta_json(&mut self, id: &BlockId, partial: &Map<String, Value>) -> bool {
        let Some(block) = self.find_mut(id) else {
            return false;
        };

        let mut changed = false;
        match &mut block.meta {
            BlockMeta::Heading { size } => {
                if let Some(value) = partial.get("size") {
                    match value.as_str().map(str::parse::<HeadingSize>) {
                        Some(Ok(new_size)) => changed |= replace(size, new_size),
                        _ => debug!("ignoring invalid heading size {value} for block {id}"),
                    }
                }
            }
            BlockMeta::List { items } => {
                if let Some(value) = partial.get("items").filter(|value| value.is_array()) {
                    changed |= replace(items, wire::list_items(value));
                }
            }
            BlockMeta::Image { caption } => match partial.get("caption") {
                Some(Value::String(text)) => changed |= replace(caption, Some(text.clone())),
                Some(Value::Null) => changed |= replace(caption, None),
                _ => {}
            },
            BlockMeta::Paragraph => {}
            BlockMeta::Unknown { meta, .. } => {
                if !partial.is_empty() {
                    let mut merged = match meta.take() {
                        Some(Value::Object(map)) => map,
                        _ => Map::new(),
                    };
                    for (key, value) in partial {
                        changed |= merged.get(key) != Some(value);
                        merged.insert(key.clone(), value.clone());
                    }
                    *meta = Some(Value::Object(merged));
                }
            }
        }

        if changed {
            self.bump();
        }
        changed
    }

    pub fn remove(&mut self, id: &BlockId) -> bool {
        let before = self.blocks.len();
        self.blocks.retain(|block| &block.id != id);
        let changed = self.blocks.len() != before;
        if changed {
            self.bump();
        }
        changed
    }

    /// Replace one item of a list block. Out-of-range indices are ignored.
    pub fn update_list_item(&mut self, id: &BlockId, index: usize, text: impl Into<String>) -> bool {
        let text = text.into();
        let changed = match self.list_items_mut(id).and_then(|items| items.get_mut(index)) {
            Some(item) => replace(item, text),
            None => {
                debug!("no list item {index} in block {id}");
                false
            }
        };
        if changed {
            self.bump();
        }
        changed
    }

    /// Append an empty item to a list block
    pub fn add_list_item(&mut self, id: &BlockId) -> bool {
        let Some(items) = self.list_items_mut(id) else {
            return false;
        };
        items.push(String::new());
        self.bump();
        true
    }

    /// Remove one item of a list block. Out-of-range indices are ignored.
    pub fn remove_list_item(&mut self, id: &BlockId, index: usize) -> bool {
        let Some(items) = self.list_items_mut(id) else {
            return false;
        };
        if index >= items.len() {
            debug!("no list item {index} in block {id}");
            return false;
        }
        items.remove(index);
        self.bump();
        true
    }

    /// Swap a block with its neighbour. No-op at either end of the list.
    pub fn move_block(&mut self, id: &BlockId, direction: Direction) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        let target = match direction {
            Direction::Up => index.checked_sub(1),
            Direction::Down => Some(index + 1).filter(|&i| i < self.blocks.len()),
        };
        let Some(target) = target else {
            return false;
        };
        self.blocks.swap(index, target);
        self.bump();
        true
    }

    fn find_mut(&mut self, id: &BlockId) -> Option<&mut ContentBlock> {
        let found = self.blocks.iter_mut().find(|block| &block.id == id);
        if found.is_none() {
            debug!("no block with id {id}");
        }
        found
    }

    fn list_items_mut(&mut self, id: &BlockId) -> Option<&mut Vec<String>> {
        match &mut self.find_mut(id)?.meta {
            BlockMeta::List { items } => Some(items),
            _ => None,
        }
    }

    fn bump(&mut self) {
        self.version += 1;
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
