use crossterm::event::KeyCode;
use log::{info, warn};
use newsdesk_client::{
    ApiClient, EncodedImage, save_document, upload_block_image, upload_cover_image,
};
use newsdesk_engine::editing::{Cmd, Direction, DocumentEditor, MetaPatch, SaveState};
use newsdesk_engine::models::{BlockId, BlockType, ContentBlock, HeadingSize};
use ratatui::widgets::ListState;
use std::path::Path;
use tokio::runtime::Runtime;

/// What the text in the input line will be written to
#[derive(Debug, Clone, PartialEq)]
pub enum InputTarget {
    Content(BlockId),
    ListItem(BlockId, usize),
    Caption(BlockId),
    Title,
    Excerpt,
    /// Image file for an existing image block, or a new one when `None`
    ImagePath(Option<BlockId>),
    CoverPath,
}

impl InputTarget {
    pub fn label(&self) -> &'static str {
        match self {
            InputTarget::Content(_) => "Content",
            InputTarget::ListItem(..) => "List item",
            InputTarget::Caption(_) => "Caption",
            InputTarget::Title => "Title",
            InputTarget::Excerpt => "Excerpt",
            InputTarget::ImagePath(_) => "Image file",
            InputTarget::CoverPath => "Cover image file",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Input {
    pub target: InputTarget,
    pub buffer: String,
}

pub struct App {
    pub editor: DocumentEditor,
    api: ApiClient,
    runtime: Runtime,
    upload_folder: String,
    pub block_state: ListState,
    pub item_cursor: usize,
    pub input: Option<Input>,
    pub status: String,
}

impl App {
    pub fn new(
        editor: DocumentEditor,
        api: ApiClient,
        runtime: Runtime,
        upload_folder: String,
    ) -> Self {
        let mut app = Self {
            editor,
            api,
            runtime,
            upload_folder,
            block_state: ListState::default(),
            item_cursor: 0,
            input: None,
            status: String::new(),
        };

        if !app.editor.blocks().is_empty() {
            app.block_state.select(Some(0));
        }
        app
    }

    pub fn selected_block(&self) -> Option<&ContentBlock> {
        let index = self.block_state.selected()?;
        self.editor.blocks().blocks().get(index)
    }

    fn selected_id(&self) -> Option<BlockId> {
        self.selected_block().map(|block| block.id.clone())
    }

    fn select(&mut self, index: Option<usize>) {
        self.block_state.select(index);
        self.item_cursor = 0;
    }

    fn select_id(&mut self, id: &BlockId) {
        let index = self.editor.blocks().position(id);
        self.select(index);
    }

    fn next_block(&mut self) {
        let len = self.editor.blocks().len();
        if len == 0 {
            return;
        }
        let i = match self.block_state.selected() {
            Some(i) => (i + 1) % len,
            None => 0,
        };
        self.select(Some(i));
    }

    fn previous_block(&mut self) {
        let len = self.editor.blocks().len();
        if len == 0 {
            return;
        }
        let i = match self.block_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.select(Some(i));
    }

    /// Handle one key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.input.is_some() {
            self.handle_input_key(code);
            return false;
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Down | KeyCode::Char('j') => self.next_block(),
            KeyCode::Up | KeyCode::Char('k') => self.previous_block(),
            KeyCode::Char('h') => self.append(BlockType::Heading),
            KeyCode::Char('p') => self.append(BlockType::Paragraph),
            KeyCode::Char('l') => self.append(BlockType::List),
            KeyCode::Char('i') => self.append(BlockType::Image),
            KeyCode::Enter => self.edit_selected(),
            KeyCode::Tab => self.cycle_heading_size(),
            KeyCode::Char('1') => self.set_heading_size(HeadingSize::H1),
            KeyCode::Char('2') => self.set_heading_size(HeadingSize::H2),
            KeyCode::Char('3') => self.set_heading_size(HeadingSize::H3),
            KeyCode::Char('a') => self.add_list_item(),
            KeyCode::Char('d') => self.remove_list_item(),
            KeyCode::Char('[') => self.move_item_cursor(false),
            KeyCode::Char(']') => self.move_item_cursor(true),
            KeyCode::Char('c') => self.edit_caption(),
            KeyCode::Char('u') => self.start_image_upload(),
            KeyCode::Char('C') => self.start_input(InputTarget::CoverPath, String::new()),
            KeyCode::Char('t') => {
                let title = self.editor.fields().title.clone();
                self.start_input(InputTarget::Title, title);
            }
            KeyCode::Char('x') => {
                let excerpt = self.editor.fields().excerpt.clone().unwrap_or_default();
                self.start_input(InputTarget::Excerpt, excerpt);
            }
            KeyCode::Char('K') => self.move_selected(Direction::Up),
            KeyCode::Char('J') => self.move_selected(Direction::Down),
            KeyCode::Delete | KeyCode::Char('X') => self.remove_selected(),
            KeyCode::Char('P') => {
                let status = self.editor.fields().status.clone().toggle();
                self.status = format!("Status set to {status}");
                self.editor.set_status(status);
            }
            KeyCode::Char('s') => self.save(),
            _ => {}
        }
        false
    }

    fn handle_input_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.input = None;
                self.status = "Edit cancelled".to_string();
            }
            KeyCode::Enter => {
                if let Some(input) = self.input.take() {
                    self.commit_input(input);
                }
            }
            KeyCode::Backspace => {
                if let Some(input) = self.input.as_mut() {
                    input.buffer.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(input) = self.input.as_mut() {
                    input.buffer.push(c);
                }
            }
            _ => {}
        }
    }

    fn start_input(&mut self, target: InputTarget, buffer: String) {
        self.input = Some(Input { target, buffer });
    }

    fn commit_input(&mut self, input: Input) {
        let text = input.buffer;
        match input.target {
            InputTarget::Content(id) => {
                self.editor.apply(Cmd::UpdateContent { id, content: text });
            }
            InputTarget::ListItem(id, index) => {
                self.editor.apply(Cmd::UpdateListItem { id, index, text });
            }
            InputTarget::Caption(id) => {
                let caption = (!text.is_empty()).then_some(text);
                self.editor.apply(Cmd::UpdateMeta {
                    id,
                    patch: MetaPatch::ImageCaption(caption),
                });
            }
            InputTarget::Title => {
                self.editor.set_title(text);
            }
            InputTarget::Excerpt => {
                self.editor.set_excerpt((!text.is_empty()).then_some(text));
            }
            InputTarget::ImagePath(block) => self.upload_image(block, &text),
            InputTarget::CoverPath => self.upload_cover(&text),
        }
    }

    fn append(&mut self, kind: BlockType) {
        if let Some(id) = self.editor.apply(Cmd::Append { kind }).block {
            self.select_id(&id);
            self.status = format!("Added {kind} block");
        }
    }

    fn edit_selected(&mut self) {
        let Some(block) = self.selected_block() else {
            return;
        };
        let id = block.id.clone();

        let input = match block.list_items() {
            Some(items) => items.get(self.item_cursor).map(|item| {
                (
                    InputTarget::ListItem(id.clone(), self.item_cursor),
                    item.clone(),
                )
            }),
            None => Some((InputTarget::Content(id), block.content.clone())),
        };

        if let Some((target, buffer)) = input {
            self.start_input(target, buffer);
        }
    }

    fn edit_caption(&mut self) {
        let Some(block) = self.selected_block() else {
            return;
        };
        if block.block_type() != Some(BlockType::Image) {
            self.status = "Captions only apply to image blocks".to_string();
            return;
        }
        let target = InputTarget::Caption(block.id.clone());
        let caption = block.caption().unwrap_or_default().to_string();
        self.start_input(target, caption);
    }

    fn cycle_heading_size(&mut self) {
        if let Some(size) = self.selected_block().and_then(ContentBlock::heading_size) {
            self.set_heading_size(size.cycle());
        }
    }

    fn set_heading_size(&mut self, size: HeadingSize) {
        if let Some(id) = self.selected_id() {
            let patch = self.editor.apply(Cmd::UpdateMeta {
                id,
                patch: MetaPatch::HeadingSize(size),
            });
            if patch.changed {
                self.status = format!("Heading size {size}");
            }
        }
    }

    fn add_list_item(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        if self.editor.apply(Cmd::AddListItem { id }).changed
            && let Some(items) = self.selected_block().and_then(ContentBlock::list_items)
        {
            self.item_cursor = items.len().saturating_sub(1);
        }
    }

    fn remove_list_item(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        let index = self.item_cursor;
        if self.editor.apply(Cmd::RemoveListItem { id, index }).changed {
            self.item_cursor = self.item_cursor.saturating_sub(1);
        }
    }

    fn move_item_cursor(&mut self, forward: bool) {
        let Some(len) = self
            .selected_block()
            .and_then(ContentBlock::list_items)
            .map(<[String]>::len)
        else {
            return;
        };
        if forward {
            self.item_cursor = (self.item_cursor + 1).min(len.saturating_sub(1));
        } else {
            self.item_cursor = self.item_cursor.saturating_sub(1);
        }
    }

    fn move_selected(&mut self, direction: Direction) {
        if let Some(id) = self.selected_id() {
            self.editor.apply(Cmd::Move {
                id: id.clone(),
                direction,
            });
            let index = self.editor.blocks().position(&id);
            self.block_state.select(index);
        }
    }

    fn remove_selected(&mut self) {
        let Some(index) = self.block_state.selected() else {
            return;
        };
        let Some(id) = self.selected_id() else {
            return;
        };
        self.editor.apply(Cmd::Remove { id });

        let len = self.editor.blocks().len();
        let next = if len == 0 {
            None
        } else {
            Some(index.min(len - 1))
        };
        self.select(next);
    }

    fn start_image_upload(&mut self) {
        let target = self
            .selected_block()
            .filter(|block| block.block_type() == Some(BlockType::Image))
            .map(|block| block.id.clone());
        self.start_input(InputTarget::ImagePath(target), String::new());
    }

    fn read_image(&mut self, path: &str) -> Option<EncodedImage> {
        match EncodedImage::from_path(Path::new(path)) {
            Ok(image) => Some(image),
            Err(err) => {
                warn!("could not read image {path}: {err}");
                self.status = format!("Could not read {path}: {err}");
                None
            }
        }
    }

    fn upload_image(&mut self, block: Option<BlockId>, path: &str) {
        let Some(image) = self.read_image(path) else {
            return;
        };
        self.status = "Uploading...".to_string();

        let result = self.runtime.block_on(upload_block_image(
            &self.api,
            &mut self.editor,
            block,
            &image,
            &self.upload_folder,
        ));
        match result {
            Ok(id) => {
                self.select_id(&id);
                self.status = "Image uploaded".to_string();
            }
            Err(err) => self.status = err.user_message(),
        }
    }

    fn upload_cover(&mut self, path: &str) {
        let Some(image) = self.read_image(path) else {
            return;
        };
        self.status = "Uploading...".to_string();

        let result = self.runtime.block_on(upload_cover_image(
            &self.api,
            &mut self.editor,
            &image,
            &self.upload_folder,
        ));
        self.status = match result {
            Ok(_) => "Cover image uploaded".to_string(),
            Err(err) => err.user_message(),
        };
    }

    fn save(&mut self) {
        if self.editor.is_saving() {
            self.status = "A save is already in progress".to_string();
            return;
        }
        self.status = "Saving...".to_string();

        let result = self
            .runtime
            .block_on(save_document(&self.api, &mut self.editor));
        match result {
            Ok(()) => {
                info!(
                    "saved {} {}",
                    self.editor.kind().resource(),
                    self.editor.remote_id().unwrap_or_default()
                );
                self.status = "Saved".to_string();
            }
            Err(err) => self.status = err.user_message(),
        }
    }

    pub fn state_label(&self) -> &'static str {
        if self.editor.is_saving() {
            return "Saving";
        }
        match self.editor.state() {
            SaveState::Draft => "Unsaved changes",
            SaveState::Persisted => "Saved",
        }
    }
}
