use log::{debug, info};

use crate::editing::{BlockListEditor, Cmd, Patch};
use crate::models::{ContentKind, DocumentFields, PublishStatus};
use crate::wire::{DocumentPayload, RemoteDocument, WireError};

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("{field} is required")]
    MissingField { field: &'static str },
    #[error("A save is already in progress")]
    SaveInProgress,
    #[error(transparent)]
    Wire(#[from] WireError),
}

/// Local save state. Independent of the backend's Draft/Published status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveState {
    /// Edits exist that the backend has not seen
    Draft,
    /// Matches the last successful save
    Persisted,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveTarget {
    Create,
    Update { id: String },
}

/// Everything needed to send one save to the backend
#[derive(Debug, Clone, PartialEq)]
pub struct SaveRequest {
    pub kind: ContentKind,
    pub target: SaveTarget,
    pub payload: DocumentPayload,
}

/// One document being edited: its fields, its blocks and its save state.
///
/// A new editor starts as a Draft; one loaded from the backend starts
/// Persisted. Any effective edit moves it back to Draft. Saving is two-phase:
/// [`begin_save`](Self::begin_save) validates and hands out the request,
/// then exactly one of [`complete_save`](Self::complete_save) or
/// [`abort_save`](Self::abort_save) is called once the backend answers.
#[derive(Debug, Clone)]
pub struct DocumentEditor {
    kind: ContentKind,
    remote_id: Option<String>,
    fields: DocumentFields,
    blocks: BlockListEditor,
    state: SaveState,
    revision: u64,
    in_flight: Option<u64>,
}

impl DocumentEditor {
    pub fn new(kind: ContentKind) -> Self {
        Self {
            kind,
            remote_id: None,
            fields: DocumentFields::default(),
            blocks: BlockListEditor::new(),
            state: SaveState::Draft,
            revision: 0,
            in_flight: None,
        }
    }

    /// Open a document fetched from the backend
    pub fn from_remote(
        kind: ContentKind,
        id: impl Into<String>,
        remote: &RemoteDocument,
    ) -> Result<Self, EditorError> {
        let id = id.into();
        let blocks = BlockListEditor::from_wire(remote.wire_blocks()?);
        info!("loaded {} {id} with {} blocks", kind.resource(), blocks.len());

        Ok(Self {
            kind,
            remote_id: Some(id),
            fields: remote.fields(),
            blocks,
            state: SaveState::Persisted,
            revision: 0,
            in_flight: None,
        })
    }

    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    pub fn remote_id(&self) -> Option<&str> {
        self.remote_id.as_deref()
    }

    pub fn fields(&self) -> &DocumentFields {
        &self.fields
    }

    pub fn blocks(&self) -> &BlockListEditor {
        &self.blocks
    }

    pub fn state(&self) -> SaveState {
        self.state
    }

    pub fn is_saving(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn apply(&mut self, cmd: Cmd) -> Patch {
        let patch = self.blocks.apply(cmd);
        if patch.changed {
            self.touch();
        }
        patch
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> bool {
        let title = title.into();
        self.update_field(|fields| replace(&mut fields.title, title))
    }

    pub fn set_excerpt(&mut self, excerpt: Option<String>) -> bool {
        self.update_field(|fields| replace(&mut fields.excerpt, excerpt))
    }

    pub fn set_cover_image(&mut self, url: Option<String>) -> bool {
        self.update_field(|fields| replace(&mut fields.cover_image, url))
    }

    pub fn set_status(&mut self, status: PublishStatus) -> bool {
        self.update_field(|fields| replace(&mut fields.status, status))
    }

    /// The body a save would send right now
    pub fn payload(&self) -> DocumentPayload {
        DocumentPayload {
            title: self.fields.title.clone(),
            excerpt: self.fields.excerpt.clone(),
            cover_image: self.fields.cover_image.clone(),
            content: self.blocks.to_wire(),
            status: self.fields.status.clone(),
        }
    }

    /// Check the fields the backend requires, without touching any state
    pub fn validate(&self) -> Result<(), EditorError> {
        if self.fields.title.trim().is_empty() {
            return Err(EditorError::MissingField { field: "Title" });
        }
        let excerpt_missing = self
            .fields
            .excerpt
            .as_deref()
            .is_none_or(|excerpt| excerpt.trim().is_empty());
        if self.kind.requires_excerpt() && excerpt_missing {
            return Err(EditorError::MissingField { field: "Excerpt" });
        }
        Ok(())
    }

    /// Validate and mark a save as in flight
    pub fn begin_save(&mut self) -> Result<SaveRequest, EditorError> {
        if self.in_flight.is_some() {
            return Err(EditorError::SaveInProgress);
        }
        self.validate()?;

        self.in_flight = Some(self.revision);
        let target = match &self.remote_id {
            Some(id) => SaveTarget::Update { id: id.clone() },
            None => SaveTarget::Create,
        };
        debug!("saving {} as {target:?}", self.kind.resource());

        Ok(SaveRequest {
            kind: self.kind,
            target,
            payload: self.payload(),
        })
    }

    /// Record a successful save. `remote_id` is the id the backend assigned
    /// on create; it is ignored once the document already has one.
    pub fn complete_save(&mut self, remote_id: Option<String>) {
        let Some(saved_revision) = self.in_flight.take() else {
            return;
        };
        if self.remote_id.is_none() {
            self.remote_id = remote_id;
        }
        // Edits made while the request was in flight are still unsaved
        if saved_revision == self.revision {
            self.state = SaveState::Persisted;
        }
    }

    /// Forget an in-flight save that failed. Local edits are kept.
    pub fn abort_save(&mut self) {
        self.in_flight = None;
    }

    fn update_field(&mut self, update: impl FnOnce(&mut DocumentFields) -> bool) -> bool {
        let changed = update(&mut self.fields);
        if changed {
            self.touch();
        }
        changed
    }

    fn touch(&mut self) {
        self.revision += 1;
        self.state = SaveState::Draft;
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BlockType;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn news_ready_to_save() -> DocumentEditor {
        let mut editor = DocumentEditor::new(ContentKind::News);
        editor.set_title("Town hall");
        editor.set_excerpt(Some("Join us on Friday".to_string()));
        editor
    }

    fn remote(value: serde_json::Value) -> RemoteDocument {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_new_editor_is_draft() {
        let editor = DocumentEditor::new(ContentKind::Page);
        assert_eq!(editor.state(), SaveState::Draft);
        assert!(editor.blocks().is_empty());
        assert!(!editor.is_saving());
    }

    #[test]
    fn test_news_requires_title_and_excerpt() {
        let mut editor = DocumentEditor::new(ContentKind::News);
        let err = editor.begin_save().unwrap_err();
        assert_eq!(err.to_string(), "Title is required");

        editor.set_title("Town hall");
        editor.set_excerpt(Some("   ".to_string()));
        let err = editor.begin_save().unwrap_err();
        assert_eq!(err.to_string(), "Excerpt is required");
        assert!(!editor.is_saving());
    }

    #[test]
    fn test_pages_only_require_title() {
        let mut editor = DocumentEditor::new(ContentKind::Page);
        editor.set_title("About");

        let request = editor.begin_save().unwrap();
        assert_eq!(request.target, SaveTarget::Create);
        assert_eq!(request.payload.excerpt, None);
    }

    #[test]
    fn test_second_save_is_refused_while_in_flight() {
        let mut editor = news_ready_to_save();
        editor.begin_save().unwrap();

        assert!(matches!(
            editor.begin_save(),
            Err(EditorError::SaveInProgress)
        ));
    }

    #[test]
    fn test_complete_save_persists_and_records_id() {
        let mut editor = news_ready_to_save();
        editor.begin_save().unwrap();
        editor.complete_save(Some("n42".to_string()));

        assert_eq!(editor.state(), SaveState::Persisted);
        assert_eq!(editor.remote_id(), Some("n42"));
        assert!(!editor.is_saving());

        let request = editor.begin_save().unwrap();
        assert_eq!(
            request.target,
            SaveTarget::Update {
                id: "n42".to_string()
            }
        );
    }

    #[test]
    fn test_abort_save_keeps_draft_and_allows_retry() {
        let mut editor = news_ready_to_save();
        editor.begin_save().unwrap();
        editor.abort_save();

        assert_eq!(editor.state(), SaveState::Draft);
        assert!(editor.begin_save().is_ok());
    }

    #[test]
    fn test_edit_during_save_stays_draft() {
        let mut editor = news_ready_to_save();
        editor.begin_save().unwrap();
        editor.apply(Cmd::Append {
            kind: BlockType::Paragraph,
        });
        editor.complete_save(Some("n1".to_string()));

        assert_eq!(editor.state(), SaveState::Draft);
    }

    #[test]
    fn test_loaded_document_is_persisted_until_edited() {
        let doc = remote(json!({
            "title": "Volunteer guide",
            "content": [{ "type": "paragraph", "content": "Hello" }],
            "status": "Published"
        }));
        let mut editor = DocumentEditor::from_remote(ContentKind::Page, "p1", &doc).unwrap();
        assert_eq!(editor.state(), SaveState::Persisted);

        // Setting a field to its current value is not an edit
        assert!(!editor.set_title("Volunteer guide"));
        assert_eq!(editor.state(), SaveState::Persisted);

        let id = editor.blocks().blocks()[0].id.clone();
        editor.apply(Cmd::UpdateContent {
            id,
            content: "Hello, volunteers".to_string(),
        });
        assert_eq!(editor.state(), SaveState::Draft);
    }

    #[test]
    fn test_missing_block_edit_does_not_dirty() {
        let doc = remote(json!({ "title": "Guide", "content": [] }));
        let mut editor = DocumentEditor::from_remote(ContentKind::Page, "p1", &doc).unwrap();

        editor.apply(Cmd::Remove {
            id: "nope".into(),
        });

        assert_eq!(editor.state(), SaveState::Persisted);
    }

    #[test]
    fn test_payload_carries_fields_and_blocks() {
        let doc = remote(json!({
            "title": "Manifesto",
            "excerpt": "Our plan",
            "coverImage": "https://cdn.example/m.png",
            "content": [{ "_id": "b1", "type": "heading", "content": "Jobs", "meta": { "size": "h1" } }],
            "status": "Draft"
        }));
        let editor = DocumentEditor::from_remote(ContentKind::News, "n9", &doc).unwrap();

        assert_eq!(
            serde_json::to_value(editor.payload()).unwrap(),
            json!({
                "title": "Manifesto",
                "excerpt": "Our plan",
                "coverImage": "https://cdn.example/m.png",
                "content": [{ "type": "heading", "content": "Jobs", "meta": { "size": "h1" } }],
                "status": "Draft"
            })
        );
    }

    #[test]
    fn test_malformed_content_fails_to_open() {
        let doc = remote(json!({ "title": "Broken", "content": 12 }));
        let err = DocumentEditor::from_remote(ContentKind::Page, "p2", &doc).unwrap_err();

        assert!(matches!(err, EditorError::Wire(WireError::NotAnArray { .. })));
    }
}
