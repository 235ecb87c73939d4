/*!
 * # Block Editing
 *
 * Editing works on an ordered `Vec` of [`ContentBlock`](crate::models::ContentBlock)s
 * owned by a single [`BlockListEditor`]. There is no rope or text buffer
 * underneath: each block is its own unit of content, and the list order is
 * the rendering order.
 *
 * ## Addressing
 *
 * - Blocks are addressed by their local [`BlockId`](crate::models::BlockId), never by
 *   position, so UI references stay valid when blocks are inserted or removed
 * - Items inside a list block are addressed by index
 * - Addressing something that does not exist is a no-op, not an error
 *
 * ## Commands
 *
 * Every mutation has a direct method (`append`, `update_content`, ...) and a
 * [`Cmd`] variant. `apply(cmd)` returns a [`Patch`] telling the caller
 * whether anything changed and what the editor version is now.
 *
 * ## Documents
 *
 * [`DocumentEditor`] wraps a block list together with the document fields
 * (title, excerpt, cover image, status) and the local Draft/Persisted state.
 *
 * ```rust
 * use newsdesk_engine::editing::{Cmd, DocumentEditor};
 * use newsdesk_engine::models::{BlockType, ContentKind};
 *
 * let mut doc = DocumentEditor::new(ContentKind::News);
 * doc.set_title("Breaking News");
 * doc.set_excerpt(Some("Short version".to_string()));
 *
 * let patch = doc.apply(Cmd::Append { kind: BlockType::Heading });
 * let id = patch.block.unwrap();
 * doc.apply(Cmd::UpdateContent { id, content: "Breaking News".to_string() });
 *
 * let request = doc.begin_save().unwrap();
 * assert_eq!(request.payload.content.len(), 1);
 * doc.complete_save(Some("n1".to_string()));
 * ```
 */

pub mod commands;
pub mod editor;
pub mod patch;
pub mod session;

pub use commands::{Cmd, Direction, MetaPatch};
pub use editor::BlockListEditor;
pub use patch::Patch;
pub use session::{DocumentEditor, EditorError, SaveRequest, SaveState, SaveTarget};
