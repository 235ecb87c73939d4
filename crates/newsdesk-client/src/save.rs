use async_trait::async_trait;
use log::{info, warn};
use newsdesk_engine::editing::{DocumentEditor, EditorError, SaveTarget};
use newsdesk_engine::wire::DocumentPayload;

use crate::ApiError;

/// Backend collaborator that stores documents
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create a document, returning the id the backend assigned if it sent one
    async fn create(
        &self,
        resource: &str,
        payload: &DocumentPayload,
    ) -> Result<Option<String>, ApiError>;

    async fn update(
        &self,
        resource: &str,
        id: &str,
        payload: &DocumentPayload,
    ) -> Result<(), ApiError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error(transparent)]
    Invalid(#[from] EditorError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl SaveError {
    pub fn user_message(&self) -> String {
        match self {
            SaveError::Invalid(err) => err.to_string(),
            SaveError::Api(err) => err.user_message(),
        }
    }
}

/// Send the editor's document to the backend.
///
/// Validation failures return before any request is made. A failed request
/// leaves the editor exactly as it was, apart from clearing the in-flight
/// flag so the user can retry.
pub async fn save_document<S: DocumentStore + ?Sized>(
    store: &S,
    editor: &mut DocumentEditor,
) -> Result<(), SaveError> {
    let request = editor.begin_save()?;
    let resource = request.kind.resource();

    let result = match &request.target {
        SaveTarget::Create => store.create(resource, &request.payload).await,
        SaveTarget::Update { id } => store
            .update(resource, id, &request.payload)
            .await
            .map(|()| None),
    };

    match result {
        Ok(created_id) => {
            info!(
                "saved {resource} {}",
                created_id.as_deref().or(editor.remote_id()).unwrap_or("(no id)")
            );
            editor.complete_save(created_id);
            Ok(())
        }
        Err(err) => {
            warn!("saving {resource} failed: {err}");
            editor.abort_save();
            Err(err.into())
        }
    }
}
