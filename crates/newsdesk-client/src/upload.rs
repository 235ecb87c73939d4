use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use log::{info, warn};
use newsdesk_engine::editing::{Cmd, DocumentEditor};
use newsdesk_engine::models::{BlockId, BlockType, ContentBlock};
use std::path::Path;

use crate::ApiError;

/// An image ready to be sent to the upload endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedImage {
    mime: String,
    base64: String,
}

impl EncodedImage {
    pub fn from_bytes(bytes: &[u8], mime: impl Into<String>) -> Self {
        Self {
            mime: mime.into(),
            base64: STANDARD.encode(bytes),
        }
    }

    /// Read and encode a local image file, guessing the type from its extension
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(Self::from_bytes(&bytes, mime_for_path(path)))
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn base64(&self) -> &str {
        &self.base64
    }

    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, self.base64)
    }
}

pub fn mime_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Storage collaborator that turns an image into a public URL
#[async_trait]
pub trait ImageUploader: Send + Sync {
    async fn upload_image(&self, image: &EncodedImage, folder: &str) -> Result<String, ApiError>;
}

fn is_image_block(editor: &DocumentEditor, id: &BlockId) -> bool {
    editor
        .blocks()
        .get(id)
        .and_then(ContentBlock::block_type)
        == Some(BlockType::Image)
}

/// Upload an image and store its URL as the content of an image block.
/// Appends a new image block when `block` is `None`.
///
/// A `block` that is missing or not an image fails before anything is sent.
pub async fn upload_block_image<U: ImageUploader + ?Sized>(
    uploader: &U,
    editor: &mut DocumentEditor,
    block: Option<BlockId>,
    image: &EncodedImage,
    folder: &str,
) -> Result<BlockId, ApiError> {
    if let Some(id) = &block
        && !is_image_block(editor, id)
    {
        warn!("refusing to upload into block {id}");
        return Err(ApiError::NotAnImageBlock(id.clone()));
    }

    let url = uploader.upload_image(image, folder).await?;
    info!("uploaded image to {url}");

    let id = match block {
        Some(id) => id,
        None => editor
            .apply(Cmd::Append {
                kind: BlockType::Image,
            })
            .block
            .ok_or(ApiError::MissingData("image block"))?,
    };
    let patch = editor.apply(Cmd::UpdateContent {
        id: id.clone(),
        content: url.clone(),
    });

    let stored = editor.blocks().get(&id).map(|block| block.content.as_str());
    if !patch.changed && stored != Some(url.as_str()) {
        return Err(ApiError::NotAnImageBlock(id));
    }
    Ok(id)
}

/// Upload an image and use it as the document's cover
pub async fn upload_cover_image<U: ImageUploader + ?Sized>(
    uploader: &U,
    editor: &mut DocumentEditor,
    image: &EncodedImage,
    folder: &str,
) -> Result<String, ApiError> {
    let url = uploader.upload_image(image, folder).await?;
    editor.set_cover_image(Some(url.clone()));
    Ok(url)
}
