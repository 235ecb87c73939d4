//! Network side of the newsdesk editor: the REST content API, the image
//! upload collaborator, and the save flow that ties them to a
//! [`DocumentEditor`](newsdesk_engine::editing::DocumentEditor).

pub mod api;
pub mod envelope;
pub mod error;
pub mod save;
pub mod upload;

pub use api::ApiClient;
pub use envelope::{ApiResponse, ErrorMessage};
pub use error::{ApiError, NETWORK_ERROR_MESSAGE};
pub use save::{DocumentStore, SaveError, save_document};
pub use upload::{EncodedImage, ImageUploader, upload_block_image, upload_cover_image};
