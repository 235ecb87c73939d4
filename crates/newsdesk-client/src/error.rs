use newsdesk_engine::models::BlockId;

/// Message shown for anything that went wrong below the API contract
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your connection and try again.";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Unexpected response (HTTP {status}): {reason}")]
    InvalidResponse { status: u16, reason: String },
    /// `success: false` from the backend, with its message verbatim
    #[error("{0}")]
    Server(String),
    #[error("Response did not include {0}")]
    MissingData(&'static str),
    /// Upload target is missing or is not an image block
    #[error("Block {0} is not an image block")]
    NotAnImageBlock(BlockId),
}

impl ApiError {
    /// Text to put in front of the user
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Server(message) => message.clone(),
            ApiError::NotAnImageBlock(_) => "Select an image block to upload into".to_string(),
            ApiError::Network(_) | ApiError::InvalidResponse { .. } | ApiError::MissingData(_) => {
                NETWORK_ERROR_MESSAGE.to_string()
            }
        }
    }
}
