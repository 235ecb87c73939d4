use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{WireBlock, WireError, lenient_id, parse_content_value};
use crate::models::{DocumentFields, PublishStatus};

/// Body of a create or update request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPayload {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub content: Vec<WireBlock>,
    #[serde(default)]
    pub status: PublishStatus,
}

/// A document as returned by `GET /{resource}/{id}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteDocument {
    #[serde(rename = "_id", default, deserialize_with = "lenient_id")]
    pub object_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub content: Value,
    #[serde(default)]
    pub status: PublishStatus,
}

impl RemoteDocument {
    pub fn server_id(&self) -> Option<&str> {
        self.object_id.as_deref().or(self.id.as_deref())
    }

    pub fn fields(&self) -> DocumentFields {
        DocumentFields {
            title: self.title.clone(),
            excerpt: self.excerpt.clone(),
            cover_image: self.cover_image.clone(),
            status: self.status.clone(),
        }
    }

    pub fn wire_blocks(&self) -> Result<Vec<WireBlock>, WireError> {
        parse_content_value(self.content.clone())
    }
}

/// One row of `GET /{resource}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    #[serde(rename = "_id", default, deserialize_with = "lenient_id")]
    pub object_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: PublishStatus,
}

impl DocumentSummary {
    pub fn server_id(&self) -> Option<&str> {
        self.object_id.as_deref().or(self.id.as_deref())
    }
}
