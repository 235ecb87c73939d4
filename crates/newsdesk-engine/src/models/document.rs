use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend visibility of a document. Passed through untouched by the editor:
/// values other than `Draft` and `Published` are kept and sent back verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum PublishStatus {
    #[default]
    Draft,
    Published,
    Other(String),
}

impl PublishStatus {
    pub fn as_str(&self) -> &str {
        match self {
            PublishStatus::Draft => "Draft",
            PublishStatus::Published => "Published",
            PublishStatus::Other(status) => status,
        }
    }

    /// Flip between draft and published. An unrecognised status publishes.
    pub fn toggle(self) -> Self {
        match self {
            PublishStatus::Published => PublishStatus::Draft,
            PublishStatus::Draft | PublishStatus::Other(_) => PublishStatus::Published,
        }
    }
}

impl From<Option<String>> for PublishStatus {
    fn from(status: Option<String>) -> Self {
        let Some(status) = status else {
            return PublishStatus::Draft;
        };
        if status == "Draft" {
            PublishStatus::Draft
        } else if status == "Published" {
            PublishStatus::Published
        } else {
            PublishStatus::Other(status)
        }
    }
}

impl From<PublishStatus> for String {
    fn from(status: PublishStatus) -> Self {
        match status {
            PublishStatus::Other(status) => status,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for PublishStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which editor a document belongs to. Decides the REST resource and the
/// fields that must be filled in before saving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    News,
    Page,
}

impl ContentKind {
    pub fn resource(&self) -> &'static str {
        match self {
            ContentKind::News => "news",
            ContentKind::Page => "pages",
        }
    }

    pub fn from_resource(resource: &str) -> Option<Self> {
        match resource.trim_matches('/') {
            "news" => Some(ContentKind::News),
            "pages" | "page" => Some(ContentKind::Page),
            _ => None,
        }
    }

    pub fn requires_excerpt(&self) -> bool {
        matches!(self, ContentKind::News)
    }
}

/// Document-level fields edited alongside the block list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentFields {
    pub title: String,
    pub excerpt: Option<String>,
    pub cover_image: Option<String>,
    pub status: PublishStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_resource_names() {
        assert_eq!(ContentKind::News.resource(), "news");
        assert_eq!(ContentKind::Page.resource(), "pages");
        assert_eq!(ContentKind::from_resource("/news/"), Some(ContentKind::News));
        assert_eq!(ContentKind::from_resource("page"), Some(ContentKind::Page));
        assert_eq!(ContentKind::from_resource("posters"), None);
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&PublishStatus::Published).unwrap(),
            "\"Published\""
        );
        let status: PublishStatus = serde_json::from_str("\"Draft\"").unwrap();
        assert_eq!(status, PublishStatus::Draft);
        assert_eq!(status.toggle(), PublishStatus::Published);
    }

    #[test]
    fn test_null_status_is_draft() {
        let status: PublishStatus = serde_json::from_str("null").unwrap();
        assert_eq!(status, PublishStatus::Draft);
    }

    #[rstest]
    #[case("Archived")]
    #[case("draft")]
    #[case("")]
    fn test_unknown_status_passes_through(#[case] raw: &str) {
        let json = serde_json::to_string(raw).unwrap();
        let status: PublishStatus = serde_json::from_str(&json).unwrap();

        assert_eq!(status, PublishStatus::Other(raw.to_string()));
        assert_eq!(serde_json::to_string(&status).unwrap(), json);
        assert_eq!(status.toggle(), PublishStatus::Published);
    }
}
