use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Media kind, derived from the MIME type at upload time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Classify a MIME type the way uploads are classified: anything `video/*` is a video.
    pub fn from_mime_type(mime_type: &str) -> Self {
        if mime_type.trim().to_lowercase().starts_with("video") {
            MediaKind::Video
        } else {
            MediaKind::Image
        }
    }
}

/// Stored media record. Owned by the metadata store; read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MediaRecord {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Origin location of the bytes
    pub url: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub size: Option<i64>,
    pub uploaded_at: DateTime<Utc>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

impl MediaRecord {
    pub fn location(&self) -> MediaLocation {
        MediaLocation {
            url: self.url.clone(),
            mime_type: self.mime_type.clone(),
        }
    }
}

/// The slice of a record the stream path needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaLocation {
    pub url: String,
    pub mime_type: Option<String>,
}
