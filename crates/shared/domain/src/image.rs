//! Place images: persisted records and local-only previews.

use serde::{Deserialize, Serialize};

/// Image stored on the image host and attached to a place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub url: String,
    #[serde(default)]
    pub alt_text: String,
    /// Image-host key; `None` for legacy rows that only kept the URL
    #[serde(default)]
    pub public_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// Result of a successful upload to the image host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    pub url: String,
    pub public_id: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub format: Option<String>,
}

impl UploadedImage {
    /// Turn the host response into a persisted image record.
    pub fn into_image(self, alt_text: String) -> Image {
        Image {
            id: None,
            url: self.url,
            alt_text,
            public_id: Some(self.public_id),
            width: self.width,
            height: self.height,
            format: self.format,
        }
    }
}

/// File picked by the user, held in memory until the form is saved.
#[derive(Clone, PartialEq)]
pub struct LocalFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for LocalFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalFile")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// Image selected in a form but not uploaded yet.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingImage {
    /// Local preview handle, valid only while the form is open
    pub preview_url: String,
    pub alt_text: String,
    pub file: LocalFile,
}

/// An image row inside a place draft.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageDraft {
    Persisted(Image),
    Pending(PendingImage),
}

impl ImageDraft {
    pub fn is_pending(&self) -> bool {
        matches!(self, ImageDraft::Pending(_))
    }

    pub fn as_persisted(&self) -> Option<&Image> {
        match self {
            ImageDraft::Persisted(image) => Some(image),
            ImageDraft::Pending(_) => None,
        }
    }
}
