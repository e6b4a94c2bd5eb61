//! Image host client: upload local files, delete hosted images.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use common::{AppError, AppResult, ApiConfig, ClientConfig, IMAGE_DELETE_PATH};
use domain::{LocalFile, UploadedImage};

use super::api_client::unwrap_envelope;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Upload one file and return the hosted image.
    async fn upload(&self, file: &LocalFile) -> AppResult<UploadedImage>;

    /// Delete a hosted image by public id. `Ok(false)` means the host
    /// answered but did not delete anything.
    async fn delete(&self, public_id: &str) -> AppResult<bool>;
}

/// Marker that precedes the public id in hosted image URLs.
const UPLOAD_MARKER: &str = "/upload/";

/// Recover the public id from a hosted URL.
///
/// `https://host/demo/image/upload/v1699999/places/abc.jpg` -> `places/abc`
pub fn public_id_from_url(url: &str) -> Option<String> {
    let start = url.find(UPLOAD_MARKER)? + UPLOAD_MARKER.len();
    let mut path = &url[start..];

    // Drop query string / fragment
    if let Some(end) = path.find(['?', '#']) {
        path = &path[..end];
    }

    // Optional version segment: v<digits>/
    if let Some(rest) = path.strip_prefix('v') {
        if let Some(slash) = rest.find('/') {
            if slash > 0 && rest[..slash].chars().all(|c| c.is_ascii_digit()) {
                path = &rest[slash + 1..];
            }
        }
    }

    // Extension of the last segment only
    let last_slash = path.rfind('/').map(|i| i + 1).unwrap_or(0);
    if let Some(dot) = path[last_slash..].rfind('.') {
        path = &path[..last_slash + dot];
    }

    if path.is_empty() {
        None
    } else {
        Some(path.to_string())
    }
}

/// Upload response; the host may use either naming convention.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    secure_url: Option<String>,
    #[serde(default, alias = "publicId")]
    public_id: Option<String>,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
    #[serde(default)]
    format: Option<String>,
}

impl UploadResponse {
    fn into_uploaded(self) -> AppResult<UploadedImage> {
        let url = self
            .secure_url
            .or(self.url)
            .ok_or_else(|| AppError::image_host("upload response has no url"))?;
        let public_id = match self.public_id {
            Some(id) => id,
            None => public_id_from_url(&url)
                .ok_or_else(|| AppError::image_host("cannot determine public id"))?,
        };
        Ok(UploadedImage {
            url,
            public_id,
            width: self.width,
            height: self.height,
            format: self.format,
        })
    }
}

/// Image host reached through the backend's upload endpoints.
pub struct HttpImageHost {
    client: Client,
    api: ApiConfig,
    upload_path: String,
}

impl HttpImageHost {
    pub fn new(client: Client, config: &ClientConfig) -> Self {
        Self {
            client,
            api: config.api.clone(),
            upload_path: config.image_upload_path.clone(),
        }
    }
}

#[async_trait]
impl ImageHost for HttpImageHost {
    async fn upload(&self, file: &LocalFile) -> AppResult<UploadedImage> {
        let url = self.api.url(&self.upload_path);
        debug!("Uploading {} ({} bytes) to {}", file.name, file.bytes.len(), url);

        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(&file.content_type)?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::image_host(format!("{}: {}", file.name, e)))?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            warn!("Image upload failed: HTTP {} - {}", status, body);
            return Err(AppError::image_host(format!(
                "{}: HTTP {}",
                file.name,
                status.as_u16()
            )));
        }

        let value: Value = serde_json::from_str(&body)?;
        let parsed: UploadResponse = serde_json::from_value(unwrap_envelope(value))?;
        parsed.into_uploaded()
    }

    async fn delete(&self, public_id: &str) -> AppResult<bool> {
        let url = self.api.url(IMAGE_DELETE_PATH);
        debug!("Deleting hosted image {}", public_id);

        let response = self
            .client
            .post(&url)
            .json(&json!({ "publicId": public_id }))
            .send()
            .await
            .map_err(|e| AppError::image_host(format!("delete {}: {}", public_id, e)))?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Ok(false);
        }
        let body = response.text().await?;
        if !status.is_success() {
            return Err(AppError::from_status(status.as_u16(), &body));
        }

        Ok(delete_succeeded(&body))
    }
}

/// `{"success":true}`, `{"result":"ok"}` or an empty body count as deleted.
fn delete_succeeded(body: &str) -> bool {
    if body.trim().is_empty() {
        return true;
    }
    match serde_json::from_str::<Value>(body) {
        Ok(value) => {
            let value = unwrap_envelope(value);
            value
                .get("success")
                .and_then(Value::as_bool)
                .or_else(|| value.get("result").and_then(Value::as_str).map(|r| r == "ok"))
                .unwrap_or(true)
        }
        Err(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_id_with_version_and_extension() {
        assert_eq!(
            public_id_from_url(
                "https://res.example.com/demo/image/upload/v1699999/places/abc.jpg"
            ),
            Some("places/abc".to_string())
        );
    }

    #[test]
    fn test_public_id_without_version() {
        assert_eq!(
            public_id_from_url("https://res.example.com/demo/image/upload/places/abc.webp"),
            Some("places/abc".to_string())
        );
    }

    #[test]
    fn test_public_id_keeps_dots_in_folders() {
        assert_eq!(
            public_id_from_url("https://h/image/upload/v12/v1.2/shot.final.png?x=1"),
            Some("v1.2/shot.final".to_string())
        );
    }

    #[test]
    fn test_public_id_requires_marker() {
        assert_eq!(public_id_from_url("https://cdn.example.com/places/abc.jpg"), None);
        assert_eq!(public_id_from_url("https://h/image/upload/"), None);
    }

    #[test]
    fn test_upload_response_derives_public_id() {
        let response: UploadResponse = serde_json::from_str(
            r#"{"secure_url":"https://h/image/upload/v3/places/x.jpg","width":800}"#,
        )
        .unwrap();
        let uploaded = response.into_uploaded().unwrap();
        assert_eq!(uploaded.public_id, "places/x");
        assert_eq!(uploaded.width, Some(800));
    }

    #[test]
    fn test_delete_result_shapes() {
        assert!(delete_succeeded(""));
        assert!(delete_succeeded(r#"{"success":true}"#));
        assert!(!delete_succeeded(r#"{"success":false}"#));
        assert!(delete_succeeded(r#"{"result":"ok"}"#));
        assert!(!delete_succeeded(r#"{"result":"not found"}"#));
    }
}
