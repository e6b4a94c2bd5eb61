//! Local image previews and the deferred upload stage of the place form.

use std::collections::BTreeSet;

use futures::future::join_all;
use tracing::{debug, info, warn};
use uuid::Uuid;

use domain::{ImageDraft, LocalFile, PendingImage, PlaceDraft};

use crate::clients::ImageHost;

const PREVIEW_SCHEME: &str = "blob:wheretogo/";

/// Issues preview handles for files picked in a form and tracks which ones
/// are still live.
#[derive(Debug, Default)]
pub struct PreviewRegistry {
    live: BTreeSet<String>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a picked file in a pending image with a fresh preview handle.
    pub fn stage(&mut self, file: LocalFile, alt_text: impl Into<String>) -> PendingImage {
        let preview_url = format!("{}{}", PREVIEW_SCHEME, Uuid::new_v4());
        self.live.insert(preview_url.clone());
        debug!("Staged {} as {}", file.name, preview_url);
        PendingImage {
            preview_url,
            alt_text: alt_text.into(),
            file,
        }
    }

    pub fn is_live(&self, preview_url: &str) -> bool {
        self.live.contains(preview_url)
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn revoke(&mut self, preview_url: &str) -> bool {
        self.live.remove(preview_url)
    }

    pub fn revoke_all(&mut self) {
        if !self.live.is_empty() {
            debug!("Revoking {} image previews", self.live.len());
            self.live.clear();
        }
    }
}

/// An image that could not be uploaded and was left out of the save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFailure {
    pub file_name: String,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct UploadReport {
    pub uploaded: usize,
    pub failed: Vec<UploadFailure>,
}

impl UploadReport {
    pub fn warnings(&self) -> Vec<String> {
        self.failed
            .iter()
            .map(|f| format!("{} was not uploaded: {}", f.file_name, f.message))
            .collect()
    }
}

/// Upload every pending image of `draft` concurrently and swap each one for
/// its persisted record. Uploads are independent: a failed one is removed
/// from the draft and reported, the rest carry on.
pub async fn upload_pending(
    host: &dyn ImageHost,
    draft: &mut PlaceDraft,
    previews: &mut PreviewRegistry,
) -> UploadReport {
    let pending: Vec<PendingImage> = draft.pending_images().cloned().collect();
    let mut report = UploadReport::default();
    if pending.is_empty() {
        return report;
    }

    info!("Uploading {} images", pending.len());
    let results = join_all(pending.iter().map(|p| host.upload(&p.file))).await;

    for (image, result) in pending.into_iter().zip(results) {
        previews.revoke(&image.preview_url);
        let Some(row) = draft.position_of_preview(&image.preview_url) else {
            continue;
        };
        match result {
            Ok(uploaded) => {
                let persisted = uploaded.into_image(image.alt_text);
                draft.replace_image(row, ImageDraft::Persisted(persisted));
                report.uploaded += 1;
            }
            Err(e) => {
                warn!("Upload of {} failed: {}", image.file.name, e);
                draft.remove_image(row);
                report.failed.push(UploadFailure {
                    file_name: image.file.name,
                    message: e.user_message(),
                });
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::MockImageHost;
    use common::AppError;
    use domain::UploadedImage;

    fn file(name: &str) -> LocalFile {
        LocalFile {
            name: name.to_string(),
            content_type: "image/jpeg".to_string(),
            bytes: vec![1, 2, 3],
        }
    }

    #[test]
    fn test_previews_are_unique_and_revocable() {
        let mut previews = PreviewRegistry::new();
        let a = previews.stage(file("a.jpg"), "");
        let b = previews.stage(file("b.jpg"), "");
        assert_ne!(a.preview_url, b.preview_url);
        assert!(a.preview_url.starts_with("blob:"));
        assert_eq!(previews.len(), 2);

        assert!(previews.revoke(&a.preview_url));
        assert!(!previews.is_live(&a.preview_url));
        previews.revoke_all();
        assert!(previews.is_empty());
    }

    #[tokio::test]
    async fn test_one_failed_upload_does_not_abort_others() {
        let mut host = MockImageHost::new();
        host.expect_upload().times(2).returning(|file| {
            if file.name == "broken.jpg" {
                Err(AppError::image_host("unsupported format"))
            } else {
                Ok(UploadedImage {
                    url: "https://img.example/upload/v1/places/ok.jpg".to_string(),
                    public_id: "places/ok".to_string(),
                    width: Some(800),
                    height: Some(600),
                    format: Some("jpg".to_string()),
                })
            }
        });

        let mut previews = PreviewRegistry::new();
        let mut draft = PlaceDraft::default();
        let broken = previews.stage(file("broken.jpg"), "");
        draft.add_pending_image(broken);
        draft.add_pending_image(previews.stage(file("ok.jpg"), "Front"));

        let report = upload_pending(&host, &mut draft, &mut previews).await;

        assert_eq!(report.uploaded, 1);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].file_name, "broken.jpg");
        assert!(!draft.has_pending_images());
        assert_eq!(draft.images.len(), 1);
        // The failed image was featured; the survivor takes over.
        assert_eq!(draft.featured, Some(0));
        assert_eq!(
            draft.images[0].as_persisted().map(|i| i.url.as_str()),
            Some("https://img.example/upload/v1/places/ok.jpg")
        );
        assert!(previews.is_empty());
    }
}
