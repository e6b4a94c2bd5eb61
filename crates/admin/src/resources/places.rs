//! Places: list configuration and the image-aware place editor.

use std::collections::BTreeSet;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, warn};

use common::{AppError, AppResult};
use domain::{Image, ImageDraft, LocalFile, Place, PlaceDraft, PriceLevel};

use crate::clients::{public_id_from_url, ImageHost};
use crate::form::FormPhase;
use crate::images::{upload_pending, PreviewRegistry};
use crate::list::{ListSchema, SortDirection, SortValue};
use crate::page::AdminPage;
use crate::reference::ReferenceData;
use crate::resource::{CreateRoute, Resource};

pub struct Places;

fn ids_as_values(ids: &BTreeSet<i64>) -> Vec<String> {
    ids.iter().map(i64::to_string).collect()
}

fn price_rank(level: Option<PriceLevel>) -> Option<f64> {
    level.map(|p| p.as_str().len() as f64)
}

impl Resource for Places {
    type Entity = Place;
    type Draft = PlaceDraft;

    const NAME: &'static str = "places";
    const CREATE_ROUTE: CreateRoute = CreateRoute::Add;

    fn schema() -> ListSchema<Place> {
        ListSchema::<Place>::new()
            .search("name", |p| p.name.as_str())
            .search("description", |p| p.description.as_str())
            .filter("category", "Category", |p| ids_as_values(&p.category_ids))
            .filter("subcategory", "Subcategory", |p| ids_as_values(&p.subcategory_ids))
            .filter("feature", "Feature", |p| ids_as_values(&p.feature_ids))
            .filter("price", "Price", |p| {
                p.price_level.map(|l| l.as_str().to_string()).into_iter().collect()
            })
            .filter("open", "Open now", |p| vec![p.is_open_now.to_string()])
            .sort("name", |p| SortValue::Text(p.name.clone()))
            .sort("rating", |p| SortValue::Number(p.rating))
            .sort("price", |p| SortValue::Number(price_rank(p.price_level)))
            .sort("cuisine", |p| SortValue::Text(p.cuisine.clone()))
            .sort("open", |p| SortValue::Bool(p.is_open_now))
            .default_sort("name", SortDirection::Ascending)
    }
}

/// Drives the place form around the generic form controller: reference data
/// before the form opens, local previews while drafting, the upload stage on
/// save and host cleanup of removed images after a confirmed save.
pub struct PlaceEditor {
    host: Arc<dyn ImageHost>,
    previews: PreviewRegistry,
    /// Persisted images removed from the draft, deleted from the host only
    /// once the save succeeded
    removed: Vec<Image>,
    reference: Option<ReferenceData>,
    warnings: Vec<String>,
}

impl PlaceEditor {
    pub fn new(host: Arc<dyn ImageHost>) -> Self {
        Self {
            host,
            previews: PreviewRegistry::new(),
            removed: Vec::new(),
            reference: None,
            warnings: Vec::new(),
        }
    }

    pub fn reference(&self) -> Option<&ReferenceData> {
        self.reference.as_ref()
    }

    pub fn previews(&self) -> &PreviewRegistry {
        &self.previews
    }

    /// Messages about images that were left out of the last save or could
    /// not be removed from the host.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Lookup data loaded and the form open for editing.
    pub fn is_interactive(&self, page: &AdminPage<Places>) -> bool {
        self.reference.is_some() && page.form().phase() == FormPhase::Drafting
    }

    async fn prepare(&mut self, page: &AdminPage<Places>) -> AppResult<()> {
        self.reset();
        let api = Arc::clone(page.store().api());
        self.reference = Some(ReferenceData::load(api.as_ref()).await?);
        Ok(())
    }

    /// Load lookup data, then open the "Add" form.
    pub async fn open_add(&mut self, page: &mut AdminPage<Places>) -> AppResult<()> {
        self.prepare(page).await?;
        page.open_add();
        Ok(())
    }

    /// Load lookup data, then open the form seeded from place `id`.
    pub async fn open_edit(&mut self, page: &mut AdminPage<Places>, id: i64) -> AppResult<()> {
        self.prepare(page).await?;
        page.open_edit(&id)
    }

    fn draft(page: &mut AdminPage<Places>) -> AppResult<&mut PlaceDraft> {
        page.form_mut()
            .draft_mut()
            .ok_or_else(|| AppError::validation("The place form is not open"))
    }

    /// Add a picked file as a local preview and return its row. No network
    /// call is made.
    pub fn add_file(
        &mut self,
        page: &mut AdminPage<Places>,
        file: LocalFile,
        alt_text: impl Into<String>,
    ) -> AppResult<usize> {
        let draft = Self::draft(page)?;
        let pending = self.previews.stage(file, alt_text);
        Ok(draft.add_pending_image(pending))
    }

    /// Remove an image row. Persisted images are only queued for host
    /// deletion; previews are released right away.
    pub fn remove_image(&mut self, page: &mut AdminPage<Places>, row: usize) -> AppResult<bool> {
        let draft = Self::draft(page)?;
        match draft.remove_image(row) {
            Some(ImageDraft::Persisted(image)) => {
                self.removed.push(image);
                Ok(true)
            }
            Some(ImageDraft::Pending(pending)) => {
                self.previews.revoke(&pending.preview_url);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn set_featured(&mut self, page: &mut AdminPage<Places>, row: usize) -> AppResult<bool> {
        Ok(Self::draft(page)?.set_featured(row))
    }

    /// Validate, upload pending images, then save through the store.
    ///
    /// A failed save keeps the draft (with images uploaded so far) open for
    /// a retry.
    pub async fn save(&mut self, page: &mut AdminPage<Places>) -> AppResult<Place> {
        let (store, form) = page.split_mut();
        form.begin_submit()?;

        self.warnings.clear();
        if let Some(draft) = form.submitting_draft_mut() {
            let report = upload_pending(self.host.as_ref(), draft, &mut self.previews).await;
            self.warnings = report.warnings();
        }

        let saved = form.commit(store).await?;
        info!("Saved place {} with {} images", saved.id, saved.images.len());

        self.delete_removed().await;
        self.previews.revoke_all();
        self.reference = None;
        Ok(saved)
    }

    /// Close the form. Previews are released; persisted images are kept.
    pub fn cancel(&mut self, page: &mut AdminPage<Places>) {
        page.cancel_form();
        self.reset();
    }

    fn reset(&mut self) {
        self.previews.revoke_all();
        self.removed.clear();
        self.reference = None;
        self.warnings.clear();
    }

    async fn delete_removed(&mut self) {
        let removed = std::mem::take(&mut self.removed);
        let targets: Vec<(String, String)> = removed
            .into_iter()
            .filter_map(|image| {
                let public_id = image
                    .public_id
                    .clone()
                    .or_else(|| public_id_from_url(&image.url));
                if public_id.is_none() {
                    debug!("No public id for {}, leaving it on the host", image.url);
                }
                public_id.map(|id| (image.url, id))
            })
            .collect();

        let host = self.host.as_ref();
        let results = join_all(targets.iter().map(|(_, id)| host.delete(id))).await;

        for ((url, _), result) in targets.iter().zip(results) {
            match result {
                Ok(true) => debug!("Deleted {} from the image host", url),
                Ok(false) => debug!("{} was already gone from the image host", url),
                Err(e) => {
                    warn!("Could not delete {} from the image host: {}", url, e);
                    self.warnings
                        .push(format!("{} could not be removed from the image host", url));
                }
            }
        }
    }
}
