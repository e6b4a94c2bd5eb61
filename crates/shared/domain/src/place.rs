//! Place entity, its wire format and the place form draft.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use validator::Validate;

use crate::constants::{DAYS_PER_WEEK, DEFAULT_CLOSE_TIME, DEFAULT_OPEN_TIME, WEEKDAYS};
use crate::entity::{Draft, DraftMode, Entity};
use crate::error::DomainError;
use crate::image::{Image, ImageDraft, PendingImage};
use crate::serde_helpers::null_as_default;
use crate::validation::{latitude_range, longitude_range, not_blank, rating_range, FieldErrors};

// =============================================================================
// Price level
// =============================================================================

/// `$` .. `$$$$`. An empty string on the wire means "not set".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PriceLevel {
    Budget,
    Moderate,
    Expensive,
    Luxury,
}

impl PriceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceLevel::Budget => "$",
            PriceLevel::Moderate => "$$",
            PriceLevel::Expensive => "$$$",
            PriceLevel::Luxury => "$$$$",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "$" => Some(PriceLevel::Budget),
            "$$" => Some(PriceLevel::Moderate),
            "$$$" => Some(PriceLevel::Expensive),
            "$$$$" => Some(PriceLevel::Luxury),
            _ => None,
        }
    }
}

impl fmt::Display for PriceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

mod price_level {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Option<PriceLevel>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(value.map(|p| p.as_str()).unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<PriceLevel>, D::Error> {
        let raw = Option::<String>::deserialize(d)?.unwrap_or_default();
        if raw.trim().is_empty() {
            return Ok(None);
        }
        PriceLevel::parse(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid price level {:?}", raw)))
    }
}

// =============================================================================
// Operating hours
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatingHour {
    pub day: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub open: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub close: String,
    #[serde(default)]
    pub is_closed: bool,
}

/// One open row per weekday, Monday first.
pub fn default_operating_hours() -> Vec<OperatingHour> {
    WEEKDAYS
        .iter()
        .map(|day| OperatingHour {
            day: day.to_string(),
            open: DEFAULT_OPEN_TIME.to_string(),
            close: DEFAULT_CLOSE_TIME.to_string(),
            is_closed: false,
        })
        .collect()
}

// =============================================================================
// Place
// =============================================================================

/// Place entity.
///
/// The featured image is tracked by position at the place level; the wire
/// format's per-image `isFeatured` flags are translated on the way in and out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PlaceRecord", into = "PlaceRecord")]
pub struct Place {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub rating: Option<f64>,
    pub price_level: Option<PriceLevel>,
    pub address: String,
    pub phone: String,
    pub website: String,
    pub cuisine: String,
    pub is_open_now: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub category_ids: BTreeSet<i64>,
    pub subcategory_ids: BTreeSet<i64>,
    pub feature_ids: BTreeSet<i64>,
    pub images: Vec<Image>,
    /// Position of the featured image in `images`
    pub featured_index: Option<usize>,
    pub operating_hours: Vec<OperatingHour>,
    pub popular_items: Vec<String>,
}

impl Entity for Place {
    type Id = i64;

    fn id(&self) -> &i64 {
        &self.id
    }
}

impl Place {
    /// The featured image, if it is still attached.
    pub fn featured(&self) -> Option<&Image> {
        self.images.get(self.featured_index?)
    }
}

/// Image as it appears on the wire, with its featured flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    #[serde(flatten)]
    pub image: Image,
    #[serde(default)]
    pub is_featured: bool,
}

/// Place as it appears on the wire. Also the create/update payload, with
/// `id` omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default, with = "price_level")]
    pub price_level: Option<PriceLevel>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub website: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cuisine: String,
    #[serde(default)]
    pub is_open_now: bool,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category_ids: BTreeSet<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subcategory_ids: BTreeSet<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub feature_ids: BTreeSet<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<ImageRecord>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub operating_hours: Vec<OperatingHour>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub popular_items: Vec<String>,
}

/// Flag exactly the image at position `featured`.
fn flag_featured(images: Vec<Image>, featured: Option<usize>) -> Vec<ImageRecord> {
    images
        .into_iter()
        .enumerate()
        .map(|(index, image)| ImageRecord {
            image,
            is_featured: featured == Some(index),
        })
        .collect()
}

impl TryFrom<PlaceRecord> for Place {
    type Error = DomainError;

    fn try_from(record: PlaceRecord) -> Result<Self, Self::Error> {
        let id = record
            .id
            .ok_or_else(|| DomainError::malformed("place without id"))?;

        // Zero or several flagged images are representable on the wire; the
        // first flagged one wins.
        let featured_index = record.images.iter().position(|r| r.is_featured);

        Ok(Self {
            id,
            name: record.name,
            description: record.description,
            rating: record.rating,
            price_level: record.price_level,
            address: record.address,
            phone: record.phone,
            website: record.website,
            cuisine: record.cuisine,
            is_open_now: record.is_open_now,
            latitude: record.latitude,
            longitude: record.longitude,
            category_ids: record.category_ids,
            subcategory_ids: record.subcategory_ids,
            feature_ids: record.feature_ids,
            images: record.images.into_iter().map(|r| r.image).collect(),
            featured_index,
            operating_hours: record.operating_hours,
            popular_items: record.popular_items,
        })
    }
}

impl From<Place> for PlaceRecord {
    fn from(place: Place) -> Self {
        let images = flag_featured(place.images, place.featured_index);
        Self {
            id: Some(place.id),
            name: place.name,
            description: place.description,
            rating: place.rating,
            price_level: place.price_level,
            address: place.address,
            phone: place.phone,
            website: place.website,
            cuisine: place.cuisine,
            is_open_now: place.is_open_now,
            latitude: place.latitude,
            longitude: place.longitude,
            category_ids: place.category_ids,
            subcategory_ids: place.subcategory_ids,
            feature_ids: place.feature_ids,
            images,
            operating_hours: place.operating_hours,
            popular_items: place.popular_items,
        }
    }
}

// =============================================================================
// Place draft
// =============================================================================

/// Place create/edit form state.
///
/// Serializes to the wire payload; pending images are never part of it, so
/// the upload stage must run before the draft is sent.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct PlaceDraft {
    #[validate(custom(function = "not_blank", message = "Place name is required"))]
    pub name: String,
    pub description: String,
    #[validate(custom(function = "rating_range"))]
    pub rating: Option<f64>,
    pub price_level: Option<PriceLevel>,
    #[validate(custom(function = "not_blank", message = "Address is required"))]
    pub address: String,
    pub phone: String,
    pub website: String,
    pub cuisine: String,
    pub is_open_now: bool,
    #[validate(custom(function = "latitude_range"))]
    pub latitude: Option<f64>,
    #[validate(custom(function = "longitude_range"))]
    pub longitude: Option<f64>,
    pub category_ids: BTreeSet<i64>,
    pub subcategory_ids: BTreeSet<i64>,
    pub feature_ids: BTreeSet<i64>,
    pub images: Vec<ImageDraft>,
    /// Position of the featured row in `images`
    pub featured: Option<usize>,
    #[validate(length(equal = 7, message = "Operating hours must cover all seven days"))]
    pub operating_hours: Vec<OperatingHour>,
    pub popular_items: Vec<String>,
}

impl Default for PlaceDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            rating: None,
            price_level: None,
            address: String::new(),
            phone: String::new(),
            website: String::new(),
            cuisine: String::new(),
            is_open_now: false,
            latitude: None,
            longitude: None,
            category_ids: BTreeSet::new(),
            subcategory_ids: BTreeSet::new(),
            feature_ids: BTreeSet::new(),
            images: Vec::new(),
            featured: None,
            operating_hours: default_operating_hours(),
            popular_items: Vec::new(),
        }
    }
}

impl PlaceDraft {
    /// Add a local-only image and return its row. The first image of a place
    /// becomes featured.
    pub fn add_pending_image(&mut self, pending: PendingImage) -> usize {
        let index = self.images.len();
        self.images.push(ImageDraft::Pending(pending));
        if self.featured.is_none() {
            self.featured = Some(index);
        }
        index
    }

    /// Row of the pending image behind a preview handle.
    pub fn position_of_preview(&self, preview_url: &str) -> Option<usize> {
        self.images.iter().position(
            |row| matches!(row, ImageDraft::Pending(p) if p.preview_url == preview_url),
        )
    }

    pub fn pending_images(&self) -> impl Iterator<Item = &PendingImage> {
        self.images.iter().filter_map(|i| match i {
            ImageDraft::Pending(p) => Some(p),
            ImageDraft::Persisted(_) => None,
        })
    }

    pub fn has_pending_images(&self) -> bool {
        self.images.iter().any(ImageDraft::is_pending)
    }

    /// Mark one row as featured. Since the marker is a single position,
    /// every other row is implicitly unfeatured. Out-of-range rows are ignored.
    pub fn set_featured(&mut self, index: usize) -> bool {
        if index < self.images.len() {
            self.featured = Some(index);
            true
        } else {
            false
        }
    }

    /// Remove a row. Removing the featured image features the first
    /// remaining one.
    pub fn remove_image(&mut self, index: usize) -> Option<ImageDraft> {
        if index >= self.images.len() {
            return None;
        }
        let removed = self.images.remove(index);
        self.featured = match self.featured {
            Some(featured) if featured == index => (!self.images.is_empty()).then_some(0),
            Some(featured) if featured > index => Some(featured - 1),
            other => other,
        };
        Some(removed)
    }

    /// Swap a row for another in place; the featured marker stays on it.
    pub fn replace_image(&mut self, index: usize, replacement: ImageDraft) -> bool {
        match self.images.get_mut(index) {
            Some(slot) => {
                *slot = replacement;
                true
            }
            None => false,
        }
    }

    /// Toggle membership of a category id.
    pub fn toggle_category(&mut self, id: i64) {
        if !self.category_ids.remove(&id) {
            self.category_ids.insert(id);
        }
    }

    /// Toggle membership of a feature id.
    pub fn toggle_feature(&mut self, id: i64) {
        if !self.feature_ids.remove(&id) {
            self.feature_ids.insert(id);
        }
    }

    /// Wire payload built from the persisted images only.
    pub fn to_record(&self) -> PlaceRecord {
        let images = self
            .images
            .iter()
            .enumerate()
            .filter_map(|(index, row)| {
                row.as_persisted().map(|image| ImageRecord {
                    image: image.clone(),
                    is_featured: self.featured == Some(index),
                })
            })
            .collect();

        PlaceRecord {
            id: None,
            name: self.name.clone(),
            description: self.description.clone(),
            rating: self.rating,
            price_level: self.price_level,
            address: self.address.clone(),
            phone: self.phone.clone(),
            website: self.website.clone(),
            cuisine: self.cuisine.clone(),
            is_open_now: self.is_open_now,
            latitude: self.latitude,
            longitude: self.longitude,
            category_ids: self.category_ids.clone(),
            subcategory_ids: self.subcategory_ids.clone(),
            feature_ids: self.feature_ids.clone(),
            images,
            operating_hours: self.operating_hours.clone(),
            popular_items: self
                .popular_items
                .iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }
}

impl Serialize for PlaceDraft {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_record().serialize(serializer)
    }
}

impl Draft<Place> for PlaceDraft {
    fn from_entity(place: &Place) -> Self {
        Self {
            name: place.name.clone(),
            description: place.description.clone(),
            rating: place.rating,
            price_level: place.price_level,
            address: place.address.clone(),
            phone: place.phone.clone(),
            website: place.website.clone(),
            cuisine: place.cuisine.clone(),
            is_open_now: place.is_open_now,
            latitude: place.latitude,
            longitude: place.longitude,
            category_ids: place.category_ids.clone(),
            subcategory_ids: place.subcategory_ids.clone(),
            feature_ids: place.feature_ids.clone(),
            images: place.images.iter().cloned().map(ImageDraft::Persisted).collect(),
            featured: place.featured_index.filter(|&i| i < place.images.len()),
            operating_hours: if place.operating_hours.len() == DAYS_PER_WEEK {
                place.operating_hours.clone()
            } else {
                default_operating_hours()
            },
            popular_items: place.popular_items.clone(),
        }
    }

    fn check(&self, _mode: DraftMode) -> Result<(), FieldErrors> {
        FieldErrors::from_validation(self.validate()).into_result()
    }

    fn release_transient(&mut self) {
        for index in (0..self.images.len()).rev() {
            if self.images[index].is_pending() {
                self.remove_image(index);
            }
        }
    }
}
