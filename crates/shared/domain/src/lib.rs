//! Domain layer - WhereToGo entities, drafts and validation rules.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! Wire formats (camelCase JSON) are defined here so every client of the
//! backend agrees on them.

pub mod category;
pub mod constants;
pub mod entity;
pub mod error;
pub mod feature;
pub mod image;
pub mod place;
pub mod profile;
pub mod serde_helpers;
pub mod user;
pub mod validation;

pub use category::{Category, CategoryDraft, Subcategory, SubcategoryDraft};
pub use constants::*;
pub use entity::{Draft, DraftMode, Entity};
pub use error::{DomainError, DomainResult};
pub use feature::{Feature, FeatureDraft};
pub use image::{Image, ImageDraft, LocalFile, PendingImage, UploadedImage};
pub use place::{OperatingHour, Place, PlaceDraft, PlaceRecord, PriceLevel};
pub use profile::{
    PasswordChange, PersonalInfo, Preferences, ProfileForm, ProfileSection, SecuritySettings,
    Session,
};
pub use user::{User, UserDraft, UserRole};
pub use validation::FieldErrors;
