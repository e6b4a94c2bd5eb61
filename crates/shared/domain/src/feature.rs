//! Feature tags (Wi-Fi, Parking, ...), many-to-many with places.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entity::{Draft, DraftMode, Entity};
use crate::validation::{not_blank, FieldErrors};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub id: i64,
    pub name: String,
}

impl Entity for Feature {
    type Id = i64;

    fn id(&self) -> &i64 {
        &self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct FeatureDraft {
    #[validate(custom(function = "not_blank", message = "Feature name is required"))]
    pub name: String,
}

impl Draft<Feature> for FeatureDraft {
    fn from_entity(feature: &Feature) -> Self {
        Self {
            name: feature.name.clone(),
        }
    }

    fn check(&self, _mode: DraftMode) -> Result<(), FieldErrors> {
        FieldErrors::from_validation(self.validate()).into_result()
    }
}
