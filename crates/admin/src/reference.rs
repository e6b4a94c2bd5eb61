//! Lookup data the place form needs before it becomes interactive.

use std::collections::BTreeSet;

use futures::future::try_join;
use tracing::debug;

use common::AppResult;
use domain::{Category, Feature, Subcategory};

use crate::clients::ApiTransport;
use crate::resource::Resource;
use crate::resources::{Categories, Features};
use crate::store::decode_list;

/// Categories (with their subcategories) and features, fetched together.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub categories: Vec<Category>,
    pub features: Vec<Feature>,
}

impl ReferenceData {
    /// Fetch both lists in parallel. Fails if either request fails.
    pub async fn load(api: &dyn ApiTransport) -> AppResult<Self> {
        let categories_path = Categories::collection_path();
        let features_path = Features::collection_path();
        let (categories, features) =
            try_join(api.get(&categories_path), api.get(&features_path)).await?;

        let data = Self {
            categories: decode_list(categories)?,
            features: decode_list(features)?,
        };
        debug!(
            "Loaded {} categories and {} features",
            data.categories.len(),
            data.features.len()
        );
        Ok(data)
    }

    pub fn category(&self, id: i64) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn feature(&self, id: i64) -> Option<&Feature> {
        self.features.iter().find(|f| f.id == id)
    }

    /// Subcategories selectable for the chosen categories, in category order.
    pub fn subcategories_for(&self, category_ids: &BTreeSet<i64>) -> Vec<&Subcategory> {
        self.categories
            .iter()
            .filter(|c| category_ids.contains(&c.id))
            .flat_map(|c| c.subcategories.iter())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::MockApiTransport;
    use common::AppError;
    use mockall::predicate::eq;
    use serde_json::json;

    fn api_with(features: AppResult<serde_json::Value>) -> MockApiTransport {
        let mut api = MockApiTransport::new();
        api.expect_get().with(eq("/api/categories")).returning(|_| {
            Ok(json!({"data": [
                {"id": 1, "name": "Food", "subcategories": [{"id": 10, "name": "Bakery"}]},
                {"id": 2, "name": "Nightlife", "subcategories": [{"id": 20, "name": "Bars"}]}
            ]}))
        });
        let mut features = Some(features);
        api.expect_get()
            .with(eq("/api/features"))
            .returning(move |_| features.take().unwrap_or(Ok(json!([]))));
        api
    }

    #[tokio::test]
    async fn test_load_joins_both_lists() {
        let api = api_with(Ok(json!([{"id": 5, "name": "Wi-Fi"}])));
        let data = ReferenceData::load(&api).await.unwrap();

        assert_eq!(data.categories.len(), 2);
        assert_eq!(data.feature(5).map(|f| f.name.as_str()), Some("Wi-Fi"));

        let names: Vec<_> = data
            .subcategories_for(&BTreeSet::from([2]))
            .into_iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["Bars"]);
    }

    #[tokio::test]
    async fn test_load_fails_when_one_list_fails() {
        let api = api_with(Err(AppError::network("connection reset")));
        assert!(ReferenceData::load(&api).await.is_err());
    }
}
