use domain::{Feature, FeatureDraft};

use crate::list::{ListSchema, SortDirection, SortValue};
use crate::resource::{CreateRoute, Resource};

pub struct Features;

impl Resource for Features {
    type Entity = Feature;
    type Draft = FeatureDraft;

    const NAME: &'static str = "features";
    const CREATE_ROUTE: CreateRoute = CreateRoute::Collection;

    fn schema() -> ListSchema<Feature> {
        ListSchema::<Feature>::new()
            .search("name", |f| f.name.as_str())
            .sort("name", |f| SortValue::Text(f.name.clone()))
            .sort("id", |f| SortValue::Number(Some(f.id as f64)))
            .default_sort("name", SortDirection::Ascending)
    }
}
