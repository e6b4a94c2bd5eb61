use domain::{Category, CategoryDraft};

use crate::list::{ListSchema, SortDirection, SortValue};
use crate::resource::{CreateRoute, Resource};

/// `/api/categories`, subcategories nested inside each category.
pub struct Categories;

impl Resource for Categories {
    type Entity = Category;
    type Draft = CategoryDraft;

    const NAME: &'static str = "categories";
    const CREATE_ROUTE: CreateRoute = CreateRoute::Add;

    fn schema() -> ListSchema<Category> {
        ListSchema::<Category>::new()
            .search("name", |c| c.name.as_str())
            .search("description", |c| c.description.as_str())
            .filter("trending", "Trending", |c| vec![c.is_trending.to_string()])
            .sort("name", |c| SortValue::Text(c.name.clone()))
            .sort("count", |c| SortValue::Number(Some(f64::from(c.count))))
            .sort("subcategories", |c| {
                SortValue::Number(Some(c.subcategories.len() as f64))
            })
            .sort("trending", |c| SortValue::Bool(c.is_trending))
            .default_sort("name", SortDirection::Ascending)
    }
}
