//! Binding between an entity type and its REST resource.

use domain::{Draft, Entity};

use crate::list::ListSchema;

/// How the backend expects new entities to be created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateRoute {
    /// `POST /api/{resource}/add`
    Add,
    /// `POST /api/{resource}`
    Collection,
}

/// One admin-managed resource. Implementations are zero-sized markers that
/// configure the generic store, list and form for an entity type.
pub trait Resource: Send + Sync + 'static {
    type Entity: Entity;
    type Draft: Draft<Self::Entity>;

    /// Path segment under `/api`, e.g. `places`
    const NAME: &'static str;
    const CREATE_ROUTE: CreateRoute;

    fn schema() -> ListSchema<Self::Entity>;

    fn collection_path() -> String {
        format!("/api/{}", Self::NAME)
    }

    fn create_path() -> String {
        match Self::CREATE_ROUTE {
            CreateRoute::Add => format!("/api/{}/add", Self::NAME),
            CreateRoute::Collection => Self::collection_path(),
        }
    }

    fn item_path(id: &<Self::Entity as Entity>::Id) -> String {
        format!("/api/{}/{}", Self::NAME, id)
    }
}
