use domain::{User, UserDraft};

use crate::list::{ListSchema, SortDirection, SortValue};
use crate::resource::{CreateRoute, Resource};

/// `/api/users`. Newest accounts first by default.
pub struct Users;

impl Resource for Users {
    type Entity = User;
    type Draft = UserDraft;

    const NAME: &'static str = "users";
    const CREATE_ROUTE: CreateRoute = CreateRoute::Collection;

    fn schema() -> ListSchema<User> {
        ListSchema::<User>::new()
            .search("name", |u| u.name.as_str())
            .search("email", |u| u.email.as_str())
            .filter("role", "Role", |u| vec![u.role.as_str().to_string()])
            .sort("name", |u| SortValue::Text(u.name.clone()))
            .sort("email", |u| SortValue::Text(u.email.clone()))
            .sort("role", |u| SortValue::Text(u.role.as_str().to_string()))
            .sort("createdAt", |u| SortValue::Date(u.created_at))
            .sort("updatedAt", |u| SortValue::Date(u.updated_at))
            .default_sort("createdAt", SortDirection::Descending)
    }
}
