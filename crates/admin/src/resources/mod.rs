//! Concrete admin resources.

mod categories;
mod features;
mod places;
mod users;

pub use categories::Categories;
pub use features::Features;
pub use places::{PlaceEditor, Places};
pub use users::Users;
