//! WhereToGo admin - typed client for managing categories, places,
//! features and users through the backend REST API.
//!
//! A screen is an [`AdminPage`]: a [`RemoteStore`] holding the server
//! collection, a [`ListController`] deriving the visible rows and a
//! [`FormController`] owning the draft being edited.

pub mod cli;
pub mod clients;
pub mod commands;
pub mod debounce;
pub mod form;
pub mod images;
pub mod list;
pub mod page;
pub mod reference;
pub mod resource;
pub mod resources;
pub mod store;

pub use clients::{ApiTransport, HttpImageHost, HttpTransport, ImageHost, ProfileClient};
pub use debounce::Debouncer;
pub use form::{FormController, FormPhase};
pub use list::{EmptyState, ListController, ListSchema, ListView, SortDirection, SortValue};
pub use page::AdminPage;
pub use reference::ReferenceData;
pub use resource::{CreateRoute, Resource};
pub use resources::{Categories, Features, PlaceEditor, Places, Users};
pub use store::{RemoteStore, StoreStatus};
