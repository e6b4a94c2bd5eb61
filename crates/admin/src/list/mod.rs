//! List screens: schema per entity type and the derivation controller.

mod controller;
mod schema;

pub use controller::{EmptyState, ListController, ListView, SortState};
pub use schema::{
    FilterDimension, KeyAccessor, ListSchema, SearchField, SortDirection, SortKey, SortValue,
    TextAccessor, ValuesAccessor,
};
