//! Traits shared by every managed entity and its form draft.

use std::fmt::{Debug, Display};

use serde::{de::DeserializeOwned, Serialize};

use crate::validation::FieldErrors;

/// An entity owned by the backend and mirrored in a client-side collection.
pub trait Entity: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    type Id: Clone + PartialEq + Display + Debug + Send + Sync + 'static;

    fn id(&self) -> &Self::Id;
}

/// Whether a draft is creating a new entity or editing an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftMode {
    Create,
    Edit,
}

/// Unsaved, in-memory copy of an entity being edited by a form.
///
/// `Default` is the "Add" template. `from_entity` seeds an "Edit" draft by
/// value so edits never touch the stored entity.
pub trait Draft<E: Entity>: Clone + Default + Debug + Serialize + Send + Sync + 'static {
    fn from_entity(entity: &E) -> Self;

    /// Synchronous client-side validation.
    fn check(&self, mode: DraftMode) -> Result<(), FieldErrors>;

    /// Release local-only resources (image previews). Called on cancel and
    /// after a successful save.
    fn release_transient(&mut self) {}
}
