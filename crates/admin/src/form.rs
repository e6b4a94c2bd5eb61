//! Form controller: a draft of one entity, independent of the store until
//! it is submitted.

use tracing::{debug, warn};

use common::{AppError, AppResult};
use domain::{Draft, DraftMode, Entity, FieldErrors};

use crate::resource::Resource;
use crate::store::RemoteStore;

type Id<R> = <<R as Resource>::Entity as Entity>::Id;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Closed,
    Drafting,
    Submitting,
}

pub struct FormController<R: Resource> {
    phase: FormPhase,
    mode: DraftMode,
    /// Entity being edited; `None` in create mode
    target: Option<Id<R>>,
    draft: R::Draft,
    field_errors: FieldErrors,
    error: Option<String>,
}

impl<R: Resource> FormController<R> {
    pub fn new() -> Self {
        Self {
            phase: FormPhase::Closed,
            mode: DraftMode::Create,
            target: None,
            draft: R::Draft::default(),
            field_errors: FieldErrors::new(),
            error: None,
        }
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase != FormPhase::Closed
    }

    pub fn mode(&self) -> DraftMode {
        self.mode
    }

    pub fn target(&self) -> Option<&Id<R>> {
        self.target.as_ref()
    }

    pub fn draft(&self) -> &R::Draft {
        &self.draft
    }

    /// Mutable draft while the user is editing. `None` when the form is
    /// closed or a submit is in flight.
    pub fn draft_mut(&mut self) -> Option<&mut R::Draft> {
        match self.phase {
            FormPhase::Drafting => Some(&mut self.draft),
            _ => None,
        }
    }

    /// Draft access for a pre-submit stage (image uploads) that runs after
    /// validation and before the store call.
    pub(crate) fn submitting_draft_mut(&mut self) -> Option<&mut R::Draft> {
        match self.phase {
            FormPhase::Submitting => Some(&mut self.draft),
            _ => None,
        }
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Open with the "Add" template.
    pub fn open_add(&mut self) {
        self.open(DraftMode::Create, None, R::Draft::default());
    }

    /// Open seeded from a copy of `entity`.
    pub fn open_edit(&mut self, entity: &R::Entity) {
        self.open(
            DraftMode::Edit,
            Some(entity.id().clone()),
            R::Draft::from_entity(entity),
        );
    }

    fn open(&mut self, mode: DraftMode, target: Option<Id<R>>, draft: R::Draft) {
        if self.is_open() {
            self.draft.release_transient();
        }
        self.phase = FormPhase::Drafting;
        self.mode = mode;
        self.target = target;
        self.draft = draft;
        self.field_errors = FieldErrors::new();
        self.error = None;
    }

    /// Run client-side validation, recording per-field errors.
    pub fn validate(&mut self) -> bool {
        match self.draft.check(self.mode) {
            Ok(()) => {
                self.field_errors = FieldErrors::new();
                true
            }
            Err(errors) => {
                debug!("{} form invalid: {}", R::NAME, errors);
                self.field_errors = errors;
                false
            }
        }
    }

    /// Validate and move to `Submitting`. Invalid drafts stay in `Drafting`.
    pub fn begin_submit(&mut self) -> AppResult<()> {
        match self.phase {
            FormPhase::Drafting => {}
            FormPhase::Closed => return Err(AppError::validation("The form is not open")),
            FormPhase::Submitting => {
                return Err(AppError::validation("A save is already in progress"))
            }
        }
        self.error = None;
        if !self.validate() {
            return Err(AppError::InvalidFields(self.field_errors.clone()));
        }
        self.phase = FormPhase::Submitting;
        Ok(())
    }

    /// Send the validated draft through the store. Success closes the form;
    /// failure returns to `Drafting` with the draft intact.
    pub async fn commit(&mut self, store: &mut RemoteStore<R>) -> AppResult<R::Entity> {
        if self.phase != FormPhase::Submitting {
            return Err(AppError::validation("The form has not been validated"));
        }

        let result = match &self.target {
            Some(id) => store.update(id, &self.draft).await,
            None => store.create(&self.draft).await,
        };

        match result {
            Ok(saved) => {
                self.close();
                Ok(saved)
            }
            Err(e) => {
                warn!("Saving {} failed: {}", R::NAME, e);
                self.phase = FormPhase::Drafting;
                self.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// Validate, then save through the store.
    pub async fn submit(&mut self, store: &mut RemoteStore<R>) -> AppResult<R::Entity> {
        self.begin_submit()?;
        self.commit(store).await
    }

    /// Discard the draft and release local-only data.
    pub fn cancel(&mut self) {
        if self.is_open() {
            debug!("{} form cancelled", R::NAME);
        }
        self.close();
    }

    fn close(&mut self) {
        self.draft.release_transient();
        self.phase = FormPhase::Closed;
        self.target = None;
        self.draft = R::Draft::default();
        self.field_errors = FieldErrors::new();
        self.error = None;
    }
}

impl<R: Resource> Default for FormController<R> {
    fn default() -> Self {
        Self::new()
    }
}
