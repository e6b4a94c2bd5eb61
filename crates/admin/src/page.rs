//! One admin screen: store, list view, form, delete confirmation and
//! debounced search wired together for a resource.

use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use common::{AppResult, ClientConfig, OptionExt};
use domain::Entity;

use crate::clients::ApiTransport;
use crate::debounce::Debouncer;
use crate::form::FormController;
use crate::list::{ListController, ListView};
use crate::resource::Resource;
use crate::store::RemoteStore;

type Id<R> = <<R as Resource>::Entity as Entity>::Id;

pub struct AdminPage<R: Resource> {
    store: RemoteStore<R>,
    list: ListController<R::Entity>,
    form: FormController<R>,
    pending_delete: Option<Id<R>>,
    search: Debouncer<String>,
    settled_search: watch::Receiver<Option<String>>,
    unmounted: CancellationToken,
}

impl<R: Resource> AdminPage<R> {
    /// Mount a screen. Must be called inside a tokio runtime.
    pub fn new(api: Arc<dyn ApiTransport>, config: &ClientConfig) -> Self {
        let unmounted = CancellationToken::new();
        let search = Debouncer::new(config.search_debounce());
        let settled_search = search.subscribe();
        Self {
            store: RemoteStore::new(api).with_unmount_token(unmounted.clone()),
            list: ListController::new(R::schema(), config.page_size),
            form: FormController::new(),
            pending_delete: None,
            search,
            settled_search,
            unmounted,
        }
    }

    pub fn store(&self) -> &RemoteStore<R> {
        &self.store
    }

    pub fn list(&self) -> &ListController<R::Entity> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut ListController<R::Entity> {
        &mut self.list
    }

    pub fn form(&self) -> &FormController<R> {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormController<R> {
        &mut self.form
    }

    /// Store and form borrowed together, for flows that save through both.
    pub fn split_mut(&mut self) -> (&mut RemoteStore<R>, &mut FormController<R>) {
        (&mut self.store, &mut self.form)
    }

    /// Handle for whoever owns the screen. Cancelling it while a call is in
    /// flight makes the store drop that call's response. The page is mutably
    /// borrowed for the whole call, so it cannot do this itself.
    pub fn unmount_token(&self) -> CancellationToken {
        self.unmounted.clone()
    }

    pub async fn load(&mut self) -> AppResult<usize> {
        Ok(self.store.fetch_all().await?.len())
    }

    /// Rows for the current query over the store's collection.
    pub fn view(&mut self) -> ListView<'_, R::Entity> {
        self.list.derive(self.store.items())
    }

    /// Feed a keystroke into the debounced search box.
    pub fn type_search(&self, text: impl Into<String>) {
        self.search.push(text.into());
    }

    /// Apply a search term that settled since the last call.
    pub fn apply_settled_search(&mut self) -> bool {
        if !self.settled_search.has_changed().unwrap_or(false) {
            return false;
        }
        self.take_settled_search()
    }

    /// Wait until the search input settles, then apply it.
    pub async fn next_search(&mut self) -> bool {
        if self.settled_search.changed().await.is_err() {
            return false;
        }
        self.take_settled_search()
    }

    fn take_settled_search(&mut self) -> bool {
        let term = self.settled_search.borrow_and_update().clone();
        match term {
            Some(term) => {
                debug!("Search on {} settled: {:?}", R::NAME, term);
                self.list.set_search(term);
                true
            }
            None => false,
        }
    }

    pub fn open_add(&mut self) {
        self.form.open_add();
    }

    pub fn open_edit(&mut self, id: &Id<R>) -> AppResult<()> {
        let entity = self.store.get(id).ok_or_not_found()?;
        self.form.open_edit(entity);
        Ok(())
    }

    pub async fn save(&mut self) -> AppResult<R::Entity> {
        self.form.submit(&mut self.store).await
    }

    pub fn cancel_form(&mut self) {
        self.form.cancel();
    }

    /// Ask for confirmation before deleting `id`. Returns false when the id is
    /// no longer in the collection: it is already deleted and nothing is
    /// queued.
    pub fn request_delete(&mut self, id: &Id<R>) -> bool {
        if self.store.get(id).is_none() {
            debug!("{} {} already removed, nothing to delete", R::NAME, id);
            self.pending_delete = None;
            return false;
        }
        self.pending_delete = Some(id.clone());
        true
    }

    pub fn pending_delete(&self) -> Option<&Id<R>> {
        self.pending_delete.as_ref()
    }

    /// Dismiss the confirmation. No request is made.
    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Delete the entity awaiting confirmation. The row disappears only once
    /// the server confirmed.
    pub async fn confirm_delete(&mut self) -> AppResult<bool> {
        let Some(id) = self.pending_delete.take() else {
            return Ok(false);
        };
        self.store.remove(&id).await?;
        Ok(true)
    }
}
