//! Remote store: the client-side copy of one server collection.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use common::{AppError, AppResult};
use domain::Entity;

use crate::clients::{unwrap_envelope, ApiTransport};
use crate::resource::Resource;

type Id<R> = <<R as Resource>::Entity as Entity>::Id;

/// Loading/error state of a store. Loading and error are never set together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStatus {
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Decode a list response, bare or wrapped in `{ "data": [...] }`.
pub fn decode_list<E: DeserializeOwned>(value: Value) -> AppResult<Vec<E>> {
    match unwrap_envelope(value) {
        Value::Null => Ok(Vec::new()),
        list => serde_json::from_value(list).map_err(AppError::from),
    }
}

pub fn decode_one<E: DeserializeOwned>(value: Value) -> AppResult<E> {
    serde_json::from_value(unwrap_envelope(value)).map_err(AppError::from)
}

/// Canonical collection for one resource plus its CRUD operations.
///
/// The collection only changes after the server confirmed a call. A failed
/// call leaves it untouched and records a message in [`StoreStatus::error`].
pub struct RemoteStore<R: Resource> {
    api: Arc<dyn ApiTransport>,
    items: Vec<R::Entity>,
    status: watch::Sender<StoreStatus>,
    unmounted: Option<CancellationToken>,
    _resource: PhantomData<R>,
}

impl<R: Resource> RemoteStore<R> {
    pub fn new(api: Arc<dyn ApiTransport>) -> Self {
        let (status, _) = watch::channel(StoreStatus::default());
        Self {
            api,
            items: Vec::new(),
            status,
            unmounted: None,
            _resource: PhantomData,
        }
    }

    /// Discard responses that resolve after `unmounted` is cancelled.
    pub fn with_unmount_token(mut self, unmounted: CancellationToken) -> Self {
        self.unmounted = Some(unmounted);
        self
    }

    pub fn items(&self) -> &[R::Entity] {
        &self.items
    }

    pub fn get(&self, id: &Id<R>) -> Option<&R::Entity> {
        self.items.iter().find(|e| e.id() == id)
    }

    pub fn status(&self) -> StoreStatus {
        self.status.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.status.borrow().is_loading
    }

    pub fn error(&self) -> Option<String> {
        self.status.borrow().error.clone()
    }

    /// Watch loading/error transitions.
    pub fn subscribe(&self) -> watch::Receiver<StoreStatus> {
        self.status.subscribe()
    }

    pub fn api(&self) -> &Arc<dyn ApiTransport> {
        &self.api
    }

    fn begin(&self) {
        self.status.send_replace(StoreStatus {
            is_loading: true,
            error: None,
        });
    }

    fn finish(&self, error: Option<String>) {
        self.status.send_replace(StoreStatus {
            is_loading: false,
            error,
        });
    }

    /// True when the owning screen is gone. The pending call is settled
    /// quietly so the status never shows a leftover spinner.
    fn discard_if_stale(&self, op: &str) -> bool {
        let stale = self.unmounted.as_ref().is_some_and(CancellationToken::is_cancelled);
        if stale {
            debug!("Dropping {} {} response for an unmounted screen", R::NAME, op);
            self.finish(None);
        }
        stale
    }

    /// Record the outcome of a call, unless the screen is gone.
    fn settle<T>(&self, op: &str, result: AppResult<T>) -> AppResult<T> {
        match &result {
            Ok(_) => self.finish(None),
            Err(e) => {
                warn!("{} {} failed: {}", op, R::NAME, e);
                self.finish(Some(e.user_message()));
            }
        }
        result
    }

    /// Replace the collection with the server's. On failure the previous
    /// collection stays available.
    pub async fn fetch_all(&mut self) -> AppResult<&[R::Entity]> {
        self.begin();
        let result = match self.api.get(&R::collection_path()).await {
            Ok(value) => decode_list::<R::Entity>(value),
            Err(e) => Err(e),
        };

        if self.discard_if_stale("list") {
            return Ok(&self.items);
        }

        let items = self.settle("Fetch", result)?;
        debug!("Fetched {} {}", items.len(), R::NAME);
        self.items = items;
        Ok(&self.items)
    }

    /// Create an entity and append the server's version of it.
    pub async fn create(&mut self, draft: &R::Draft) -> AppResult<R::Entity> {
        self.begin();
        let result = match serde_json::to_value(draft) {
            Ok(body) => match self.api.post(&R::create_path(), body).await {
                Ok(value) => decode_one::<R::Entity>(value),
                Err(e) => Err(e),
            },
            Err(e) => Err(e.into()),
        };

        if self.discard_if_stale("create") {
            return result;
        }

        let created = self.settle("Create", result)?;
        info!("Created {} {}", R::NAME, created.id());
        self.items.push(created.clone());
        Ok(created)
    }

    /// Update an entity and replace it in place with the server's version.
    pub async fn update(&mut self, id: &Id<R>, draft: &R::Draft) -> AppResult<R::Entity> {
        self.begin();
        let result = match serde_json::to_value(draft) {
            Ok(body) => match self.api.put(&R::item_path(id), body).await {
                Ok(value) => decode_one::<R::Entity>(value),
                Err(e) => Err(e),
            },
            Err(e) => Err(e.into()),
        };

        if self.discard_if_stale("update") {
            return result;
        }

        let updated = self.settle("Update", result)?;
        match self.items.iter_mut().find(|e| e.id() == id) {
            Some(slot) => *slot = updated.clone(),
            None => debug!("Updated {} {} is not in the local collection", R::NAME, id),
        }
        info!("Updated {} {}", R::NAME, id);
        Ok(updated)
    }

    /// Delete an entity. An id the server no longer knows counts as deleted.
    pub async fn remove(&mut self, id: &Id<R>) -> AppResult<()> {
        self.begin();
        let result = match self.api.delete(&R::item_path(id)).await {
            Ok(_) => Ok(()),
            Err(e) if e.is_not_found() => {
                debug!("{} {} was already deleted", R::NAME, id);
                Ok(())
            }
            Err(e) => Err(e),
        };

        if self.discard_if_stale("delete") {
            return result;
        }

        self.settle("Delete", result)?;
        self.items.retain(|e| e.id() != id);
        info!("Deleted {} {}", R::NAME, id);
        Ok(())
    }
}
