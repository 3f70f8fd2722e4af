//! Local copy of one resource collection plus its loading state.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, warn};

use crate::api::{ApiTransport, ResourceClient};
use crate::entity::Resource;
use crate::error::{FolioError, Result};

/// What happened to the result of a [`DataCache::load`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The fetched collection replaced the cached one.
    Applied { count: usize },
    /// The fetch failed; the previous collection is kept.
    Failed { message: String },
    /// A later load was issued before this one resolved.
    Superseded,
    /// The cache was detached before this load resolved.
    Detached,
}

impl LoadOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, LoadOutcome::Applied { .. })
    }
}

struct CacheState<R> {
    items: Arc<Vec<R>>,
    is_loading: bool,
    error: Option<String>,
    version: u64,
    detached: bool,
}

/// Authoritative local copy of a collection.
///
/// Loads are guarded by a monotonically increasing request token: only the
/// result of the most recently issued load is applied, whatever order the
/// responses arrive in. Mutations reconcile the local copy from the response
/// and fall back to a full reload when the response carries no record.
pub struct DataCache<R, T> {
    client: ResourceClient<R, T>,
    state: Mutex<CacheState<R>>,
    latest_token: AtomicU64,
}

impl<R: Resource, T: ApiTransport> DataCache<R, T> {
    pub fn new(client: ResourceClient<R, T>) -> Self {
        Self {
            client,
            state: Mutex::new(CacheState {
                items: Arc::new(Vec::new()),
                is_loading: false,
                error: None,
                version: 0,
                detached: false,
            }),
            latest_token: AtomicU64::new(0),
        }
    }

    pub fn client(&self) -> &ResourceClient<R, T> {
        &self.client
    }

    /// Current collection snapshot.
    pub fn items(&self) -> Arc<Vec<R>> {
        Arc::clone(&self.state.lock().items)
    }

    /// Collection snapshot together with the version it belongs to.
    pub fn versioned_items(&self) -> (u64, Arc<Vec<R>>) {
        let state = self.state.lock();
        (state.version, Arc::clone(&state.items))
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().is_loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.lock().error.clone()
    }

    /// Bumped on every observable change of the collection or its status.
    pub fn version(&self) -> u64 {
        self.state.lock().version
    }

    pub fn is_detached(&self) -> bool {
        self.state.lock().detached
    }

    /// Stop applying results. Requests already in flight still complete but
    /// their outcome is dropped.
    pub fn detach(&self) {
        let mut state = self.state.lock();
        state.detached = true;
        state.is_loading = false;
    }

    /// Fetch the full collection and replace the cached one.
    pub async fn load(&self) -> LoadOutcome {
        let token = {
            let mut state = self.state.lock();
            if state.detached {
                return LoadOutcome::Detached;
            }
            let token = self.latest_token.fetch_add(1, Ordering::SeqCst) + 1;
            if !state.is_loading {
                state.is_loading = true;
                state.version += 1;
            }
            token
        };

        let guard = LoadGuard {
            cache: self,
            token,
            armed: true,
        };
        let result = self.client.list().await;
        guard.disarm();

        let mut state = self.state.lock();
        if state.detached {
            debug!(resource = R::PATH, token, "dropping load result after detach");
            return LoadOutcome::Detached;
        }
        if self.latest_token.load(Ordering::SeqCst) != token {
            debug!(resource = R::PATH, token, "dropping superseded load result");
            return LoadOutcome::Superseded;
        }

        state.is_loading = false;
        state.version += 1;
        match result {
            Ok(items) => {
                let items = dedup_by_id(items);
                let count = items.len();
                state.items = Arc::new(items);
                state.error = None;
                debug!(resource = R::PATH, count, "loaded collection");
                LoadOutcome::Applied { count }
            }
            Err(err) => {
                let message = err.into_fetch(R::PATH).to_string();
                warn!(resource = R::PATH, error = %message, "load failed");
                state.error = Some(message.clone());
                LoadOutcome::Failed { message }
            }
        }
    }

    /// Create a record and append it locally.
    ///
    /// Returns the created record, or `None` when the response did not carry
    /// one and the collection was reloaded instead.
    pub async fn create(&self, draft: &R::Draft) -> Result<Option<R>> {
        let created = self
            .client
            .create(draft)
            .await
            .map_err(|e| mutation_failed::<R>(e, "create"))?;

        match created {
            Some(entity) => {
                self.reconcile("create", |items| upsert(items, entity.clone()));
                Ok(Some(entity))
            }
            None => {
                self.load().await;
                Ok(None)
            }
        }
    }

    /// Apply a partial update and splice the result into the collection.
    ///
    /// Falls back to a reload when the response carries no full record. The
    /// returned record is placed by its own id: an id missing from the local
    /// collection is appended, and a record answered under a different id
    /// replaces the requested one.
    pub async fn update(&self, id: &str, patch: Value) -> Result<Option<R>> {
        let updated = self
            .client
            .update(id, patch)
            .await
            .map_err(|e| mutation_failed::<R>(e, "update"))?;

        match updated {
            Some(entity) => {
                if entity.id() != id {
                    warn!(
                        resource = R::PATH,
                        requested = id,
                        returned = entity.id(),
                        "update returned a different id"
                    );
                }
                self.reconcile("update", |items| {
                    if entity.id() != id {
                        items.retain(|item| item.id() != id);
                    }
                    upsert(items, entity.clone());
                });
                Ok(Some(entity))
            }
            None => {
                debug!(resource = R::PATH, id, "update response had no record, reloading");
                self.load().await;
                Ok(None)
            }
        }
    }

    /// Delete a record and drop it locally.
    pub async fn remove(&self, id: &str) -> Result<()> {
        self.client
            .delete(id)
            .await
            .map_err(|e| mutation_failed::<R>(e, "delete"))?;
        self.reconcile("delete", |items| items.retain(|item| item.id() != id));
        Ok(())
    }

    fn reconcile(&self, operation: &str, patch: impl FnOnce(&mut Vec<R>)) {
        let mut state = self.state.lock();
        if state.detached {
            debug!(resource = R::PATH, operation, "dropping mutation result after detach");
            return;
        }
        patch(Arc::make_mut(&mut state.items));
        state.version += 1;
        debug!(
            resource = R::PATH,
            operation,
            count = state.items.len(),
            "reconciled collection"
        );
    }
}

/// Clears the loading state of a load whose future is dropped before its
/// response arrives, as happens under `tokio::time::timeout` or `select!`.
struct LoadGuard<'a, R: Resource, T> {
    cache: &'a DataCache<R, T>,
    token: u64,
    armed: bool,
}

impl<R: Resource, T> LoadGuard<'_, R, T> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl<R: Resource, T> Drop for LoadGuard<'_, R, T> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = self.cache.state.lock();
        if state.detached || self.cache.latest_token.load(Ordering::SeqCst) != self.token {
            return;
        }
        state.is_loading = false;
        state.version += 1;
        let message = FolioError::Fetch {
            resource: R::PATH.to_string(),
            message: "request was cancelled".to_string(),
        }
        .to_string();
        warn!(resource = R::PATH, token = self.token, "load cancelled");
        state.error = Some(message);
    }
}

fn mutation_failed<R: Resource>(err: FolioError, operation: &'static str) -> FolioError {
    let err = err.into_mutation(R::PATH, operation);
    warn!(resource = R::PATH, operation, error = %err, "mutation failed");
    err
}

/// Replace the record with the same id, or append it.
fn upsert<R: Resource>(items: &mut Vec<R>, entity: R) {
    match items.iter().position(|item| item.id() == entity.id()) {
        Some(index) => items[index] = entity,
        None => items.push(entity),
    }
}

/// Keep the first occurrence of every id.
fn dedup_by_id<R: Resource>(items: Vec<R>) -> Vec<R> {
    let mut seen = HashSet::with_capacity(items.len());
    let before = items.len();
    let items: Vec<R> = items
        .into_iter()
        .filter(|item| seen.insert(item.id().to_string()))
        .collect();
    if items.len() != before {
        warn!(
            resource = R::PATH,
            dropped = before - items.len(),
            "collection contained duplicate ids"
        );
    }
    items
}
