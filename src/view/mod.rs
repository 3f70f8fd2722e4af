//! The list-view controller.
//!
//! A [`ListView`] composes a [`DataCache`], a [`FilterPipeline`] and a
//! [`Paginator`] for one resource. Derived fields (visible subset, current
//! page) are recomputed lazily on read whenever the cache version or a filter
//! changed, so commands stay cheap and reads are always consistent.

mod snapshot;

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, MutexGuard};
use serde_json::Value;
use tracing::debug;

use crate::api::{ApiTransport, ResourceClient};
use crate::cache::{DataCache, LoadOutcome};
use crate::config::Config;
use crate::domain::{Preset, ResourceKind};
use crate::entity::Resource;
use crate::error::Result;
use crate::filter::{FilterPipeline, FilterValue};
use crate::pagination::Paginator;

pub use snapshot::ListSnapshot;

pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(250);

struct ViewState<R> {
    pipeline: FilterPipeline<R>,
    paginator: Paginator,
    items: Arc<Vec<R>>,
    visible: Vec<usize>,
    seen_version: Option<u64>,
    dirty: bool,
    search_input: String,
    search_generation: u64,
}

impl<R> ViewState<R> {
    fn visible_items(&self) -> Vec<R>
    where
        R: Clone,
    {
        self.visible.iter().map(|&i| self.items[i].clone()).collect()
    }

    fn page_items(&self) -> Vec<R>
    where
        R: Clone,
    {
        self.paginator
            .current_slice(&self.visible)
            .iter()
            .map(|&i| self.items[i].clone())
            .collect()
    }

    /// Invalidate any pending debounced search.
    fn cancel_pending_search(&mut self) {
        self.search_generation += 1;
    }
}

/// Fetch, filter and paginate one resource collection.
pub struct ListView<R, T> {
    cache: DataCache<R, T>,
    state: Mutex<ViewState<R>>,
    debounce: Duration,
}

impl<R: Resource, T: ApiTransport> ListView<R, T> {
    pub fn new(client: ResourceClient<R, T>, pipeline: FilterPipeline<R>, page_size: usize) -> Self {
        Self {
            cache: DataCache::new(client),
            state: Mutex::new(ViewState {
                pipeline,
                paginator: Paginator::new(page_size),
                items: Arc::new(Vec::new()),
                visible: Vec::new(),
                seen_version: None,
                dirty: true,
                search_input: String::new(),
                search_generation: 0,
            }),
            debounce: DEFAULT_SEARCH_DEBOUNCE,
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// A view using the resource's preset pipeline and the configured page
    /// size, API prefix and debounce.
    pub fn for_resource(transport: Arc<T>, kind: ResourceKind, config: &Config) -> Self
    where
        R: Preset,
    {
        let client = ResourceClient::new(transport, &config.api.prefix);
        Self::new(client, R::pipeline(), config.page_size_for(kind))
            .with_debounce(config.search_debounce())
    }

    pub fn cache(&self) -> &DataCache<R, T> {
        &self.cache
    }

    /// Lock the view state, recomputing derived fields if anything changed.
    fn derived(&self) -> MutexGuard<'_, ViewState<R>> {
        let mut state = self.state.lock();
        let (version, items) = self.cache.versioned_items();
        if state.dirty || state.seen_version != Some(version) {
            state.visible = state.pipeline.visible_indices(&items);
            state.items = items;
            state.seen_version = Some(version);
            state.dirty = false;
            let len = state.visible.len();
            if state.paginator.sync(len) {
                debug!(
                    resource = R::PATH,
                    page = state.paginator.current_page(),
                    "clamped current page"
                );
            }
        }
        state
    }

    // Reactive fields

    pub fn items(&self) -> Arc<Vec<R>> {
        self.cache.items()
    }

    pub fn is_loading(&self) -> bool {
        self.cache.is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.cache.error()
    }

    pub fn visible_items(&self) -> Vec<R> {
        self.derived().visible_items()
    }

    pub fn visible_count(&self) -> usize {
        self.derived().visible.len()
    }

    pub fn current_page_items(&self) -> Vec<R> {
        self.derived().page_items()
    }

    pub fn current_page(&self) -> usize {
        self.derived().paginator.current_page()
    }

    pub fn total_pages(&self) -> usize {
        self.derived().paginator.total_pages()
    }

    pub fn page_size(&self) -> usize {
        self.state.lock().paginator.page_size()
    }

    pub fn has_next_page(&self) -> bool {
        self.derived().paginator.has_next()
    }

    pub fn has_previous_page(&self) -> bool {
        self.derived().paginator.has_previous()
    }

    /// Text typed into the search box, applied or not.
    pub fn search_input(&self) -> String {
        self.state.lock().search_input.clone()
    }

    pub fn filter_value(&self, name: &str) -> Option<FilterValue> {
        self.state.lock().pipeline.criterion(name).map(|c| c.value())
    }

    pub fn filter_names(&self) -> Vec<String> {
        self.state
            .lock()
            .pipeline
            .criteria()
            .iter()
            .map(|c| c.name().to_string())
            .collect()
    }

    /// Every reactive field, read consistently.
    pub fn snapshot(&self) -> ListSnapshot<R> {
        let state = self.derived();
        ListSnapshot {
            items: Arc::clone(&state.items),
            visible_count: state.visible.len(),
            page_items: state.page_items(),
            current_page: state.paginator.current_page(),
            total_pages: state.paginator.total_pages(),
            page_size: state.paginator.page_size(),
            filters: state
                .pipeline
                .criteria()
                .iter()
                .map(|c| (c.name().to_string(), c.value()))
                .collect(),
            search_input: state.search_input.clone(),
            is_loading: self.cache.is_loading(),
            error: self.cache.error(),
        }
    }

    // Filter commands

    pub fn set_filter(&self, name: &str, value: FilterValue) -> Result<()> {
        let mut state = self.state.lock();
        state.pipeline.set(name, value.clone())?;
        if state.pipeline.search_name() == Some(name)
            && let FilterValue::Text(text) = value
        {
            state.search_input = text;
            state.cancel_pending_search();
        }
        state.dirty = true;
        Ok(())
    }

    /// Set a filter from user input, parsed according to the filter's kind.
    pub fn set_filter_str(&self, name: &str, raw: &str) -> Result<()> {
        let mut state = self.state.lock();
        state.pipeline.set_from_str(name, raw)?;
        if state.pipeline.search_name() == Some(name) {
            state.search_input = raw.to_string();
            state.cancel_pending_search();
        }
        state.dirty = true;
        Ok(())
    }

    pub fn reset_filters(&self) {
        let mut state = self.state.lock();
        state.pipeline.reset();
        state.search_input.clear();
        state.cancel_pending_search();
        state.dirty = true;
    }

    /// Record typed search text and apply it once typing pauses.
    ///
    /// Returns true when this call's text was applied, false when a newer
    /// keystroke (or an explicit filter change) superseded it, the view has
    /// no search criterion, or the view is detached.
    pub async fn type_search(&self, text: &str) -> bool {
        if self.cache.is_detached() {
            debug!(resource = R::PATH, "ignoring search input after detach");
            return false;
        }
        let (generation, name) = {
            let mut state = self.state.lock();
            state.search_input = text.to_string();
            state.cancel_pending_search();
            let name = state.pipeline.search_name().map(str::to_string);
            (state.search_generation, name)
        };
        let Some(name) = name else {
            return false;
        };

        if !self.debounce.is_zero() {
            tokio::time::sleep(self.debounce).await;
        }

        let mut state = self.state.lock();
        if state.search_generation != generation {
            return false;
        }
        if state
            .pipeline
            .set(&name, FilterValue::Text(text.to_string()))
            .is_err()
        {
            return false;
        }
        state.dirty = true;
        debug!(resource = R::PATH, query = text, "applied search");
        true
    }

    // Pagination commands

    pub fn go_to_page(&self, page: i64) -> usize {
        self.derived().paginator.go_to(page)
    }

    pub fn next_page(&self) -> usize {
        self.derived().paginator.next()
    }

    pub fn previous_page(&self) -> usize {
        self.derived().paginator.previous()
    }

    pub fn set_page_size(&self, page_size: usize) {
        let mut state = self.derived();
        state.paginator.set_page_size(page_size);
        let len = state.visible.len();
        state.paginator.sync(len);
    }

    // Data commands

    pub async fn refresh(&self) -> LoadOutcome {
        self.cache.load().await
    }

    pub async fn create_item(&self, draft: &R::Draft) -> Result<Option<R>> {
        self.cache.create(draft).await
    }

    pub async fn update_item(&self, id: &str, patch: Value) -> Result<Option<R>> {
        self.cache.update(id, patch).await
    }

    pub async fn delete_item(&self, id: &str) -> Result<()> {
        self.cache.remove(id).await
    }

    /// The owning screen went away: drop pending results and searches.
    pub fn detach(&self) {
        self.cache.detach();
        self.state.lock().cancel_pending_search();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockTransport;
    use crate::domain::Post;
    use crate::filter::Selection;
    use reqwest::Method;
    use serde_json::json;

    fn posts(n: usize) -> Value {
        Value::Array(
            (1..=n)
                .map(|i| {
                    json!({
                        "id": i.to_string(),
                        "title": format!("Post {i}"),
                        "status": if i % 2 == 0 { "DRAFT" } else { "PUBLISHED" },
                        "featured": i % 5 == 0,
                    })
                })
                .collect(),
        )
    }

    async fn view(n: usize) -> (Arc<MockTransport>, ListView<Post, MockTransport>) {
        let mock = Arc::new(MockTransport::new());
        mock.respond_json(Method::GET, "/api/posts", posts(n));
        let view = ListView::for_resource(Arc::clone(&mock), ResourceKind::Posts, &Config::default());
        assert!(view.refresh().await.is_applied());
        (mock, view)
    }

    #[tokio::test]
    async fn test_initial_view_shows_first_page() {
        let (_mock, view) = view(20).await;
        assert_eq!(view.page_size(), 9);
        assert_eq!(view.visible_count(), 20);
        assert_eq!(view.total_pages(), 3);
        assert_eq!(view.current_page(), 1);
        assert_eq!(view.current_page_items().len(), 9);
    }

    #[tokio::test]
    async fn test_filter_change_clamps_page() {
        let (_mock, view) = view(20).await;
        view.go_to_page(3);
        view.set_filter("featured", FilterValue::Flag(true.into()))
            .unwrap();
        assert_eq!(view.visible_count(), 4);
        assert_eq!(view.current_page(), 1);
        assert_eq!(view.total_pages(), 1);
    }

    #[tokio::test]
    async fn test_set_filter_unknown_name_is_error() {
        let (_mock, view) = view(3).await;
        assert!(view.set_filter_str("author", "me").is_err());
        assert!(view
            .set_filter("status", FilterValue::Choice(Selection::Only("draft".into())))
            .is_ok());
        assert_eq!(view.visible_count(), 1);
    }

    #[tokio::test]
    async fn test_delete_reconciles_visible_set() {
        let (mock, view) = view(10).await;
        mock.respond(
            Method::DELETE,
            "/api/posts/10",
            crate::api::ApiResponse::no_content(),
        );
        view.go_to_page(2);
        assert_eq!(view.current_page_items().len(), 1);

        view.delete_item("10").await.unwrap();
        assert_eq!(view.visible_count(), 9);
        assert_eq!(view.current_page(), 1);
        assert_eq!(view.total_pages(), 1);
        assert!(view.items().iter().all(|p| p.id != "10"));
        assert!(view.current_page_items().iter().all(|p| p.id != "10"));
        assert!(view.visible_items().iter().all(|p| p.id != "10"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_type_search_ignored_after_detach() {
        let (_mock, view) = view(12).await;
        view.detach();

        assert!(!view.type_search("Post 1").await);
        assert_eq!(view.search_input(), "");
        assert_eq!(view.filter_value("search"), Some(FilterValue::Text(String::new())));
        assert_eq!(view.visible_count(), 12);
    }

    #[tokio::test]
    async fn test_set_page_size_resets_page() {
        let (_mock, view) = view(20).await;
        view.next_page();
        view.set_page_size(5);
        assert_eq!(view.current_page(), 1);
        assert_eq!(view.total_pages(), 4);
        assert_eq!(view.previous_page(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_type_search_applies_only_last_keystroke() {
        let (_mock, view) = view(12).await;
        let (first, second) = tokio::join!(view.type_search("Post 1"), async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            view.type_search("Post 12").await
        });
        assert!(!first);
        assert!(second);
        assert_eq!(view.search_input(), "Post 12");
        assert_eq!(view.visible_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_input_updates_before_debounce_fires() {
        let (_mock, view) = view(12).await;
        let (applied, ()) = tokio::join!(view.type_search("Post 1"), async {
            tokio::task::yield_now().await;
            assert_eq!(view.search_input(), "Post 1");
            assert_eq!(view.visible_count(), 12);
        });
        assert!(applied);
        // "Post 1", "Post 10", "Post 11", "Post 12"
        assert_eq!(view.visible_count(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_detach_drops_pending_search() {
        let (_mock, view) = view(12).await;
        let (applied, ()) = tokio::join!(view.type_search("Post 1"), async {
            view.detach();
        });
        assert!(!applied);
        assert_eq!(view.visible_count(), 12);
    }

    #[tokio::test]
    async fn test_zero_debounce_applies_immediately() {
        let (_mock, view) = view(12).await;
        let view = view.with_debounce(Duration::ZERO);
        assert!(view.type_search("post 3").await);
        assert_eq!(view.visible_count(), 1);
    }

    #[tokio::test]
    async fn test_reset_filters_restores_everything() {
        let (_mock, view) = view(12).await;
        view.set_filter_str("search", "Post 1").unwrap();
        view.set_filter_str("status", "published").unwrap();
        assert_eq!(view.search_input(), "Post 1");
        view.reset_filters();
        assert_eq!(view.search_input(), "");
        assert_eq!(view.visible_count(), 12);
        assert_eq!(view.filter_value("status"), Some(FilterValue::Choice(Selection::All)));
    }

    #[tokio::test]
    async fn test_snapshot_is_consistent() {
        let (_mock, view) = view(12).await;
        view.next_page();
        let snap = view.snapshot();
        assert_eq!(snap.items.len(), 12);
        assert_eq!(snap.visible_count, 12);
        assert_eq!(snap.current_page, 2);
        assert_eq!(snap.page_items.len(), 3);
        assert!(!snap.is_loading);
        assert!(snap.error.is_none());
        assert_eq!(snap.filters.len(), 6);
    }
}
