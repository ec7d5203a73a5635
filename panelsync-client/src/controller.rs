//! One controller per list screen.
//!
//! [`ListViewController`] owns the filter state and the selection of a single
//! table and routes every read and write through the two dispatchers, so the
//! rendered rows only ever change from an admitted snapshot or a confirmed
//! mutation.

use std::sync::Arc;
use std::time::Duration;

use panelsync_core::config::MIN_DEBOUNCE_MS;
use panelsync_core::ClientConfig;
use panelsync_protocol::entity::EntityDescriptor;
use panelsync_protocol::mutation::MutationRequest;
use panelsync_protocol::query::{ListQuery, QueryPatch, SortKey};
use panelsync_protocol::record::RecordId;
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::debounce::Debouncer;
use crate::error::ClientError;
use crate::filter::FilterState;
use crate::form::EntityForm;
use crate::mutation::{AutoConfirm, Confirmer, MutationDispatcher, MutationResult};
use crate::notify::{Notifier, TracingNotifier};
use crate::query::{QueryDispatcher, QueryOutcome};
use crate::selection::SelectionTracker;
use crate::transport::ListTransport;
use crate::view::{ListView, SelectionControls, SharedView};

const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

fn clamp_debounce(delay: Duration) -> Duration {
    delay.max(Duration::from_millis(MIN_DEBOUNCE_MS))
}

pub struct ControllerBuilder {
    entity: EntityDescriptor,
    transport: Arc<dyn ListTransport>,
    notifier: Arc<dyn Notifier>,
    confirmer: Arc<dyn Confirmer>,
    debounce: Duration,
    initial_query: ListQuery,
}

impl ControllerBuilder {
    /// Destructive requests are declined unless a confirmer is supplied.
    pub fn new(entity: EntityDescriptor, transport: Arc<dyn ListTransport>) -> Self {
        Self {
            entity,
            transport,
            notifier: Arc::new(TracingNotifier),
            confirmer: Arc::new(AutoConfirm::deny()),
            debounce: DEFAULT_DEBOUNCE,
            initial_query: ListQuery::default(),
        }
    }

    pub fn config(mut self, config: &ClientConfig) -> Self {
        self.debounce = clamp_debounce(config.search_debounce);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn confirmer(mut self, confirmer: Arc<dyn Confirmer>) -> Self {
        self.confirmer = confirmer;
        self
    }

    /// Delays below the minimum search debounce are raised to it.
    pub fn debounce(mut self, delay: Duration) -> Self {
        self.debounce = clamp_debounce(delay);
        self
    }

    /// Seeds the filter state from the controls' initial values.
    pub fn initial_query(mut self, query: ListQuery) -> Self {
        self.initial_query = query;
        self
    }

    pub fn build<V: ListView>(self, view: SharedView<V>) -> ListViewController<V> {
        let entity = Arc::new(self.entity);
        let queries = QueryDispatcher::new(
            Arc::clone(&entity),
            Arc::clone(&self.transport),
            Arc::clone(&view),
            Arc::clone(&self.notifier),
        );
        let mutations = MutationDispatcher::new(
            Arc::clone(&entity),
            self.transport,
            Arc::clone(&view),
            self.notifier,
            self.confirmer,
        );
        ListViewController {
            entity,
            filters: Mutex::new(FilterState::seeded(self.initial_query)),
            selection: Mutex::new(SelectionTracker::new()),
            debouncer: Debouncer::new(self.debounce),
            queries,
            mutations,
            view,
        }
    }
}

/// Filterable, sortable table of one entity type.
pub struct ListViewController<V> {
    entity: Arc<EntityDescriptor>,
    filters: Mutex<FilterState>,
    selection: Mutex<SelectionTracker>,
    debouncer: Debouncer,
    queries: QueryDispatcher<V>,
    mutations: MutationDispatcher<V>,
    view: SharedView<V>,
}

impl<V: ListView> ListViewController<V> {
    pub fn entity(&self) -> &EntityDescriptor {
        &self.entity
    }

    pub fn view(&self) -> &SharedView<V> {
        &self.view
    }

    pub fn debounce_delay(&self) -> Duration {
        self.debouncer.delay()
    }

    pub fn query(&self) -> ListQuery {
        self.filters.lock().current().clone()
    }

    /// Re-runs the current query.
    pub async fn refresh(&self) -> Result<QueryOutcome, ClientError> {
        let query = self.query();
        self.run(&query).await
    }

    /// Merges `patch` into the filter state and queries immediately.
    pub async fn update(&self, patch: QueryPatch) -> Result<QueryOutcome, ClientError> {
        let query = self.filters.lock().update(patch);
        self.debouncer.cancel();
        self.run(&query).await
    }

    pub async fn reset_filters(&self) -> Result<QueryOutcome, ClientError> {
        let query = self.filters.lock().reset();
        self.debouncer.cancel();
        self.run(&query).await
    }

    /// Records typed search text and queries once input has been quiet for
    /// the debounce delay. Returns `Ok(None)` when newer input superseded
    /// this keystroke.
    pub async fn on_search_input(
        &self,
        text: &str,
    ) -> Result<Option<QueryOutcome>, ClientError> {
        self.filters.lock().update(QueryPatch::search(text));
        if !self.debouncer.settle().await {
            return Ok(None);
        }
        self.refresh().await.map(Some)
    }

    pub async fn select_filter(&self, key: Option<String>) -> Result<QueryOutcome, ClientError> {
        self.update(QueryPatch::filter(key)).await
    }

    pub async fn select_sort(&self, key: SortKey) -> Result<QueryOutcome, ClientError> {
        self.update(QueryPatch::sort(key)).await
    }

    /// Submits an add or update form. The form is reset and closed only
    /// when the server accepts it.
    pub async fn submit_form(&self, form: &mut EntityForm) -> Result<MutationResult, ClientError> {
        let result = self.mutate(form.request()).await?;
        form.close();

        if matches!(result, MutationResult::Created { .. }) && self.entity.refresh_after_create {
            if let Err(err) = self.refresh().await {
                debug!(entity = %self.entity.plural, error = %err, "refresh after create failed");
            }
        } else {
            self.with_selection(|_| ());
        }
        Ok(result)
    }

    pub async fn delete_row(&self, id: RecordId) -> Result<MutationResult, ClientError> {
        let result = self.mutate(MutationRequest::Delete { id }).await?;
        if let MutationResult::Deleted { ids, .. } = &result {
            self.with_selection(|selection| selection.forget(ids));
        }
        Ok(result)
    }

    /// Deletes every selected row in one request and clears the selection.
    pub async fn bulk_delete(&self) -> Result<MutationResult, ClientError> {
        let ids = self.with_selection(|selection| selection.selected_ids());
        let result = self.mutate(MutationRequest::BulkDelete { ids }).await?;
        if let MutationResult::Deleted { ids, removed } = &result {
            info!(entity = %self.entity.plural, removed, "bulk delete applied");
            self.with_selection(|selection| {
                selection.forget(ids);
                selection.clear();
            });
        }
        Ok(result)
    }

    pub fn toggle_selection_mode(&self) -> bool {
        self.with_selection(SelectionTracker::toggle_selection_mode)
    }

    pub fn toggle_row(&self, id: &RecordId) -> Option<bool> {
        self.with_selection(|selection| selection.toggle_row(id))
    }

    pub fn toggle_all(&self, checked: bool) {
        self.with_selection(|selection| selection.toggle_all(checked))
    }

    pub fn is_any_selected(&self) -> bool {
        self.selection.lock().is_any_selected()
    }

    pub fn selected_ids(&self) -> Vec<RecordId> {
        self.selection.lock().selected_ids()
    }

    pub fn selection_controls(&self) -> SelectionControls {
        self.selection.lock().controls()
    }

    async fn run(&self, query: &ListQuery) -> Result<QueryOutcome, ClientError> {
        let outcome = self.queries.run_query(query).await?;
        if outcome.is_applied() {
            self.with_selection(|_| ());
        }
        Ok(outcome)
    }

    /// Queries still in flight when the server accepts a mutation describe
    /// the rows before it, so they are fenced off.
    async fn mutate(&self, request: MutationRequest) -> Result<MutationResult, ClientError> {
        self.mutations
            .submit_with(request, || self.queries.fence())
            .await
    }

    /// Aligns the tracker with the rendered rows, applies `f`, then pushes
    /// the derived controls back to the view.
    fn with_selection<R>(&self, f: impl FnOnce(&mut SelectionTracker) -> R) -> R {
        let ids = self.view.lock().row_ids();
        let (result, controls) = {
            let mut selection = self.selection.lock();
            selection.sync_rows(&ids);
            let result = f(&mut selection);
            (result, selection.controls())
        };
        self.view.lock().set_selection_controls(controls);
        result
    }
}
