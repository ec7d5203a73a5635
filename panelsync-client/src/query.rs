use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use panelsync_protocol::entity::EntityDescriptor;
use panelsync_protocol::query::ListQuery;
use panelsync_protocol::record::ListSnapshot;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::error::ClientError;
use crate::notify::{Notice, Notifier};
use crate::render::render_rows;
use crate::transport::ListTransport;
use crate::view::{ListView, SharedView};

/// What happened to a completed query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// The snapshot replaced the rendered rows.
    Applied {
        sequence: u64,
        snapshot: ListSnapshot,
    },
    /// A newer query completed first; this result was dropped.
    Superseded { sequence: u64, latest: u64 },
}

impl QueryOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, QueryOutcome::Applied { .. })
    }

    pub fn snapshot(&self) -> Option<&ListSnapshot> {
        match self {
            QueryOutcome::Applied { snapshot, .. } => Some(snapshot),
            QueryOutcome::Superseded { .. } => None,
        }
    }
}

/// Issue-order fencing for racing queries.
///
/// Sequence numbers are handed out at issue time. A completion is admitted
/// only when its number is above every completion seen so far, and the
/// admitted write runs under the same lock as the check.
#[derive(Debug, Default)]
struct SequenceGate {
    issued: AtomicU64,
    completed: Mutex<u64>,
}

impl SequenceGate {
    fn issue(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn latest_issued(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }

    fn complete<F>(&self, sequence: u64, apply: F) -> Result<(), u64>
    where
        F: FnOnce(),
    {
        let mut completed = self.completed.lock();
        if sequence <= *completed {
            return Err(*completed);
        }
        *completed = sequence;
        apply();
        Ok(())
    }

    /// Marks every query issued so far as completed.
    fn fence(&self) {
        let mut completed = self.completed.lock();
        *completed = (*completed).max(self.issued.load(Ordering::SeqCst));
    }
}

/// Runs list queries and replaces the rendered rows with fresh snapshots.
pub struct QueryDispatcher<V> {
    entity: Arc<EntityDescriptor>,
    transport: Arc<dyn ListTransport>,
    view: SharedView<V>,
    notifier: Arc<dyn Notifier>,
    gate: SequenceGate,
}

impl<V: ListView> QueryDispatcher<V> {
    pub fn new(
        entity: Arc<EntityDescriptor>,
        transport: Arc<dyn ListTransport>,
        view: SharedView<V>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            entity,
            transport,
            view,
            notifier,
            gate: SequenceGate::default(),
        }
    }

    /// Number of the most recently issued query.
    pub fn latest_issued(&self) -> u64 {
        self.gate.latest_issued()
    }

    /// Drops the results of every query already in flight. Called around
    /// mutations so an older snapshot cannot overwrite their effect.
    pub fn fence(&self) {
        self.gate.fence();
        debug!(
            entity = %self.entity.plural,
            fenced = self.gate.latest_issued(),
            "in-flight queries fenced"
        );
    }

    /// Fetches `query` and renders the result unless a newer query has
    /// already completed. Failures leave the rendered rows untouched.
    pub async fn run_query(&self, query: &ListQuery) -> Result<QueryOutcome, ClientError> {
        let sequence = self.gate.issue();
        debug!(entity = %self.entity.plural, sequence, "query issued");

        let result = self.transport.fetch_list(&self.entity, query).await;

        match result {
            Ok(snapshot) => {
                let admitted = self.gate.complete(sequence, || {
                    let mut view = self.view.lock();
                    if snapshot.is_empty() {
                        view.show_placeholder(&self.entity.empty_message);
                    } else {
                        view.replace_rows(render_rows(&self.entity, &snapshot.rows));
                    }
                });

                match admitted {
                    Ok(()) => {
                        debug!(
                            entity = %self.entity.plural,
                            sequence,
                            rows = snapshot.len(),
                            "snapshot applied"
                        );
                        Ok(QueryOutcome::Applied { sequence, snapshot })
                    }
                    Err(latest) => {
                        debug!(entity = %self.entity.plural, sequence, latest, "stale snapshot dropped");
                        Ok(QueryOutcome::Superseded { sequence, latest })
                    }
                }
            }
            Err(err) => match self.gate.complete(sequence, || {}) {
                Ok(()) => {
                    warn!(entity = %self.entity.plural, sequence, error = %err, "query failed");
                    self.notifier.notify(Notice::error(err.user_message()));
                    Err(err)
                }
                Err(latest) => {
                    debug!(
                        entity = %self.entity.plural,
                        sequence,
                        latest,
                        error = %err,
                        "stale query failure dropped"
                    );
                    Ok(QueryOutcome::Superseded { sequence, latest })
                }
            },
        }
    }
}
