use std::collections::BTreeMap;
use std::sync::Arc;

use panelsync_protocol::entity::EntityDescriptor;
use panelsync_protocol::mutation::MutationRequest;
use panelsync_protocol::record::{RecordId, RowRecord};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::ClientError;
use crate::notify::{Notice, Notifier};
use crate::render::{format_counter, render_row};
use crate::transport::{ensure_supported, ListTransport};
use crate::view::{ListView, SharedView};

/// Explicit user acknowledgment required before destructive requests.
#[cfg_attr(test, mockall::automock)]
pub trait Confirmer: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Confirmer with a fixed answer.
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

impl AutoConfirm {
    pub fn accept() -> Self {
        Self(true)
    }

    pub fn deny() -> Self {
        Self(false)
    }
}

impl Confirmer for AutoConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        self.0
    }
}

/// Outcome of an accepted mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationResult {
    Created {
        record: Option<RowRecord>,
        counters: BTreeMap<String, Value>,
    },
    Updated {
        record: Option<RowRecord>,
        patched: bool,
    },
    Deleted {
        ids: Vec<RecordId>,
        removed: usize,
    },
    /// The user declined the confirmation; nothing was sent.
    Cancelled,
}

/// Sends create/update/delete requests and reconciles the rendered rows
/// once the server confirms success.
pub struct MutationDispatcher<V> {
    entity: Arc<EntityDescriptor>,
    transport: Arc<dyn ListTransport>,
    view: SharedView<V>,
    notifier: Arc<dyn Notifier>,
    confirmer: Arc<dyn Confirmer>,
}

impl<V: ListView> MutationDispatcher<V> {
    pub fn new(
        entity: Arc<EntityDescriptor>,
        transport: Arc<dyn ListTransport>,
        view: SharedView<V>,
        notifier: Arc<dyn Notifier>,
        confirmer: Arc<dyn Confirmer>,
    ) -> Self {
        Self {
            entity,
            transport,
            view,
            notifier,
            confirmer,
        }
    }

    pub async fn submit(&self, request: MutationRequest) -> Result<MutationResult, ClientError> {
        self.submit_with(request, || {}).await
    }

    /// Like [`submit`](Self::submit), but runs `on_accept` once the server
    /// has confirmed success and before the rendered rows change.
    pub async fn submit_with<F>(
        &self,
        request: MutationRequest,
        on_accept: F,
    ) -> Result<MutationResult, ClientError>
    where
        F: FnOnce(),
    {
        let kind = request.kind();

        if let Err(err) = ensure_supported(&self.entity, kind.operation()) {
            self.notifier.notify(Notice::alert(err.user_message()));
            return Err(err);
        }

        if let MutationRequest::BulkDelete { ids } = &request {
            if ids.is_empty() {
                self.notifier.notify(Notice::warning(format!(
                    "Select at least one {} to delete.",
                    self.entity.name
                )));
                return Err(ClientError::EmptySelection);
            }
        }

        if kind.requires_confirmation() && !self.confirmer.confirm(&self.confirmation_prompt(&request)) {
            info!(entity = %self.entity.name, %kind, "mutation cancelled by user");
            return Ok(MutationResult::Cancelled);
        }

        let reply = match self.transport.send_mutation(&self.entity, &request).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(entity = %self.entity.name, %kind, error = %err, "mutation failed");
                self.notifier.notify(Notice::alert(err.user_message()));
                return Err(err);
            }
        };

        if !reply.success {
            let err = ClientError::Rejected { error: reply.error };
            warn!(entity = %self.entity.name, %kind, error = %err, "mutation rejected");
            self.notifier.notify(Notice::alert(err.user_message()));
            return Err(err);
        }

        debug!(entity = %self.entity.name, %kind, "mutation accepted");
        on_accept();
        let result = match request {
            MutationRequest::Create { .. } => {
                let mut view = self.view.lock();
                if !self.entity.refresh_after_create {
                    if let Some(record) = &reply.record {
                        view.append_row(render_row(&self.entity, record));
                    }
                }
                for (name, value) in &reply.counters {
                    view.set_counter(name, &format_counter(value, self.entity.counter_format));
                }
                MutationResult::Created {
                    record: reply.record,
                    counters: reply.counters,
                }
            }
            MutationRequest::Update { id, .. } => {
                let patched = match &reply.record {
                    Some(record) if record.id == id => {
                        self.view.lock().patch_row(render_row(&self.entity, record))
                    }
                    Some(record) => {
                        warn!(
                            entity = %self.entity.name,
                            requested = %id,
                            returned = %record.id,
                            "update reply is for another row"
                        );
                        false
                    }
                    None => false,
                };
                MutationResult::Updated {
                    record: reply.record,
                    patched,
                }
            }
            MutationRequest::Delete { id } => {
                let ids = vec![id];
                let removed = self.view.lock().remove_rows(&ids);
                MutationResult::Deleted { ids, removed }
            }
            MutationRequest::BulkDelete { ids } => {
                let removed = self.view.lock().remove_rows(&ids);
                MutationResult::Deleted { ids, removed }
            }
        };

        Ok(result)
    }

    fn confirmation_prompt(&self, request: &MutationRequest) -> String {
        match request {
            MutationRequest::BulkDelete { ids } if ids.len() > 1 => format!(
                "Are you sure you want to delete {} {}?",
                ids.len(),
                self.entity.plural
            ),
            _ => format!(
                "Are you sure you want to delete this {}?",
                self.entity.name
            ),
        }
    }
}
