//! In-process transport with scripted latency and replies.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use panelsync_protocol::entity::EntityDescriptor;
use panelsync_protocol::mutation::{MutationRequest, MutationResponse};
use panelsync_protocol::query::ListQuery;
use panelsync_protocol::record::{ListSnapshot, RowRecord};
use parking_lot::Mutex;

use crate::error::ClientError;
use crate::transport::ListTransport;

#[derive(Default)]
pub(crate) struct ScriptedTransport {
    rows: Vec<RowRecord>,
    delays: HashMap<String, Duration>,
    failing: Vec<String>,
    replies: Mutex<VecDeque<Result<MutationResponse, ClientError>>>,
    pub(crate) fetches: Mutex<Vec<ListQuery>>,
    pub(crate) mutations: Mutex<Vec<MutationRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn students() -> Self {
        let rows = vec![
            RowRecord::new(1)
                .with_field("name", "Jane Doe")
                .with_field("type", "trainee")
                .with_field("program", "iot")
                .with_field("level", "1"),
            RowRecord::new(2)
                .with_field("name", "John Roe")
                .with_field("type", "internee-university")
                .with_field("program", "sod")
                .with_field("level", "2"),
            RowRecord::new(3)
                .with_field("name", "Mary Major")
                .with_field("type", "trainee")
                .with_field("program", "sod")
                .with_field("level", "3"),
        ];
        Self {
            rows,
            ..Self::default()
        }
    }

    pub(crate) fn delay_for(mut self, search: &str, delay: Duration) -> Self {
        self.delays.insert(search.to_string(), delay);
        self
    }

    pub(crate) fn failing_on(mut self, search: &str) -> Self {
        self.failing.push(search.to_string());
        self
    }

    pub(crate) fn reply(self, reply: Result<MutationResponse, ClientError>) -> Self {
        self.replies.lock().push_back(reply);
        self
    }

    pub(crate) fn fetch_count(&self) -> usize {
        self.fetches.lock().len()
    }

    pub(crate) fn mutation_count(&self) -> usize {
        self.mutations.lock().len()
    }

    fn matches(row: &RowRecord, query: &ListQuery) -> bool {
        let needle = query.search_text.trim().to_lowercase();
        let name_match = row.text("name").to_lowercase().contains(&needle);
        let filter_match = match query.filter_key.as_deref() {
            None | Some("") | Some("all") => true,
            Some("trainees") => row.text("type") == "trainee",
            Some("internees") => row.text("type").starts_with("internee"),
            Some(program) => row.text("program") == program,
        };
        name_match && filter_match
    }
}

#[async_trait]
impl ListTransport for ScriptedTransport {
    async fn fetch_list(
        &self,
        _entity: &EntityDescriptor,
        query: &ListQuery,
    ) -> Result<ListSnapshot, ClientError> {
        self.fetches.lock().push(query.clone());
        if let Some(delay) = self.delays.get(&query.search_text) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.contains(&query.search_text) {
            return Err(ClientError::Http("connection refused".into()));
        }
        let rows = self
            .rows
            .iter()
            .filter(|row| Self::matches(row, query))
            .cloned()
            .collect();
        Ok(ListSnapshot::new(rows))
    }

    async fn send_mutation(
        &self,
        _entity: &EntityDescriptor,
        request: &MutationRequest,
    ) -> Result<MutationResponse, ClientError> {
        self.mutations.lock().push(request.clone());
        self.replies.lock().pop_front().unwrap_or_else(|| {
            Ok(MutationResponse {
                success: true,
                ..MutationResponse::default()
            })
        })
    }
}
