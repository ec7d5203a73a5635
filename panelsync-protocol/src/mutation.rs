use std::collections::BTreeMap;
use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::entity::{EntityDescriptor, EntityOperation};
use crate::record::{json_kind, RecordId, RowRecord};

/// Ordered form fields, posted as `application/x-www-form-urlencoded`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormPayload(pub Vec<(String, String)>);

impl FormPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Replaces an existing field or appends a new one.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.0.iter_mut().find(|(existing, _)| existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.0.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
    BulkDelete,
}

impl MutationKind {
    pub fn operation(&self) -> EntityOperation {
        match self {
            MutationKind::Create => EntityOperation::Create,
            MutationKind::Update => EntityOperation::Update,
            MutationKind::Delete => EntityOperation::Delete,
            MutationKind::BulkDelete => EntityOperation::BulkDelete,
        }
    }

    /// Destructive kinds need an explicit confirmation before dispatch.
    pub fn requires_confirmation(&self) -> bool {
        matches!(self, MutationKind::Delete | MutationKind::BulkDelete)
    }
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.operation(), f)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MutationRequest {
    Create { form: FormPayload },
    Update { id: RecordId, form: FormPayload },
    Delete { id: RecordId },
    BulkDelete { ids: Vec<RecordId> },
}

impl MutationRequest {
    pub fn kind(&self) -> MutationKind {
        match self {
            MutationRequest::Create { .. } => MutationKind::Create,
            MutationRequest::Update { .. } => MutationKind::Update,
            MutationRequest::Delete { .. } => MutationKind::Delete,
            MutationRequest::BulkDelete { .. } => MutationKind::BulkDelete,
        }
    }

    pub fn endpoint(&self, entity: &EntityDescriptor) -> Option<String> {
        let id = match self {
            MutationRequest::Update { id, .. } | MutationRequest::Delete { id } => Some(id),
            _ => None,
        };
        entity.endpoint(self.kind().operation(), id)
    }

    /// JSON body of a bulk delete: `{ "<entity>_ids": [...] }`.
    pub fn bulk_body(entity: &EntityDescriptor, ids: &[RecordId]) -> Value {
        let mut body = serde_json::Map::new();
        body.insert(entity.bulk_id_key.clone(), json!(ids));
        Value::Object(body)
    }
}

/// Decoded reply to a mutation request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MutationResponse {
    pub success: bool,
    pub error: Option<String>,
    pub record: Option<RowRecord>,
    /// Authoritative aggregate totals, keyed by counter name.
    pub counters: BTreeMap<String, Value>,
    pub deleted_count: Option<u64>,
}

impl MutationResponse {
    pub fn from_value(entity: &EntityDescriptor, payload: Value) -> Result<Self, serde_json::Error> {
        let mut object = match payload {
            Value::Object(object) => object,
            other => {
                return Err(serde_json::Error::custom(format!(
                    "expected a JSON object, got {}",
                    json_kind(&other)
                )))
            }
        };

        let success = object
            .get("success")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let error = object
            .get("error")
            .or_else(|| if success { None } else { object.get("message") })
            .and_then(Value::as_str)
            .map(str::to_string);

        let record = match object.remove(&entity.record_key) {
            Some(Value::Null) | None => None,
            Some(value) => Some(serde_json::from_value::<RowRecord>(value)?),
        };

        let mut counters = BTreeMap::new();
        for name in &entity.counters {
            if let Some(value) = object.get(name) {
                counters.insert(name.clone(), value.clone());
            }
        }
        if let Some(Value::Object(counts)) = object.remove("counts") {
            counters.extend(counts);
        }

        let deleted_count = object.get("deleted_count").and_then(Value::as_u64);

        Ok(Self {
            success,
            error,
            record,
            counters,
            deleted_count,
        })
    }
}
