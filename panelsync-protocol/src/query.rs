use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entity::EntityDescriptor;

/// Sort orders understood by the list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    DateDesc,
    DateAsc,
    AmountDesc,
    AmountAsc,
    NameAsc,
    NameDesc,
}

impl SortKey {
    pub const ALL: [SortKey; 6] = [
        SortKey::DateDesc,
        SortKey::DateAsc,
        SortKey::AmountDesc,
        SortKey::AmountAsc,
        SortKey::NameAsc,
        SortKey::NameDesc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::DateDesc => "date_desc",
            SortKey::DateAsc => "date_asc",
            SortKey::AmountDesc => "amount_desc",
            SortKey::AmountAsc => "amount_asc",
            SortKey::NameAsc => "name_asc",
            SortKey::NameDesc => "name_desc",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sort key `{0}`")]
pub struct UnknownSortKey(pub String);

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        SortKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == wanted)
            .ok_or_else(|| UnknownSortKey(s.to_string()))
    }
}

/// Current query of one list screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub search_text: String,
    #[serde(default)]
    pub filter_key: Option<String>,
    #[serde(default)]
    pub sort_key: SortKey,
    /// Category-specific filters (`program`, `type`, ...).
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    pub fn with_filter(mut self, key: impl Into<String>) -> Self {
        self.filter_key = Some(key.into());
        self
    }

    pub fn with_sort(mut self, key: SortKey) -> Self {
        self.sort_key = key;
        self
    }

    pub fn with_extra(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }

    /// Merges the set fields of `patch` into this query.
    pub fn merge(&mut self, patch: QueryPatch) {
        if let Some(search) = patch.search_text {
            self.search_text = search;
        }
        if let Some(filter) = patch.filter_key {
            self.filter_key = filter;
        }
        if let Some(sort) = patch.sort_key {
            self.sort_key = sort;
        }
        for (name, value) in patch.extra {
            self.extra.insert(name, value);
        }
    }

    /// Query parameters for the entity's list endpoint. Empty search and
    /// filter values are left out rather than sent as empty strings.
    pub fn to_params(&self, entity: &EntityDescriptor) -> Vec<(String, String)> {
        let mut params = Vec::new();

        if !self.search_text.trim().is_empty() {
            params.push((entity.search_param.clone(), self.search_text.clone()));
        }

        if let Some(filter) = self.filter_key.as_deref() {
            if !filter.trim().is_empty() {
                params.push((entity.filter_param.clone(), filter.to_string()));
            }
        }

        params.push((entity.sort_param.clone(), self.sort_key.as_str().to_string()));

        for (name, value) in &self.extra {
            if !value.trim().is_empty() {
                params.push((name.clone(), value.clone()));
            }
        }

        params
    }
}

/// Partial update of a [`ListQuery`]; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryPatch {
    pub search_text: Option<String>,
    /// `Some(None)` clears the filter.
    pub filter_key: Option<Option<String>>,
    pub sort_key: Option<SortKey>,
    pub extra: BTreeMap<String, String>,
}

impl QueryPatch {
    pub fn search(text: impl Into<String>) -> Self {
        Self {
            search_text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn filter(key: Option<String>) -> Self {
        Self {
            filter_key: Some(key),
            ..Self::default()
        }
    }

    pub fn sort(key: SortKey) -> Self {
        Self {
            sort_key: Some(key),
            ..Self::default()
        }
    }

    pub fn extra(name: impl Into<String>, value: impl Into<String>) -> Self {
        let mut patch = Self::default();
        patch.extra.insert(name.into(), value.into());
        patch
    }
}
