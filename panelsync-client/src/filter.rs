use panelsync_protocol::query::{ListQuery, QueryPatch};

/// In-memory query of a list screen, seeded from the initial control values.
#[derive(Debug, Clone, Default)]
pub struct FilterState {
    current: ListQuery,
    defaults: ListQuery,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from `initial`; `reset` still returns to the global defaults.
    pub fn seeded(initial: ListQuery) -> Self {
        Self {
            current: initial,
            defaults: ListQuery::default(),
        }
    }

    pub fn current(&self) -> &ListQuery {
        &self.current
    }

    /// Merges `patch` and returns the resulting query.
    pub fn update(&mut self, patch: QueryPatch) -> ListQuery {
        self.current.merge(patch);
        self.current.clone()
    }

    pub fn reset(&mut self) -> ListQuery {
        self.current = self.defaults.clone();
        self.current.clone()
    }
}
