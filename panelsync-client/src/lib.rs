//! panelsync client - list-view synchronization for the admin dashboard.

pub mod controller;
pub mod debounce;
pub mod error;
pub mod filter;
pub mod form;
pub mod mutation;
pub mod notify;
pub mod query;
pub mod render;
pub mod selection;
pub mod shell;
pub mod transport;
pub mod view;

#[cfg(test)]
mod testing;

pub use controller::{ControllerBuilder, ListViewController};
pub use debounce::Debouncer;
pub use error::ClientError;
pub use filter::FilterState;
pub use form::{EntityForm, FormMode};
pub use mutation::{AutoConfirm, Confirmer, MutationDispatcher, MutationResult};
pub use notify::{Notice, NoticeLevel, NoticeLog, Notifier, TracingNotifier};
pub use query::{QueryDispatcher, QueryOutcome};
pub use render::{render_row, render_rows, RenderedRow};
pub use selection::SelectionTracker;
pub use shell::{ShellState, DASHBOARD_SECTIONS, DEFAULT_SECTION};
pub use transport::{HttpTransport, ListTransport};
pub use view::{ListView, SelectAllState, SelectionControls, SharedView, TableView};
