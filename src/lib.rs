//! panelsync: sincronização das telas de listagem do painel administrativo
//!
//! Cada tela de listagem (alunos, funcionários, transações, atividades) é
//! dirigida por um `ListViewController` que combina filtros, consultas,
//! mutações e seleção contra o backend HTTP/JSON do painel.
//!
//! # Crates
//!
//! * `panelsync-core`: erros, configuração, tracing e preferências
//! * `panelsync-protocol`: consultas, registros e contratos das entidades
//! * `panelsync-client`: transporte HTTP, despachantes e controlador

use std::sync::Arc;

pub use panelsync_client::{
    ClientError, ControllerBuilder, Confirmer, EntityForm, HttpTransport, ListView,
    ListViewController, MutationResult, Notifier, QueryOutcome, SelectionTracker, ShellState,
    TableView,
};
pub use panelsync_core::{ClientConfig, PanelSyncError, PreferenceStore};
pub use panelsync_protocol::prelude::*;

/// Transport and controller of one list screen, rendering into a fresh
/// in-memory table. The transport is returned so callers can seed cookies.
pub fn open_list_screen(
    config: &ClientConfig,
    entity: EntityDescriptor,
    notifier: Arc<dyn Notifier>,
    confirmer: Arc<dyn Confirmer>,
) -> Result<(ListViewController<TableView>, Arc<HttpTransport>), ClientError> {
    let transport = Arc::new(HttpTransport::new(config)?);
    let controller = ControllerBuilder::new(entity, transport.clone())
        .config(config)
        .notifier(notifier)
        .confirmer(confirmer)
        .build(TableView::new().shared());
    Ok((controller, transport))
}
