use std::io::{self, BufRead, Write};

use colored::*;
use panelsync_client::{
    ClientError, Confirmer, MutationResult, Notice, NoticeLevel, Notifier, ShellState, TableView,
};
use panelsync_core::{ConfigError, PanelSyncError, PreferenceStore};
use panelsync_protocol::entity::EntityDescriptor;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("configuração inválida: {0}")]
    Config(#[from] ConfigError),
    #[error("{}", .0.user_message())]
    Client(#[from] ClientError),
    #[error("{0}")]
    Core(#[from] PanelSyncError),
    #[error("entidade desconhecida '{0}'; use students, employees, transactions ou activities")]
    UnknownEntity(String),
    #[error("campo inválido '{0}'; use nome=valor")]
    InvalidField(String),
    #[error("seção desconhecida '{0}'")]
    UnknownSection(String),
    #[error("entrada/saída falhou: {0}")]
    Io(#[from] io::Error),
}

/// Splits a `name=value` argument. The value may be empty or contain `=`.
pub fn parse_field(raw: &str) -> Result<(String, String), CliError> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| CliError::InvalidField(raw.to_string()))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(CliError::InvalidField(raw.to_string()));
    }
    Ok((name.to_string(), value.to_string()))
}

pub fn is_affirmative(answer: &str) -> bool {
    matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes" | "s" | "sim"
    )
}

/// Asks on the terminal; `--yes` skips the question.
pub struct StdinConfirmer {
    assume_yes: bool,
}

impl StdinConfirmer {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Confirmer for StdinConfirmer {
    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        print!("{} [y/N] ", prompt.yellow().bold());
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(_) => is_affirmative(&line),
            Err(_) => false,
        }
    }
}

/// Prints notices to stderr.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        let line = match (notice.level, notice.blocking) {
            (NoticeLevel::Error, true) => format!("✖ {}", notice.message).red().bold(),
            (NoticeLevel::Error, false) => format!("✖ {}", notice.message).red(),
            (NoticeLevel::Warning, _) => format!("! {}", notice.message).yellow(),
            (NoticeLevel::Info, _) => notice.message.cyan(),
        };
        eprintln!("{}", line);
    }
}

pub fn print_table(entity: &EntityDescriptor, view: &TableView) {
    let header: Vec<String> = std::iter::once("id".to_string())
        .chain(entity.columns.iter().map(|column| column.label.clone()))
        .collect();
    println!("{}", header.join(" | ").bold());

    if let Some(message) = view.placeholder() {
        println!("  {}", message.dimmed());
    }
    for row in view.rows() {
        println!("{} | {}", row.id.to_string().cyan(), row.cells.join(" | "));
    }

    if !view.counters().is_empty() {
        println!();
        for (name, value) in view.counters() {
            println!("  {}: {}", name, value.bold());
        }
    }
}

pub fn print_mutation(entity: &EntityDescriptor, result: &MutationResult) {
    match result {
        MutationResult::Created { record, counters } => {
            let id = record
                .as_ref()
                .map(|record| record.id.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "{} {} (id: {})",
                "✔ Registro criado:".green().bold(),
                entity.name.bold(),
                id
            );
            for (name, value) in counters {
                println!("  {}: {}", name, value);
            }
        }
        MutationResult::Updated { record, patched } => {
            let id = record
                .as_ref()
                .map(|record| record.id.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "{} {} (id: {})",
                "✔ Registro atualizado:".green().bold(),
                entity.name.bold(),
                id
            );
            if !patched {
                println!("  {}", "linha não estava na listagem atual".dimmed());
            }
        }
        MutationResult::Deleted { ids, removed } => {
            let ids: Vec<String> = ids.iter().map(ToString::to_string).collect();
            println!(
                "{} {} {}",
                "✔ Removido:".green().bold(),
                entity.plural.bold(),
                ids.join(", ")
            );
            println!("  Linhas removidas da listagem: {}", removed);
        }
        MutationResult::Cancelled => {
            println!("{}", "Operação cancelada".yellow());
        }
    }
}

pub fn print_prefs(shell: &ShellState, store: &PreferenceStore) {
    println!("{}", "Preferências do painel".bold());
    println!("  Arquivo: {}", store.path().display());
    println!("  Seção ativa: {}", shell.active_section().cyan());
    let sidebar = if shell.sidebar_collapsed() {
        "recolhida"
    } else {
        "expandida"
    };
    println!("  Barra lateral: {}", sidebar);
    if let Some(updated_at) = store.updated_at() {
        println!("  Atualizado em: {}", updated_at);
    }
}
