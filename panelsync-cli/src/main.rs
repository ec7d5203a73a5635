use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use colored::*;
use panelsync_client::{
    ControllerBuilder, EntityForm, HttpTransport, ListViewController, QueryOutcome, ShellState,
    TableView, DASHBOARD_SECTIONS, DEFAULT_SECTION,
};
use panelsync_core::config::load_client_config;
use panelsync_core::logging::init_tracing;
use panelsync_core::{ClientConfig, PreferenceStore};
use panelsync_protocol::entity::EntityDescriptor;
use panelsync_protocol::query::{ListQuery, SortKey};
use panelsync_protocol::record::{RecordId, RowRecord};
use tracing::warn;

mod console;

use console::{
    parse_field, print_mutation, print_prefs, print_table, CliError, ConsoleNotifier,
    StdinConfirmer,
};

#[derive(Parser)]
#[command(name = "panelsync")]
#[command(about = "Admin dashboard list screens from the terminal", long_about = None)]
struct Cli {
    /// Backend base URL
    #[arg(long, global = true, env = "PANELSYNC_BASE_URL")]
    base_url: Option<String>,
    /// Cookie to send to the backend, e.g. "csrftoken=abc123" (repeatable)
    #[arg(long = "cookie", global = true, env = "PANELSYNC_COOKIE")]
    cookies: Vec<String>,
    /// Preferences file
    #[arg(long, global = true, env = "PANELSYNC_PREFS_PATH")]
    prefs: Option<PathBuf>,
    #[arg(long, global = true, env = "PANELSYNC_LOG")]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the rows of a list screen
    List(ListArgs),
    /// Add a record
    Create(CreateArgs),
    /// Edit a record in place
    Update(UpdateArgs),
    /// Delete one record
    Delete(DeleteArgs),
    /// Delete several records in one request
    BulkDelete(BulkDeleteArgs),
    /// Dashboard shell preferences
    #[command(subcommand)]
    Prefs(PrefsCommands),
    /// Show version information
    Version,
}

#[derive(Args)]
struct ListArgs {
    /// students, employees, transactions or activities
    entity: String,
    #[arg(long, default_value = "")]
    search: String,
    #[arg(long)]
    filter: Option<String>,
    #[arg(long)]
    sort: Option<SortKey>,
    /// Category filter as name=value (repeatable)
    #[arg(long = "param")]
    params: Vec<String>,
}

#[derive(Args)]
struct CreateArgs {
    entity: String,
    /// Form field as name=value (repeatable)
    #[arg(long = "field", required = true)]
    fields: Vec<String>,
}

#[derive(Args)]
struct UpdateArgs {
    entity: String,
    id: RecordId,
    #[arg(long = "field", required = true)]
    fields: Vec<String>,
}

#[derive(Args)]
struct DeleteArgs {
    entity: String,
    id: RecordId,
    /// Skip the confirmation prompt
    #[arg(long, default_value_t = false)]
    yes: bool,
}

#[derive(Args)]
struct BulkDeleteArgs {
    entity: String,
    ids: Vec<RecordId>,
    #[arg(long, default_value_t = false)]
    yes: bool,
}

#[derive(Subcommand)]
enum PrefsCommands {
    /// Print the restored shell state
    Show,
    /// Remember the active section
    Section { id: String },
    /// Collapse or expand the sidebar
    ToggleSidebar,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("{} {}", "✖".red().bold(), err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    init_tracing(Some(cli.log_level.as_deref().unwrap_or("warn")))?;

    let mut config = load_client_config()?;
    if let Some(base_url) = cli.base_url.as_deref() {
        config = config.with_base_url(base_url)?;
    }
    if cli.prefs.is_some() {
        config.preferences_path = cli.prefs.clone();
    }

    match cli.command {
        Commands::Version => {
            println!("panelsync v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Prefs(command) => run_prefs(&config, command),
        Commands::List(args) => {
            let mut query = ListQuery::new()
                .with_search(args.search)
                .with_sort(args.sort.unwrap_or_default());
            if let Some(filter) = args.filter {
                query = query.with_filter(filter);
            }
            for raw in &args.params {
                let (name, value) = parse_field(raw)?;
                query = query.with_extra(name, value);
            }
            let controller = open_screen(&config, &cli.cookies, &args.entity, false, query)?;
            controller.refresh().await?;
            print_table(controller.entity(), &controller.view().lock());
            Ok(())
        }
        Commands::Create(args) => {
            let controller =
                open_screen(&config, &cli.cookies, &args.entity, false, ListQuery::new())?;
            controller.refresh().await?;
            let mut form = EntityForm::for_create(controller.entity());
            for raw in &args.fields {
                let (name, value) = parse_field(raw)?;
                form.set(&name, value);
            }
            let result = controller.submit_form(&mut form).await?;
            print_mutation(controller.entity(), &result);
            Ok(())
        }
        Commands::Update(args) => {
            let controller =
                open_screen(&config, &cli.cookies, &args.entity, false, ListQuery::new())?;
            let outcome = controller.refresh().await?;
            let record = listed_record(&outcome, &args.id)
                .unwrap_or_else(|| RowRecord::new(args.id.clone()));
            let mut form = EntityForm::for_update(controller.entity(), &record);
            for raw in &args.fields {
                let (name, value) = parse_field(raw)?;
                form.set(&name, value);
            }
            let result = controller.submit_form(&mut form).await?;
            print_mutation(controller.entity(), &result);
            Ok(())
        }
        Commands::Delete(args) => {
            let controller =
                open_screen(&config, &cli.cookies, &args.entity, args.yes, ListQuery::new())?;
            controller.refresh().await?;
            let result = controller.delete_row(args.id).await?;
            print_mutation(controller.entity(), &result);
            Ok(())
        }
        Commands::BulkDelete(args) => {
            let controller =
                open_screen(&config, &cli.cookies, &args.entity, args.yes, ListQuery::new())?;
            controller.refresh().await?;
            controller.toggle_selection_mode();
            for id in &args.ids {
                if controller.toggle_row(id).is_none() {
                    warn!(%id, "row is not listed; skipping");
                    eprintln!("{} {}", "! linha não listada, ignorada:".yellow(), id);
                }
            }
            let result = controller.bulk_delete().await?;
            print_mutation(controller.entity(), &result);
            Ok(())
        }
    }
}

fn open_screen(
    config: &ClientConfig,
    cookies: &[String],
    entity: &str,
    assume_yes: bool,
    query: ListQuery,
) -> Result<ListViewController<TableView>, CliError> {
    let entity =
        EntityDescriptor::preset(entity).ok_or_else(|| CliError::UnknownEntity(entity.to_string()))?;
    let transport = HttpTransport::new(config)?;
    for cookie in cookies {
        transport.set_cookie(cookie);
    }

    Ok(ControllerBuilder::new(entity, Arc::new(transport))
        .config(config)
        .notifier(Arc::new(ConsoleNotifier))
        .confirmer(Arc::new(StdinConfirmer::new(assume_yes)))
        .initial_query(query)
        .build(TableView::new().shared()))
}

fn listed_record(outcome: &QueryOutcome, id: &RecordId) -> Option<RowRecord> {
    outcome
        .snapshot()?
        .rows
        .iter()
        .find(|record| &record.id == id)
        .cloned()
}

fn run_prefs(config: &ClientConfig, command: PrefsCommands) -> Result<(), CliError> {
    let mut store = PreferenceStore::load(config.preferences_path.as_deref())?;
    let mut shell = ShellState::restore(&store, DASHBOARD_SECTIONS, DEFAULT_SECTION);

    match command {
        PrefsCommands::Show => {}
        PrefsCommands::Section { id } => {
            if !shell.activate(&mut store, &id)? {
                return Err(CliError::UnknownSection(id));
            }
            println!("{} {}", "✔ Seção ativa:".green().bold(), id.bold());
        }
        PrefsCommands::ToggleSidebar => {
            let collapsed = shell.toggle_sidebar(&mut store)?;
            let label = if collapsed { "recolhida" } else { "expandida" };
            println!("{} {}", "✔ Barra lateral".green().bold(), label);
        }
    }

    print_prefs(&shell, &store);
    Ok(())
}
