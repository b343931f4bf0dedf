use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;

use clap::Parser;
use ratatui::DefaultTerminal;
use tablestate::domain::DEFAULT_PAGE_SIZE;
use tablestate::{
    ColumnDef, FrameStore, SortDirection, SortState, StoreError, Table, TableConfig, TableError,
};
use thiserror::Error;
use tracing::{error, info};
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod controller;
mod inputter;
mod model;
mod ui;

use controller::Controller;
use model::{Model, Status};
use ui::TableUI;

/// Browse a CSV, Parquet or Arrow file as a filterable, sortable, paged table.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// File to open
    path: String,

    /// Rows per page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,

    /// Column to sort by initially
    #[arg(long)]
    sort: Option<String>,

    /// Sort the initial column descending
    #[arg(long, requires = "sort")]
    desc: bool,

    /// Columns hidden by default
    #[arg(long, value_delimiter = ',')]
    hide: Vec<String>,

    /// Columns filtered with a select list of their distinct values instead of a search input
    #[arg(long, value_delimiter = ',')]
    select: Vec<String>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level used unless TABLESTATE_LOG is set
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Milliseconds to wait for a key press before redrawing
    #[arg(long, default_value_t = 100)]
    poll_ms: u64,
}

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("cannot expand path: {0}")]
    Path(String),
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = init_logging(&args) {
        eprintln!("Error: cannot open log file: {e}");
        return ExitCode::FAILURE;
    }

    match run(&args) {
        Err(e) => {
            error!("{e}");
            eprintln!("Error: {e}");
            if let AppError::Store(StoreError::Load { span_trace, .. })
            | AppError::Table(TableError::Query(StoreError::Load { span_trace, .. })) = &e
            {
                eprintln!("{span_trace}");
            }
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}

/// Logs go to a file only, the terminal belongs to the table.
fn init_logging(args: &Args) -> io::Result<()> {
    let filter = EnvFilter::try_from_env("TABLESTATE_LOG")
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    let file_layer = match &args.log_file {
        Some(path) => Some(
            fmt::layer()
                .with_writer(Mutex::new(File::create(path)?))
                .with_ansi(false),
        ),
        None => None,
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(ErrorLayer::default())
        .init();
    Ok(())
}

fn run(args: &Args) -> Result<(), AppError> {
    let path = shellexpand::full(&args.path).map_err(|e| AppError::Path(e.to_string()))?;
    let store = FrameStore::load(PathBuf::from(path.as_ref()))?;
    let config = table_config(args, &store)?;
    let table = Table::new(config, store)?;
    let mut model = Model::init(table)?;

    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, &mut model, args.poll_ms);
    ratatui::restore();
    info!("Bye!");
    result
}

fn event_loop(
    terminal: &mut DefaultTerminal,
    model: &mut Model<FrameStore>,
    poll_ms: u64,
) -> Result<(), AppError> {
    let mut ui = TableUI::default();
    let controller = Controller::new(poll_ms);

    while model.status != Status::Quitting {
        terminal.draw(|f| ui.draw(model, f))?;

        if let Some(message) = controller.handle_event(model)? {
            model.update(message);
        }
    }
    Ok(())
}

/// Every column of the file is shown, sortable and, unless it gets a select
/// list, searchable.
fn table_config(args: &Args, store: &FrameStore) -> Result<TableConfig, AppError> {
    let mut config = TableConfig::default().with_page_size(args.page_size);
    for name in store.column_names() {
        let select = args.select.iter().any(|s| s == name);
        config = config.column(
            ColumnDef::new(name)
                .with_searchable(!select)
                .with_sortable(true)
                .with_visible(!args.hide.iter().any(|h| h == name)),
        );
    }
    for name in args.select.iter() {
        config = config.select_filter(name.clone(), store.distinct(name)?);
    }
    if let Some(column) = &args.sort {
        let direction = if args.desc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
        config = config.with_default_sort(SortState::by(column.clone(), direction));
    }
    Ok(config)
}
