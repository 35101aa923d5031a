//! `datagrid` command: view and export JSON records through the table engine.

pub mod args;
pub mod data;
pub mod error;
pub mod paths;
pub mod render;

use std::path::Path;
use std::path::PathBuf;

use datagrid_lib::ExportFormat;
use datagrid_lib::Table;
use datagrid_lib::TableOptions;
use datagrid_lib::prefs::Preferences;
use datagrid_lib::prefs::SqliteBackend;
use datagrid_lib::table::Direction;
use datagrid_lib::table::OrderBy;

use crate::args::Cli;
use crate::args::Command;
use crate::args::ViewArgs;
use crate::data::Record;
use crate::error::CliError;

/// Runs a parsed command line, printing results to stdout.
pub async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Show { view, page, page_size } => {
            let records = read_records(&view.input).await?;
            let options = TableOptions::default().with_page_size(page_size);
            let mut table = build_table(records, &view, options, open_preferences(&view))?;
            table.set_page(page.saturating_sub(1));
            print!("{}", render::render_page(&table));
        }
        Command::Export {
            view,
            format,
            output,
            filename,
            date_suffix,
        } => {
            let records = read_records(&view.input).await?;
            let filename = filename.unwrap_or_else(|| default_filename(&view.input));
            let options = TableOptions::default()
                .with_export_filename(filename)
                .with_export_date_suffix(date_suffix);
            let table = build_table(records, &view, options, open_preferences(&view))?;
            let path = export_table(&table, format, output).await?;
            println!("Exported {} rows to {}", table.total_filtered_count(), path.display());
        }
    }
    Ok(())
}

/// Builds a table over the records and applies the view arguments.
pub fn build_table(
    records: Vec<Record>,
    view: &ViewArgs,
    options: TableOptions,
    preferences: Option<Preferences>,
) -> Result<Table<Record>, CliError> {
    let names = data::field_names(&records);
    let options = options
        .with_preferences_key(view.prefs_key.clone())
        .with_persist_preferences(!view.no_prefs);

    let mut builder = Table::builder(data::columns(&names)).rows(records).options(options);
    if let Some(preferences) = preferences {
        builder = builder.preferences(preferences);
    }
    let mut table = builder.build()?;

    let known = |id: &str| {
        if names.iter().any(|name| name == id) {
            Ok(())
        } else {
            Err(CliError::UnknownColumn(id.to_string()))
        }
    };

    let mut order = OrderBy::none();
    for sort in &view.sort {
        known(&sort.column)?;
        order = match sort.direction {
            Direction::Asc => order.then_asc(sort.column.clone()),
            Direction::Desc => order.then_desc(sort.column.clone()),
        };
    }
    table.set_sort(order);

    for arg in view.filter.iter().chain(&view.range) {
        known(&arg.column)?;
        table.set_column_filter(&arg.column, Some(arg.filter.clone()));
    }

    if let Some(search) = &view.search {
        table.set_global_filter(search.clone());
    }

    if view.show_all {
        table.show_all_columns();
    }
    for column in &view.hide {
        known(column)?;
        table.set_column_visibility(column, false);
    }

    Ok(table)
}

/// Exports the table and writes the payload, returning the written path.
pub async fn export_table<T>(
    table: &Table<T>,
    format: ExportFormat,
    output: Option<PathBuf>,
) -> Result<PathBuf, CliError> {
    let payload = table.export(format)?;
    let path = output.unwrap_or_else(|| PathBuf::from(&payload.filename));

    tokio::fs::write(&path, &payload.bytes)
        .await
        .map_err(|source| CliError::Write {
            path: path.clone(),
            source,
        })?;

    log::info!(
        "[cli] wrote {} ({} bytes, {})",
        path.display(),
        payload.bytes.len(),
        payload.mime_type()
    );
    Ok(path)
}

async fn read_records(path: &Path) -> Result<Vec<Record>, CliError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let records = data::parse_records(&bytes)?;
    log::debug!("[cli] loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

fn default_filename(input: &Path) -> String {
    input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "export".to_string())
}

/// Opens the on-disk preference store, or `None` when disabled or unavailable.
fn open_preferences(view: &ViewArgs) -> Option<Preferences> {
    if view.no_prefs {
        return None;
    }
    let path = paths::preferences_db()?;
    if let Some(dir) = path.parent()
        && let Err(e) = std::fs::create_dir_all(dir)
    {
        log::warn!("[cli] cannot create {}: {}", dir.display(), e);
        return None;
    }
    match SqliteBackend::open(&path) {
        Ok(backend) => Some(Preferences::new(backend)),
        Err(e) => {
            log::warn!("[cli] preferences unavailable at {}: {}", path.display(), e);
            None
        }
    }
}
