//! Show, print and export steps shared by every report command.

use std::path::{Path, PathBuf};

use comfy_table::{Cell, Table};

use super::{ColumnArgs, ExportArgs, FilterArgs, PrintArgs};
use crate::error::Result;
use crate::fmt::DASH;
use crate::report::export::{build_sheet, write_export};
use crate::report::filter::{apply, filter_rows, paginate};
use crate::report::print::{print_fragment, render_page, PrintContext};
use crate::report::view::{format_table, html_table, page_summary, project};
use crate::report::{ColumnRegistry, Record, ReportHeader, ReportKind};
use crate::settings::SettingsStore;

/// Report header using the institution and location from preferences.
pub fn header(kind: ReportKind, store: &dyn SettingsStore) -> ReportHeader {
    let settings = store.load();
    kind.header(&settings.institution, &settings.location)
}

fn column_table(registry: &ColumnRegistry) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["ID", "Label", "Print Label", "Key", "Width", ""]);
    for col in registry.columns() {
        table.add_row(vec![
            Cell::new(&col.id),
            Cell::new(&col.label),
            Cell::new(col.print_label()),
            Cell::new(&col.data_key),
            Cell::new(&col.width),
            Cell::new(if col.permanent { "permanent" } else { "" }),
        ]);
    }
    table
}

/// Print one page of the report as a terminal table.
pub fn show<T: Record>(kind: ReportKind, rows: &[T], filters: &FilterArgs, columns: &ColumnArgs) -> Result<()> {
    let registry = columns.registry(kind)?;
    if columns.columns {
        println!("Columns\n{}\n", column_table(&registry));
    }
    let page = apply(rows, &filters.state(), &filters.viewer(), filters.page_size);
    println!("{}", format_table(&project(kind, &registry, &page)));
    println!("{}", page_summary(&page));
    Ok(())
}

fn write_output(output: Option<PathBuf>, kind: ReportKind, extension: &str, bytes: &[u8]) -> Result<PathBuf> {
    let path = output.unwrap_or_else(|| PathBuf::from(format!("{}.{extension}", kind.default_filename())));
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(&path, bytes)?;
    tracing::info!(path = %path.display(), report = %kind, "print output written");
    Ok(path)
}

/// Write the printable page: the current page as the screen table and the
/// whole filtered set in the print layout.
pub fn print<T: Record>(
    kind: ReportKind,
    rows: &[T],
    filters: &FilterArgs,
    columns: &ColumnArgs,
    args: &PrintArgs,
    ctx: &PrintContext,
) -> Result<PathBuf> {
    let registry = columns.registry(kind)?;
    let state = filters.state();
    let filtered = filter_rows(rows, &state, &filters.viewer());

    #[cfg(feature = "pdf")]
    if args.pdf {
        let bytes = crate::pdf::render_report(kind, ctx, &registry, &filtered)?;
        let path = write_output(args.output.clone(), kind, "pdf", &bytes)?;
        println!("Wrote {}", path.display());
        return Ok(path);
    }

    let print = print_fragment(kind, ctx, &registry, &filtered);
    let page = paginate(filtered, state.page, filters.page_size);
    let screen = html_table(&project(kind, &registry, &page));
    let html = render_page(kind, ctx, screen, print);
    let path = write_output(args.output.clone(), kind, "html", html.as_bytes())?;
    println!("Wrote {}", path.display());
    Ok(path)
}

/// Export the whole filtered set.
pub fn export<T: Record>(
    kind: ReportKind,
    rows: &[T],
    filters: &FilterArgs,
    columns: &ColumnArgs,
    args: &ExportArgs,
    header: &ReportHeader,
) -> Result<PathBuf> {
    let registry = columns.registry(kind)?;
    let filtered = filter_rows(rows, &filters.state(), &filters.viewer());
    let options = args.options(kind);
    let sheet = build_sheet(kind, header, &registry, &filtered, &options);
    let path = write_export(&sheet, kind, &options, Path::new(&args.output_dir))?;
    println!("Exported {} rows to {}", sheet.rows.len(), path.display());
    Ok(path)
}

/// Plain listing of `rows` under fixed `(header, data_key)` columns.
pub fn record_table<T: Record>(rows: &[&T], columns: &[(&str, &str)]) -> Table {
    let mut table = Table::new();
    table.set_header(columns.iter().map(|(header, _)| *header).collect::<Vec<_>>());
    for row in rows {
        table.add_row(
            columns
                .iter()
                .map(|(_, key)| match row.field(key) {
                    Some(value) if !value.to_string().is_empty() => value.to_string(),
                    _ => DASH.to_string(),
                })
                .collect::<Vec<_>>(),
        );
    }
    table
}
