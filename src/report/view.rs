//! On-screen rendering of one page of a report.
//!
//! [`project`] turns a page into plain strings once; the terminal table,
//! the HTML table and the interactive browser all draw from that.

use colored::Colorize;
use comfy_table::{Cell, Table};
use maud::{html, Markup};

use super::catalog::{ReportKind, TrailingColumn};
use super::columns::ColumnRegistry;
use super::filter::Page;
use super::{cell_text, Record};
use crate::fmt::DASH;

/// Data key whose cells render as badges.
const STATUS_KEY: &str = "status";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewRow {
    pub key: String,
    pub cells: Vec<String>,
}

/// One page projected through the column registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewTable {
    pub headers: Vec<String>,
    pub widths: Vec<String>,
    pub rows: Vec<ViewRow>,
    /// Position of the status column among `headers`, if the registry has one.
    pub status_column: Option<usize>,
    pub trailing: Option<TrailingColumn>,
}

/// Project `page` through `registry`. The index column counts from 1
/// within the page, not the filtered set.
pub fn project<T: Record>(kind: ReportKind, registry: &ColumnRegistry, page: &Page<'_, T>) -> ViewTable {
    let rows: Vec<ViewRow> = page
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| ViewRow {
            key: row.key(),
            cells: registry.iter().map(|col| cell_text(*row, col, i + 1, DASH)).collect(),
        })
        .collect();
    tracing::debug!(report = %kind, rows = rows.len(), columns = registry.len(), "projected page");

    ViewTable {
        headers: registry.iter().map(|c| c.label.clone()).collect(),
        widths: registry.iter().map(|c| c.width.clone()).collect(),
        rows,
        status_column: registry.iter().position(|c| c.data_key == STATUS_KEY),
        trailing: kind.trailing_column(),
    }
}

/// "Page 2 of 3 · 17 rows", with arrows for the directions that exist.
pub fn page_summary<T>(page: &Page<'_, T>) -> String {
    let prev = if page.has_prev() { "\u{2190} " } else { "" };
    let next = if page.has_next() { " \u{2192}" } else { "" };
    let pages = page.total_pages.max(1);
    format!("{prev}Page {} of {pages} \u{b7} {} rows{next}", page.page, page.total_rows)
}

fn badge(status: &str) -> colored::ColoredString {
    match status {
        "Paid" | "Active" => status.green().bold(),
        "Pending" => status.yellow().bold(),
        "Overdue" | "Unpaid" => status.red().bold(),
        DASH => status.normal(),
        _ => status.dimmed(),
    }
}

fn trailing_marks(trailing: &TrailingColumn) -> String {
    trailing.marks.iter().map(|m| format!("[ ] {m}")).collect::<Vec<_>>().join("  ")
}

/// Terminal table with colored status badges.
pub fn format_table(view: &ViewTable) -> String {
    let mut table = Table::new();
    let mut header = view.headers.clone();
    if let Some(trailing) = &view.trailing {
        header.push(trailing.label.to_string());
    }
    table.set_header(header);

    for row in &view.rows {
        let mut cells: Vec<Cell> = row
            .cells
            .iter()
            .enumerate()
            .map(|(i, text)| {
                if Some(i) == view.status_column {
                    Cell::new(badge(text))
                } else {
                    Cell::new(text)
                }
            })
            .collect();
        if let Some(trailing) = &view.trailing {
            cells.push(Cell::new(trailing_marks(trailing)));
        }
        table.add_row(cells);
    }
    table.to_string()
}

fn badge_class(status: &str) -> &'static str {
    match status {
        "Paid" | "Active" => "badge badge-ok",
        "Pending" => "badge badge-pending",
        "Overdue" | "Unpaid" => "badge badge-due",
        _ => "badge",
    }
}

/// HTML table for the screen. Missing values show as a dash.
pub fn html_table(view: &ViewTable) -> Markup {
    html! {
        table class="report" {
            thead {
                tr {
                    @for (label, width) in view.headers.iter().zip(&view.widths) {
                        th style={ "width: " (width) } { (label) }
                    }
                    @if let Some(trailing) = &view.trailing {
                        th class="center" { (trailing.label) }
                    }
                }
            }
            tbody {
                @for row in &view.rows {
                    tr data-key=(row.key) {
                        @for (i, text) in row.cells.iter().enumerate() {
                            @if Some(i) == view.status_column {
                                td { span class=(badge_class(text)) { (text) } }
                            } @else {
                                td { (text) }
                            }
                        }
                        @if let Some(trailing) = &view.trailing {
                            td class="center" {
                                @for mark in trailing.marks {
                                    span class="mark" { (mark) }
                                }
                            }
                        }
                    }
                }
                @if view.rows.is_empty() {
                    tr {
                        td class="empty" colspan=(view.headers.len() + usize::from(view.trailing.is_some())) {
                            "No matching records."
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::payments::ledger;
    use crate::report::filter::{apply, FilterState, Viewer};

    #[test]
    fn test_index_counts_within_page() {
        let lines = ledger(&fixtures::payments(), fixtures::LAST_MONTH);
        let state = FilterState::default().with_page(2);
        let page = apply(&lines, &state, &Viewer::Admin, 2);
        let view = project(ReportKind::Payments, &ReportKind::Payments.default_columns(), &page);
        assert_eq!(view.rows[0].cells[0], "1");
        assert_eq!(view.rows[1].cells[0], "2");
        assert_eq!(view.rows[0].key, "PAY-003");
    }

    #[test]
    fn test_missing_values_render_dash() {
        let mut registry = ReportKind::Attendance.default_columns();
        registry.add_column();
        let rows = fixtures::attendance();
        let page = apply(&rows, &FilterState::default(), &Viewer::Admin, 8);
        let view = project(ReportKind::Attendance, &registry, &page);
        assert!(view.rows.iter().all(|r| r.cells.last().map(String::as_str) == Some(DASH)));
        assert_eq!(view.trailing.map(|t| t.label), Some("Status"));
    }

    #[test]
    fn test_status_column_located() {
        let lines = ledger(&fixtures::payments(), fixtures::LAST_MONTH);
        let page = apply(&lines, &FilterState::default(), &Viewer::Admin, 8);
        let view = project(ReportKind::Payments, &ReportKind::Payments.default_columns(), &page);
        assert_eq!(view.status_column, Some(8));
        assert_eq!(view.rows[0].cells[8], "Paid");
    }

    #[test]
    fn test_format_table_contains_rows_and_marks() {
        colored::control::set_override(false);
        let rows = fixtures::attendance();
        let page = apply(&rows, &FilterState::default(), &Viewer::Admin, 8);
        let registry = ReportKind::Attendance.default_columns();
        let text = format_table(&project(ReportKind::Attendance, &registry, &page));
        assert!(text.contains("Samanera Chanthol"));
        assert!(text.contains("[ ] Present"));
    }

    #[test]
    fn test_html_table_badges_and_empty_state() {
        let lines = ledger(&fixtures::payments(), fixtures::LAST_MONTH);
        let registry = ReportKind::Payments.default_columns();
        let page = apply(&lines, &FilterState::default(), &Viewer::Admin, 8);
        let html = html_table(&project(ReportKind::Payments, &registry, &page)).into_string();
        assert!(html.contains("badge badge-ok"));
        assert!(html.contains("data-key=\"PAY-005\""));

        let none = apply(&lines, &FilterState::default().with_search("nobody"), &Viewer::Admin, 8);
        let html = html_table(&project(ReportKind::Payments, &registry, &none)).into_string();
        assert!(html.contains("No matching records."));
    }

    #[test]
    fn test_page_summary() {
        let lines = ledger(&fixtures::payments(), fixtures::LAST_MONTH);
        let page = apply(&lines, &FilterState::default().with_page(2), &Viewer::Admin, 2);
        assert_eq!(page_summary(&page), "\u{2190} Page 2 of 3 \u{b7} 5 rows \u{2192}");
    }
}
