//! Print layout: a separate table meant for paper, hidden on screen.
//!
//! Uses the same filtered rows as the screen table (all of them, not one
//! page) and each column's print label. Missing values print blank so the
//! cells can be filled in by hand.

use maud::{html, Markup, PreEscaped, DOCTYPE};

use super::catalog::{PrintLayout, ReportHeader, ReportKind};
use super::columns::ColumnRegistry;
use super::{cell_text, Record};

/// Everything printed around the table.
#[derive(Debug, Clone, PartialEq)]
pub struct PrintContext {
    pub header: ReportHeader,
    /// Heading of the table section, e.g. "Collection Summary: February 2026".
    pub section: Option<String>,
    /// `(label, value)` lines under the table.
    pub summary: Vec<(String, String)>,
    /// Date shown in the "printed on" stamp.
    pub printed_on: String,
}

impl PrintContext {
    pub fn new(header: ReportHeader) -> Self {
        Self {
            header,
            section: None,
            summary: Vec::new(),
            printed_on: chrono::Local::now().format("%d %B %Y").to_string(),
        }
    }

    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    pub fn with_summary(mut self, summary: Vec<(String, String)>) -> Self {
        self.summary = summary;
        self
    }
}

fn header_rows(layout: &PrintLayout, registry: &ColumnRegistry) -> Markup {
    let grouped = !layout.groups.is_empty();
    let rowspan = if grouped { 2 } else { 1 };
    html! {
        tr {
            @for col in registry {
                th rowspan=(rowspan) style={ "width: " (col.width) } { (col.print_label()) }
            }
            @for group in layout.groups {
                th colspan=(group.sub_columns.len()) { (group.print_label) }
            }
        }
        @if grouped {
            tr class="sub-header" {
                @for group in layout.groups {
                    @for (_, print_label) in group.sub_columns {
                        th { (print_label) }
                    }
                }
            }
        }
    }
}

/// The `.print-only` subtree for `rows`, the full filtered set.
pub fn print_fragment<T: Record>(
    kind: ReportKind,
    ctx: &PrintContext,
    registry: &ColumnRegistry,
    rows: &[&T],
) -> Markup {
    let layout = kind.print_layout();
    let blank_cells: usize = layout.groups.iter().map(|g| g.sub_columns.len()).sum();
    tracing::debug!(report = %kind, rows = rows.len(), "rendering print layout");

    html! {
        div class="print-only" {
            div class="print-heading" {
                h1 { (ctx.header.title) }
                @if let Some(subtitle) = &ctx.header.subtitle {
                    p class="subtitle" { (subtitle) }
                }
                @let place = ctx.header.place_line();
                @if !place.is_empty() {
                    p class="place" { (place) }
                }
                @if let Some(date_line) = layout.date_line {
                    p class="date-line" { (date_line) }
                }
            }
            @if let Some(section) = &ctx.section {
                h2 { (section) }
            }
            table class="print-table" {
                thead { (header_rows(&layout, registry)) }
                tbody {
                    @for (i, row) in rows.iter().enumerate() {
                        tr {
                            @for col in registry {
                                @let align = if col.data_key == layout.left_align_key { "left" } else { "center" };
                                td class=(align) { (cell_text(*row, col, i + 1, "")) }
                            }
                            @for _ in 0..blank_cells {
                                td {}
                            }
                        }
                    }
                }
            }
            @if !ctx.summary.is_empty() {
                div class="summary" {
                    @for (label, value) in &ctx.summary {
                        p { span class="label" { (label) } " " span class="value" { (value) } }
                    }
                }
            }
            @if !layout.signature.is_empty() || !layout.footer.is_empty() {
                div class="sign-off" {
                    div class="signature" {
                        @for line in layout.signature { p { (line) } }
                    }
                    div class="footer" {
                        @for line in layout.footer { p { (line) } }
                    }
                }
            }
            p class="printed-on" { (layout.printed_on) " " (ctx.printed_on) }
        }
    }
}

fn stylesheet(layout: &PrintLayout) -> String {
    format!(
        r#"
.print-only {{ display: none; }}
table.report {{ border-collapse: collapse; width: 100%; }}
table.report th, table.report td {{ padding: 6px 10px; border-bottom: 1px solid #ddd; text-align: left; }}
.badge {{ padding: 2px 8px; border-radius: 4px; font-size: 0.8em; font-weight: bold; }}
.badge-ok {{ background: #d1fae5; color: #047857; }}
.badge-pending {{ background: #fef3c7; color: #b45309; }}
.badge-due {{ background: #fee2e2; color: #b91c1c; }}
.mark {{ margin: 0 4px; padding: 2px 8px; border: 1px solid #ccc; border-radius: 4px; }}
@media print {{
  @page {{ size: {size}; margin: 12mm; }}
  .screen-only {{ display: none !important; }}
  .print-only {{ display: block !important; }}
  * {{ -webkit-print-color-adjust: exact; print-color-adjust: exact; }}
  .print-only {{ font-family: 'Kantumruy Pro', 'Khmer OS', 'Noto Sans Khmer', sans-serif; font-size: 11pt; color: black; }}
  .print-heading {{ text-align: center; margin-bottom: 24px; }}
  .print-table {{ width: 100%; border-collapse: collapse; font-size: 10.5pt; }}
  .print-table th, .print-table td {{ border: 1px solid black; padding: 6px 8px; text-align: center; vertical-align: middle; }}
  .print-table th {{ background-color: #f8f8f8; font-weight: bold; }}
  .sub-header th {{ font-size: 9.5pt; background-color: #f0f0f0; }}
  .print-table td.left {{ text-align: left; padding-left: 12px; }}
  .summary {{ margin: 24px 0 0 auto; width: 16em; }}
  .sign-off {{ display: flex; justify-content: space-between; margin-top: 48px; font-style: italic; }}
  .printed-on {{ margin-top: 36px; text-align: right; font-size: 9pt; font-style: italic; }}
}}
"#,
        size = layout.orientation.css()
    )
}

/// A complete HTML document: the screen table plus the print subtree.
pub fn render_page(kind: ReportKind, ctx: &PrintContext, screen: Markup, print: Markup) -> String {
    let layout = kind.print_layout();
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (ctx.header.title) }
                style { (PreEscaped(stylesheet(&layout))) }
            }
            body {
                div class="screen-only" {
                    h1 { (ctx.header.title) }
                    @if let Some(subtitle) = &ctx.header.subtitle {
                        p { (subtitle) }
                    }
                    (screen)
                }
                (print)
            }
        }
    }
    .into_string()
}
