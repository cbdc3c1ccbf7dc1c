//! Interactive payments ledger: page through the filtered ledger, search,
//! cycle the status and month filters, and mark payments paid or unpaid.

use chrono::{Local, NaiveDate};
use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout},
    text::Line,
    widgets::{Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::fixtures;
use crate::fmt::money;
use crate::models::Payment;
use crate::payments::{collection_stats, ledger, toggle_status, LedgerLine};
use crate::report::filter::{apply, filter_rows};
use crate::report::view::{page_summary, project};
use crate::report::{ColumnRegistry, FilterState, Record, ReportKind, Viewer};
use crate::repo::InMemoryRepository;
use crate::tui::{self, ReportView, ReportViewAction, FOOTER_STYLE, HEADER_STYLE, SELECTED_STYLE};

const STATUS_CHOICES: &[&str] = &["All", "Paid", "Pending", "Overdue"];
const ALL_MONTHS: &str = "All Months";

enum BrowseMode {
    Normal,
    Search(String),
    GotoPage(String),
}

pub struct LedgerBrowser {
    payments: InMemoryRepository<Payment>,
    last_month: String,
    lines: Vec<LedgerLine>,
    registry: ColumnRegistry,
    state: FilterState,
    viewer: Viewer,
    page_size: usize,
    selected: usize,
    mode: BrowseMode,
    status_message: Option<String>,
    today: NaiveDate,
    toggled: usize,
    table_state: TableState,
}

/// Terminal columns for a CSS width such as "180px".
fn column_width(css: &str) -> u16 {
    let px = css.trim().trim_end_matches("px").parse::<u16>().unwrap_or(120);
    (px / 9).clamp(4, 40)
}

fn next_choice<'a>(choices: &[&'a str], current: Option<&str>) -> &'a str {
    let pos = current
        .and_then(|c| choices.iter().position(|choice| *choice == c))
        .unwrap_or(0);
    choices[(pos + 1) % choices.len()]
}

impl LedgerBrowser {
    pub fn new(
        payments: InMemoryRepository<Payment>,
        last_month: &str,
        registry: ColumnRegistry,
        state: FilterState,
        viewer: Viewer,
        page_size: usize,
    ) -> Self {
        let lines = ledger(payments.as_slice(), last_month);
        Self {
            payments,
            last_month: last_month.to_string(),
            lines,
            registry,
            state,
            viewer,
            page_size: page_size.max(1),
            selected: 0,
            mode: BrowseMode::Normal,
            status_message: None,
            today: Local::now().date_naive(),
            toggled: 0,
            table_state: TableState::default(),
        }
    }

    /// Number of status changes made this session.
    pub fn toggled(&self) -> usize {
        self.toggled
    }

    fn page_keys(&self) -> Vec<String> {
        apply(&self.lines, &self.state, &self.viewer, self.page_size)
            .rows
            .iter()
            .map(|line| line.key())
            .collect()
    }

    fn total_pages(&self) -> usize {
        apply(&self.lines, &self.state, &self.viewer, self.page_size).total_pages
    }

    fn set_state(&mut self, state: FilterState) {
        self.state = state;
        self.selected = 0;
    }

    fn next_page(&mut self) {
        if self.state.page < self.total_pages() {
            self.set_state(self.state.clone().with_page(self.state.page + 1));
        }
    }

    fn prev_page(&mut self) {
        if self.state.page > 1 {
            self.set_state(self.state.clone().with_page(self.state.page - 1));
        }
    }

    fn cycle_status(&mut self) {
        let next = next_choice(STATUS_CHOICES, self.state.status.as_deref());
        self.set_state(self.state.clone().with_status(Some(next)));
    }

    fn cycle_month(&mut self) {
        let mut choices = vec![ALL_MONTHS];
        choices.extend_from_slice(fixtures::MONTHS);
        let next = next_choice(&choices, self.state.period.as_deref());
        self.set_state(self.state.clone().with_period(Some(next)));
    }

    /// Flip the selected payment and recompute arrears for every line.
    fn toggle_selected(&mut self) {
        let Some(id) = self.page_keys().get(self.selected).cloned() else {
            return;
        };
        let today = self.today;
        if self.payments.modify(&id, |p| toggle_status(p, today)) {
            self.lines = ledger(self.payments.as_slice(), &self.last_month);
            self.toggled += 1;
            let status = self
                .lines
                .iter()
                .find(|l| l.payment.id == id)
                .map(|l| l.payment.status.as_str())
                .unwrap_or_default();
            tracing::info!(payment = %id, status, "payment status toggled");
            self.status_message = Some(format!("{id} marked {status}"));
        }
    }

    fn submit_input(&mut self) {
        let mode = std::mem::replace(&mut self.mode, BrowseMode::Normal);
        if let BrowseMode::GotoPage(input) = mode {
            match input.trim().parse::<usize>() {
                Ok(page) if page >= 1 && page <= self.total_pages() => {
                    self.set_state(self.state.clone().with_page(page));
                }
                _ => self.status_message = Some(format!("No page {}", input.trim())),
            }
        }
    }

    pub fn handle_key_event(&mut self, code: KeyCode) -> ReportViewAction {
        self.status_message = None;

        match &mut self.mode {
            BrowseMode::Normal => match code {
                KeyCode::Char('q') | KeyCode::Esc => return ReportViewAction::Close,
                KeyCode::Down => {
                    if self.selected + 1 < self.page_keys().len() {
                        self.selected += 1;
                    }
                }
                KeyCode::Up => self.selected = self.selected.saturating_sub(1),
                KeyCode::Char('n') | KeyCode::Right | KeyCode::PageDown => self.next_page(),
                KeyCode::Char('p') | KeyCode::Left | KeyCode::PageUp => self.prev_page(),
                KeyCode::Char('/') => self.mode = BrowseMode::Search(self.state.search_text.clone()),
                KeyCode::Char('g') => self.mode = BrowseMode::GotoPage(String::new()),
                KeyCode::Char('s') => self.cycle_status(),
                KeyCode::Char('m') => self.cycle_month(),
                KeyCode::Char('x') => self.set_state(FilterState::default()),
                KeyCode::Char(' ') | KeyCode::Char('t') => self.toggle_selected(),
                _ => {}
            },
            // Search applies as you type; Enter or Esc just leaves the prompt.
            BrowseMode::Search(text) => match code {
                KeyCode::Esc | KeyCode::Enter => self.mode = BrowseMode::Normal,
                KeyCode::Backspace => {
                    text.pop();
                    let text = text.clone();
                    self.set_state(self.state.clone().with_search(&text));
                }
                KeyCode::Char(c) => {
                    text.push(c);
                    let text = text.clone();
                    self.set_state(self.state.clone().with_search(&text));
                }
                _ => {}
            },
            BrowseMode::GotoPage(input) => match code {
                KeyCode::Esc => self.mode = BrowseMode::Normal,
                KeyCode::Enter => self.submit_input(),
                KeyCode::Backspace => {
                    input.pop();
                }
                KeyCode::Char(c) => input.push(c),
                _ => {}
            },
        }
        ReportViewAction::Continue
    }

    /// Draw the browser into the given frame.
    pub fn draw_frame(&mut self, frame: &mut Frame) {
        let areas = Layout::vertical([
            Constraint::Length(1), // title
            Constraint::Length(1), // stats
            Constraint::Fill(1),   // table
            Constraint::Length(1), // status
            Constraint::Length(1), // keys
        ])
        .split(frame.area());

        let kind = ReportKind::Payments;
        let page = apply(&self.lines, &self.state, &self.viewer, self.page_size);
        let view = project(kind, &self.registry, &page);
        let summary = page_summary(&page);
        drop(page);
        let filtered = filter_rows(&self.lines, &self.state, &self.viewer);
        let stats = collection_stats(self.payments.as_slice(), &filtered);

        let filters = self.state.describe();
        let title = if filters.is_empty() {
            "Payments Ledger".to_string()
        } else {
            format!("Payments Ledger | {filters}")
        };
        frame.render_widget(Paragraph::new(title).style(HEADER_STYLE), areas[0]);
        frame.render_widget(
            Paragraph::new(format!(
                "Collected {} of {} | Total arrears {}",
                money(stats.collected),
                money(stats.expected),
                money(stats.total_arrears),
            )),
            areas[1],
        );

        let widths: Vec<u16> = view.widths.iter().map(|w| column_width(w)).collect();
        let rows: Vec<Row> = view
            .rows
            .iter()
            .map(|row| {
                let mut height = 1;
                let cells: Vec<Cell> = row
                    .cells
                    .iter()
                    .enumerate()
                    .map(|(i, text)| {
                        if Some(i) == view.status_column {
                            return Cell::from(tui::status_span(text));
                        }
                        let (wrapped, lines) = tui::wrap_text(text, widths[i] as usize);
                        height = height.max(lines);
                        Cell::from(wrapped)
                    })
                    .collect();
                Row::new(cells).height(height)
            })
            .collect();

        if view.rows.is_empty() {
            self.table_state.select(None);
        } else {
            self.selected = self.selected.min(view.rows.len() - 1);
            self.table_state.select(Some(self.selected));
        }
        let table = Table::new(rows, widths.iter().map(|w| Constraint::Length(*w)))
            .header(Row::new(view.headers.clone()).style(HEADER_STYLE).bottom_margin(1))
            .column_spacing(1)
            .row_highlight_style(SELECTED_STYLE);
        frame.render_stateful_widget(table, areas[2], &mut self.table_state);

        let status = match &self.status_message {
            Some(msg) => format!("{summary} | {msg}"),
            None => summary,
        };
        frame.render_widget(Paragraph::new(status).style(FOOTER_STYLE), areas[3]);

        let keys = match &self.mode {
            BrowseMode::Normal => Paragraph::new(Line::from(
                "\u{2191}/\u{2193}:select  space:paid/unpaid  n/p:page  g:go to  /:search  s:status  m:month  x:clear  q:quit",
            ))
            .style(FOOTER_STYLE),
            BrowseMode::Search(text) => Paragraph::new(format!("Search resident or invoice: {text}\u{2588}")),
            BrowseMode::GotoPage(input) => Paragraph::new(format!("Go to page: {input}\u{2588}")),
        };
        frame.render_widget(keys, areas[4]);
    }
}

impl ReportView for LedgerBrowser {
    fn draw(&mut self, frame: &mut Frame) {
        self.draw_frame(frame);
    }

    fn handle_key(&mut self, code: KeyCode) -> ReportViewAction {
        self.handle_key_event(code)
    }
}
