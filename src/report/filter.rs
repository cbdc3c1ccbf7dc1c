use super::Record;

/// Rows per page in the on-screen tables.
pub const DEFAULT_PAGE_SIZE: usize = 8;

const ALL_STATUS: &str = "All";
const ALL_MONTHS: &str = "All Months";

/// Who is looking at the report.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Viewer {
    #[default]
    Admin,
    Manager,
    /// A resident only sees rows they own.
    Resident(String),
}

impl Viewer {
    pub fn can_see<T: Record>(&self, row: &T) -> bool {
        match self {
            Viewer::Admin | Viewer::Manager => true,
            Viewer::Resident(name) => row.owner().map_or(true, |owner| owner == name.as_str()),
        }
    }

    pub fn is_resident(&self) -> bool {
        matches!(self, Viewer::Resident(_))
    }
}

/// Current search, filters and page. Derived from user input each time;
/// never stored.
///
/// Changing the search text or a filter moves back to page 1; only
/// `with_page` keeps the filters and changes the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub search_text: String,
    pub status: Option<String>,
    pub period: Option<String>,
    /// 1-based.
    pub page: usize,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            status: None,
            period: None,
            page: 1,
        }
    }
}

impl FilterState {
    pub fn with_search(mut self, text: &str) -> Self {
        self.search_text = text.to_string();
        self.page = 1;
        self
    }

    /// `"All"` (or nothing) clears the status filter.
    pub fn with_status(mut self, status: Option<&str>) -> Self {
        self.status = status
            .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case(ALL_STATUS))
            .map(str::to_string);
        self.page = 1;
        self
    }

    /// `"All Months"` (or nothing) clears the period filter.
    pub fn with_period(mut self, period: Option<&str>) -> Self {
        self.period = period
            .filter(|p| !p.is_empty() && !p.eq_ignore_ascii_case(ALL_MONTHS))
            .map(str::to_string);
        self.page = 1;
        self
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page.max(1);
        self
    }

    /// Short description of the active filters for headers and status lines.
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if !self.search_text.is_empty() {
            parts.push(format!("search \"{}\"", self.search_text));
        }
        if let Some(status) = &self.status {
            parts.push(format!("status {status}"));
        }
        if let Some(period) = &self.period {
            parts.push(period.clone());
        }
        parts.join(", ")
    }

    fn matches<T: Record>(&self, row: &T) -> bool {
        if !self.search_text.is_empty() {
            let fields = row.search_fields();
            if !fields.is_empty() {
                let needle = self.search_text.to_lowercase();
                if !fields.iter().any(|f| f.to_lowercase().contains(&needle)) {
                    return false;
                }
            }
        }
        if let Some(status) = &self.status {
            if row.status() != Some(status.as_str()) {
                return false;
            }
        }
        if let Some(period) = &self.period {
            if row.period() != Some(period.as_str()) {
                return false;
            }
        }
        true
    }
}

/// One page of filtered rows.
#[derive(Debug)]
pub struct Page<'a, T> {
    pub rows: Vec<&'a T>,
    /// 1-based page number that was requested.
    pub page: usize,
    pub total_pages: usize,
    /// Rows matching the filters across all pages.
    pub total_rows: usize,
    /// Position of the first row of this page within the filtered set.
    pub offset: usize,
}

impl<T> Page<'_, T> {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

/// Apply visibility, search, status and period filters, keeping row order.
/// This is the full filtered set shared by print and export.
pub fn filter_rows<'a, T: Record>(rows: &'a [T], state: &FilterState, viewer: &Viewer) -> Vec<&'a T> {
    let filtered: Vec<&T> = rows
        .iter()
        .filter(|row| viewer.can_see(*row))
        .filter(|row| state.matches(*row))
        .collect();
    tracing::debug!(total = rows.len(), matched = filtered.len(), filters = %state.describe(), "filtered rows");
    filtered
}

/// Slice the filtered set into fixed-size pages. A page past the end is empty.
pub fn paginate<T>(filtered: Vec<&T>, page: usize, page_size: usize) -> Page<'_, T> {
    let page = page.max(1);
    let page_size = page_size.max(1);
    let total_rows = filtered.len();
    let total_pages = total_rows.div_ceil(page_size);
    let offset = (page - 1).saturating_mul(page_size);
    let rows = filtered.into_iter().skip(offset).take(page_size).collect();
    Page { rows, page, total_pages, total_rows, offset }
}

/// Filter then paginate. Pure: the same rows and state always give the same page.
pub fn apply<'a, T: Record>(
    rows: &'a [T],
    state: &FilterState,
    viewer: &Viewer,
    page_size: usize,
) -> Page<'a, T> {
    paginate(filter_rows(rows, state, viewer), state.page, page_size)
}
