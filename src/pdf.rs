use std::io::BufWriter;

use printpdf::*;

use crate::error::{EmsError, Result};
use crate::report::catalog::Orientation;
use crate::report::print::PrintContext;
use crate::report::{cell_text, ColumnRegistry, Record, ReportKind};

// A4 (mm)
const A4_SHORT: f32 = 210.0;
const A4_LONG: f32 = 297.0;
const MARGIN: f32 = 12.0;
const ROW_H: f32 = 6.0;
const FONT_SIZE: f32 = 9.0;
const TITLE_SIZE: f32 = 16.0;
const SUBTITLE_SIZE: f32 = 10.0;
/// Width given to each blank fill-in column, in the same px units as column widths.
const FILL_IN_PX: f32 = 80.0;

fn approx_text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.18
}

/// The builtin fonts only cover Latin text; anything else prints as '?'.
fn latin(text: &str) -> String {
    text.chars().map(|c| if c.is_ascii() { c } else { '?' }).collect()
}

/// Cut `text` so it fits in `width` mm at `size`.
fn fit(text: &str, width: f32, size: f32) -> String {
    let max = ((width - 1.0) / (size * 0.18)).floor().max(1.0) as usize;
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
        cut.push('.');
        cut
    }
}

/// "150px" -> 150.0; anything unparsable counts as 100.
fn css_width(width: &str) -> f32 {
    width
        .trim()
        .trim_end_matches("px")
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|w| *w > 0.0)
        .unwrap_or(100.0)
}

struct PdfWriter {
    doc: PdfDocumentReference,
    font: IndirectFontRef,
    font_bold: IndirectFontRef,
    current_page: PdfPageIndex,
    current_layer: PdfLayerIndex,
    page_w: f32,
    page_h: f32,
    y: f32,
}

impl PdfWriter {
    fn new(title: &str, orientation: Orientation) -> Result<Self> {
        let (page_w, page_h) = match orientation {
            Orientation::Portrait => (A4_SHORT, A4_LONG),
            Orientation::Landscape => (A4_LONG, A4_SHORT),
        };
        let (doc, page, layer) = PdfDocument::new(title, Mm(page_w), Mm(page_h), "Layer 1");
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| EmsError::Pdf(format!("{e:?}")))?;
        let font_bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| EmsError::Pdf(format!("{e:?}")))?;
        Ok(Self {
            doc,
            font,
            font_bold,
            current_page: page,
            current_layer: layer,
            page_w,
            page_h,
            y: MARGIN,
        })
    }

    fn content_width(&self) -> f32 {
        self.page_w - 2.0 * MARGIN
    }

    fn pdf_y(&self) -> f32 {
        self.page_h - self.y
    }

    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(self.page_w), Mm(self.page_h), "Layer");
        self.current_page = page;
        self.current_layer = layer;
        self.y = MARGIN;
    }

    /// Returns true when a page break happened.
    fn ensure_space(&mut self, needed: f32) -> bool {
        if self.y + needed > self.page_h - MARGIN {
            self.new_page();
            return true;
        }
        false
    }

    fn text(&self, s: &str, x: f32, size: f32, bold: bool) {
        let font = if bold { self.font_bold.clone() } else { self.font.clone() };
        let layer = self.doc.get_page(self.current_page).get_layer(self.current_layer);
        layer.use_text(latin(s), size, Mm(x), Mm(self.pdf_y()), &font);
    }

    fn text_right(&self, s: &str, right: f32, size: f32, bold: bool) {
        self.text(s, right - approx_text_width(s, size), size, bold);
    }

    fn hline(&self, x1: f32, x2: f32) {
        let layer = self.doc.get_page(self.current_page).get_layer(self.current_layer);
        layer.set_outline_thickness(0.5);
        let line = Line {
            points: vec![
                (Point::new(Mm(x1), Mm(self.pdf_y())), false),
                (Point::new(Mm(x2), Mm(self.pdf_y())), false),
            ],
            is_closed: false,
        };
        layer.add_line(line);
    }

    fn separator(&mut self) {
        self.hline(MARGIN, self.page_w - MARGIN);
        self.y += 2.0;
    }

    fn header(&mut self, title: &str, lines: &[&str]) {
        self.y += 4.0;
        self.text(title, MARGIN, TITLE_SIZE, true);
        self.y += 7.0;
        for line in lines.iter().filter(|l| !l.is_empty()) {
            self.text(line, MARGIN, SUBTITLE_SIZE, false);
            self.y += 5.0;
        }
        self.separator();
        self.y += 3.0;
    }

    fn table_row(&mut self, widths: &[f32], values: &[String], bold: bool) {
        let mut x = MARGIN;
        for (width, value) in widths.iter().zip(values) {
            self.text(&fit(value, *width, FONT_SIZE), x + 1.0, FONT_SIZE, bold);
            x += width;
        }
        self.y += ROW_H;
    }

    fn to_bytes(self) -> Result<Vec<u8>> {
        let mut buf = BufWriter::new(Vec::new());
        self.doc
            .save(&mut buf)
            .map_err(|e| EmsError::Pdf(format!("{e:?}")))?;
        buf.into_inner().map_err(|e| EmsError::Pdf(e.to_string()))
    }
}

/// Render the print layout of a report to PDF. Column headers use the
/// screen labels since the builtin fonts have no Khmer glyphs.
pub fn render_report<T: Record>(
    kind: ReportKind,
    ctx: &PrintContext,
    registry: &ColumnRegistry,
    rows: &[&T],
) -> Result<Vec<u8>> {
    let layout = kind.print_layout();
    let mut pdf = PdfWriter::new(&ctx.header.title, layout.orientation)?;

    let title = if ctx.header.title.is_ascii() {
        ctx.header.title.clone()
    } else {
        format!("{} report", kind.sheet_name())
    };
    let place = ctx.header.place_line();
    let section = ctx.section.clone().unwrap_or_default();
    let stamp = format!("Generated {}", ctx.printed_on);
    let mut lines: Vec<&str> = Vec::new();
    if let Some(subtitle) = &ctx.header.subtitle {
        lines.push(subtitle);
    }
    if place.is_ascii() {
        lines.push(&place);
    }
    lines.push(&section);
    lines.push(&stamp);
    pdf.header(&title, &lines);

    let mut headers: Vec<String> = registry.iter().map(|c| c.label.clone()).collect();
    let mut px: Vec<f32> = registry.iter().map(|c| css_width(&c.width)).collect();
    for group in layout.groups {
        for (label, _) in group.sub_columns {
            headers.push(format!("{} {}", group.label, label));
            px.push(FILL_IN_PX);
        }
    }
    let total_px: f32 = px.iter().sum();
    let scale = pdf.content_width() / total_px;
    let widths: Vec<f32> = px.iter().map(|w| w * scale).collect();
    let blank = headers.len() - registry.len();

    pdf.table_row(&widths, &headers, true);
    pdf.separator();
    for (i, row) in rows.iter().enumerate() {
        if pdf.ensure_space(ROW_H) {
            pdf.table_row(&widths, &headers, true);
            pdf.separator();
        }
        let mut values: Vec<String> = registry.iter().map(|col| cell_text(*row, col, i + 1, "")).collect();
        values.extend(std::iter::repeat(String::new()).take(blank));
        pdf.table_row(&widths, &values, false);
    }
    pdf.separator();

    if !ctx.summary.is_empty() {
        pdf.y += ROW_H;
        let right = pdf.page_w - MARGIN;
        for (label, value) in &ctx.summary {
            pdf.ensure_space(ROW_H);
            pdf.text_right(label, right - 40.0, FONT_SIZE, true);
            pdf.text_right(value, right, FONT_SIZE, true);
            pdf.y += ROW_H;
        }
    }

    if !layout.signature.is_empty() || !layout.footer.is_empty() {
        pdf.y += ROW_H * 2.0;
        pdf.ensure_space(ROW_H * 3.0);
        let top = pdf.y;
        for line in layout.signature {
            pdf.text(line, MARGIN, FONT_SIZE, false);
            pdf.y += ROW_H;
        }
        pdf.y = top;
        let right = pdf.page_w - MARGIN;
        for line in layout.footer {
            pdf.text_right(line, right, FONT_SIZE - 1.0, false);
            pdf.y += ROW_H;
        }
    }

    tracing::debug!(report = %kind, rows = rows.len(), "rendered pdf");
    pdf.to_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::payments::ledger;
    use crate::report::filter::{filter_rows, FilterState, Viewer};

    #[test]
    fn test_render_attendance_produces_pdf() {
        let rows = fixtures::attendance();
        let all = filter_rows(&rows, &FilterState::default(), &Viewer::Admin);
        let kind = ReportKind::Attendance;
        let ctx = PrintContext::new(kind.header("Wat Chhuk Va", "Phnom Penh"));
        let bytes = render_report(kind, &ctx, &kind.default_columns(), &all).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_payments_with_many_rows_produces_pdf() {
        let mut payments = fixtures::payments();
        for _ in 0..12 {
            payments.extend(fixtures::payments());
        }
        let lines = ledger(&payments, fixtures::LAST_MONTH);
        let all = filter_rows(&lines, &FilterState::default(), &Viewer::Admin);
        let kind = ReportKind::Payments;
        let ctx = PrintContext::new(kind.header("", ""))
            .with_section("Collection Summary: All Months")
            .with_summary(vec![("GRAND TOTAL".into(), "$1.00".into())]);
        let bytes = render_report(kind, &ctx, &kind.default_columns(), &all).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_helpers() {
        assert_eq!(css_width("150px"), 150.0);
        assert_eq!(css_width("wide"), 100.0);
        assert_eq!(latin("ល.រ"), "?.?");
        assert_eq!(fit("Venerable Vann Sophea", 10.0, 9.0), "Vene.");
        assert_eq!(fit("Sokha", 40.0, 9.0), "Sokha");
    }
}
