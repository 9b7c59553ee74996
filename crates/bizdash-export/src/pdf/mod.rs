//! # PDF Layout
//!
//! Shared drawing surface for the report and single-invoice exporters.
//!
//! ## Coordinate System
//! ```text
//! ┌──────────────────────────────┐ ▲ height (mm)
//! │ (MARGIN, height - MARGIN)    │ │
//! │   text baseline moves DOWN   │ │
//! │   as the cursor advances     │ │
//! │                              │ │
//! │ Page n of m   (footer y=10)  │ │
//! └──────────────────────────────┘ ● (0,0) bottom-left
//! ```
//!
//! Text uses the built-in Helvetica pair, which only covers WinAnsi. Strings
//! pass through [`pdf_text`] and amounts use the `Rs. ` currency prefix.

pub mod invoice;
pub mod report;

use std::io::BufWriter;

use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerIndex,
    PdfLayerReference, PdfPageIndex, Point,
};

use crate::error::{ExportError, ExportResult};

/// Page dimensions in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

pub const A4_PORTRAIT: PageSize = PageSize {
    width: 210.0,
    height: 297.0,
};

pub const A4_LANDSCAPE: PageSize = PageSize {
    width: 297.0,
    height: 210.0,
};

pub const MARGIN: f32 = 15.0;
pub const FOOTER_Y: f32 = 10.0;

/// Approximate Helvetica advance per character, as a fraction of the font size.
const AVG_CHAR_WIDTH_EM: f32 = 0.5;
const PT_TO_MM: f32 = 25.4 / 72.0;

/// A multi-page document with a regular and a bold font.
pub struct PdfCanvas {
    doc: PdfDocumentReference,
    pages: Vec<(PdfPageIndex, PdfLayerIndex)>,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    size: PageSize,
}

impl PdfCanvas {
    pub fn new(title: &str, size: PageSize) -> ExportResult<Self> {
        let (doc, page, layer) =
            PdfDocument::new(pdf_text(title), Mm(size.width), Mm(size.height), "Layer 1");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(ExportError::pdf)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(ExportError::pdf)?;

        Ok(PdfCanvas {
            doc,
            pages: vec![(page, layer)],
            regular,
            bold,
            size,
        })
    }

    pub fn size(&self) -> PageSize {
        self.size
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Appends a page; subsequent drawing lands on it.
    pub fn new_page(&mut self) {
        let label = format!("Layer {}", self.pages.len() + 1);
        let (page, layer) = self
            .doc
            .add_page(Mm(self.size.width), Mm(self.size.height), label);
        self.pages.push((page, layer));
    }

    fn layer(&self, page_no: usize) -> Option<PdfLayerReference> {
        self.pages
            .get(page_no)
            .map(|(page, layer)| self.doc.get_page(*page).get_layer(*layer))
    }

    fn current(&self) -> Option<PdfLayerReference> {
        self.layer(self.pages.len().saturating_sub(1))
    }

    pub fn text(&self, text: &str, font_size: f32, x: f32, y: f32) {
        if let Some(layer) = self.current() {
            layer.use_text(pdf_text(text), font_size, Mm(x), Mm(y), &self.regular);
        }
    }

    pub fn bold(&self, text: &str, font_size: f32, x: f32, y: f32) {
        if let Some(layer) = self.current() {
            layer.use_text(pdf_text(text), font_size, Mm(x), Mm(y), &self.bold);
        }
    }

    /// Text ending at `x_right`, using an estimated width.
    pub fn text_right(&self, text: &str, font_size: f32, x_right: f32, y: f32, bold: bool) {
        let x = (x_right - estimate_width_mm(text, font_size)).max(0.0);
        if bold {
            self.bold(text, font_size, x, y);
        } else {
            self.text(text, font_size, x, y);
        }
    }

    /// Horizontal rule on the current page.
    pub fn rule(&self, x1: f32, x2: f32, y: f32, thickness: f32) {
        if let Some(layer) = self.current() {
            layer.set_outline_thickness(thickness);
            layer.add_line(Line {
                points: vec![
                    (Point::new(Mm(x1), Mm(y)), false),
                    (Point::new(Mm(x2), Mm(y)), false),
                ],
                is_closed: false,
            });
        }
    }

    /// Stamps `Page n of m` on every page, bottom right.
    pub fn stamp_page_numbers(&self) {
        let total = self.pages.len();
        for page_no in 0..total {
            if let Some(layer) = self.layer(page_no) {
                let label = format!("Page {} of {}", page_no + 1, total);
                let x = self.size.width - MARGIN - estimate_width_mm(&label, 8.0);
                layer.use_text(label, 8.0, Mm(x), Mm(FOOTER_Y), &self.regular);
            }
        }
    }

    /// Serializes the document.
    pub fn finish(self) -> ExportResult<Vec<u8>> {
        let mut writer = BufWriter::new(Vec::<u8>::new());
        self.doc.save(&mut writer).map_err(ExportError::pdf)?;
        writer.into_inner().map_err(ExportError::pdf)
    }
}

/// Estimated rendered width in millimetres.
pub fn estimate_width_mm(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * AVG_CHAR_WIDTH_EM * PT_TO_MM
}

/// Restricts text to printable ASCII; anything else becomes `?`.
pub fn pdf_text(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            c if c == ' ' || c.is_ascii_graphic() => c,
            c if c.is_whitespace() => ' ',
            _ => '?',
        })
        .collect()
}

/// Cuts `text` to `max_chars`, marking the cut with `..`.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(2);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("..");
    out
}

/// Greedy word wrap at `max_chars`. Words longer than a line stay whole.
pub fn wrap_lines(text: &str, max_chars: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.chars().count() + 1 + word.chars().count() <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            out.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }

    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// Splits `count` rows into pages: the first page holds `first` rows, every
/// other page `rest`. Always returns at least one (possibly empty) page.
pub fn plan_pages(count: usize, first: usize, rest: usize) -> Vec<std::ops::Range<usize>> {
    let first = first.max(1);
    let rest = rest.max(1);

    let mut pages = vec![0..count.min(first)];
    let mut start = count.min(first);
    while start < count {
        let end = (start + rest).min(count);
        pages.push(start..end);
        start = end;
    }
    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_text_is_ascii() {
        assert_eq!(pdf_text("₹500"), "?500");
        assert_eq!(pdf_text("Café\tBar"), "Caf? Bar");
        assert_eq!(pdf_text("INV-2025/01"), "INV-2025/01");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("John Doe", 20), "John Doe");
        assert_eq!(truncate("A very long customer name", 10), "A very l..");
    }

    #[test]
    fn test_wrap_lines() {
        assert_eq!(
            wrap_lines("12 MG Road, Camp, Pune 411001", 12),
            vec!["12 MG Road,", "Camp, Pune", "411001"]
        );
        assert!(wrap_lines("   ", 10).is_empty());
    }

    #[test]
    fn test_plan_pages() {
        assert_eq!(plan_pages(0, 20, 25), vec![0..0]);
        assert_eq!(plan_pages(5, 20, 25), vec![0..5]);
        assert_eq!(plan_pages(50, 20, 25), vec![0..20, 20..45, 45..50]);

        let pages = plan_pages(123, 20, 25);
        let covered: usize = pages.iter().map(|r| r.len()).sum();
        assert_eq!(covered, 123);
    }

    #[test]
    fn test_canvas_produces_pdf() {
        let mut canvas = PdfCanvas::new("Test", A4_PORTRAIT).unwrap();
        canvas.text("Hello", 12.0, MARGIN, 280.0);
        canvas.new_page();
        canvas.rule(MARGIN, 195.0, 270.0, 0.5);
        canvas.stamp_page_numbers();
        assert_eq!(canvas.page_count(), 2);

        let bytes = canvas.finish().unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
