//! # Box Label Renderer
//!
//! Turns one `BoxLabelRequest` into a PDF with one page per box. Rendering is
//! split in two steps:
//!
//! 1.  **Layout**: `layout_pages` computes, for every page, the text runs,
//!     horizontal rules and QR placement in PDF points (origin bottom-left of a
//!     US-letter page). This step is pure and holds no drawing state.
//! 2.  **Drawing**: `render` encodes the QR matrix once, then replays each
//!     page layout onto a `printpdf` document using the built-in Helvetica
//!     faces, and serializes the document to memory.
//!
//! Every element is positioned relative to a 400 pt wide block centered on the
//! page. Any failure aborts the whole document.

use common::requests::BoxLabelRequest;
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Polygon, Pt,
};
use qrcode::types::QrError;
use qrcode::{Color, EcLevel, QrCode};
use thiserror::Error;

const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const BLOCK_WIDTH: f32 = 400.0;

const TITLE: &str = "OUTRIGHT - HANDYMAN";
const TITLE_SIZE: f32 = 18.0;
const BODY_SIZE: f32 = 12.0;
const LINE_HEIGHT: f32 = 20.0;
const RULE_THICKNESS: f32 = 1.0;

const VALUE_COLUMN: f32 = 150.0;
const QTY_COLUMN: f32 = 200.0;
const BOX_COUNT_COLUMN: f32 = 160.0;
const AREA_CODE_COLUMN: f32 = 280.0;

const QR_SIZE: f32 = 80.0;
const QR_GAP: f32 = 100.0;
/// Light modules kept around the symbol, inside the `QR_SIZE` square.
const QR_QUIET_ZONE: usize = 4;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("box_count must be at least 1")]
    NoPages,
    #[error("QR code encoding failed: {0}")]
    Qr(#[from] QrError),
    #[error("PDF writer failed: {0}")]
    Pdf(#[from] printpdf::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Regular,
    Bold,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub face: Face,
}

/// A horizontal rule spanning the label block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rule {
    pub x1: f32,
    pub x2: f32,
    pub y: f32,
}

/// Square area reserved for the QR symbol; `x`/`y` is its lower-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct QrPlacement {
    pub payload: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

/// Everything drawn on one box page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    /// 1-based box number.
    pub index: u32,
    pub texts: Vec<TextRun>,
    pub rules: Vec<Rule>,
    pub qr: QrPlacement,
}

impl PageLayout {
    pub fn has_text(&self, text: &str) -> bool {
        self.texts.iter().any(|run| run.text == text)
    }
}

/// Builds the per-page layout of every box page for `request`.
pub fn layout_pages(request: &BoxLabelRequest) -> Result<Vec<PageLayout>, RenderError> {
    if request.box_count == 0 {
        return Err(RenderError::NoPages);
    }
    Ok((1..=request.box_count)
        .map(|index| layout_page(request, index))
        .collect())
}

/// Collects drawing instructions while walking down the page.
struct PageBuilder {
    left: f32,
    texts: Vec<TextRun>,
    rules: Vec<Rule>,
}

impl PageBuilder {
    fn new() -> Self {
        Self {
            left: (PAGE_WIDTH - BLOCK_WIDTH) / 2.0,
            texts: Vec::new(),
            rules: Vec::new(),
        }
    }

    fn rule(&mut self, y: f32) {
        self.rules.push(Rule {
            x1: self.left,
            x2: self.left + BLOCK_WIDTH,
            y,
        });
    }

    fn text(&mut self, column: f32, y: f32, text: impl Into<String>) {
        self.texts.push(TextRun {
            text: text.into(),
            x: self.left + column,
            y,
            size: BODY_SIZE,
            face: Face::Regular,
        });
    }

    fn centered_title(&mut self, y: f32) {
        let width = bold_text_width(TITLE, TITLE_SIZE);
        self.texts.push(TextRun {
            text: TITLE.to_string(),
            x: PAGE_WIDTH / 2.0 - width / 2.0,
            y,
            size: TITLE_SIZE,
            face: Face::Bold,
        });
    }
}

fn layout_page(request: &BoxLabelRequest, index: u32) -> PageLayout {
    let mut page = PageBuilder::new();

    // Title band.
    let band = PAGE_HEIGHT - 80.0;
    page.rule(band + 40.0);
    page.centered_title(PAGE_HEIGHT - 65.0);
    page.rule(band + 5.0);

    // Label / value rows.
    let mut y = PAGE_HEIGHT - 100.0;
    let rows = [
        ("Vendor Name:", &request.vendor_name),
        ("PO#:", &request.po_number),
        ("Store Code and Name:", &request.store_code),
        ("Delivery Date:", &request.delivery_date),
    ];
    for (label, value) in rows {
        page.text(0.0, y, label);
        page.text(VALUE_COLUMN, y, value.as_str());
        y -= LINE_HEIGHT;
    }

    // SKU table.
    y -= 10.0;
    page.rule(y + 10.0);
    page.text(0.0, y - 5.0, "SKU / BARCODE");
    page.text(QTY_COLUMN, y - 5.0, "QTY");
    page.rule(y - 10.0);
    y -= 20.0;
    page.text(0.0, y - 5.0, request.sku_barcode.as_str());
    page.text(QTY_COLUMN, y - 5.0, request.quantity.to_string());

    // Case / box / area row.
    y -= 20.0;
    page.rule(y - 5.0);
    page.text(0.0, y - 20.0, "CASE ID");
    page.text(BOX_COUNT_COLUMN, y - 20.0, "BOX COUNT");
    page.text(AREA_CODE_COLUMN, y - 20.0, "AREA CODE");
    page.rule(y - 25.0);
    y -= 40.0;
    page.text(0.0, y, request.case_id.as_str());
    page.text(
        BOX_COUNT_COLUMN,
        y,
        format!("{} OF {}", index, request.box_count),
    );
    page.text(AREA_CODE_COLUMN, y, request.area_code.as_str());

    PageLayout {
        index,
        qr: QrPlacement {
            payload: request.case_id.clone(),
            x: page.left,
            y: y - QR_GAP,
            size: QR_SIZE,
        },
        texts: page.texts,
        rules: page.rules,
    }
}

/// Renders the complete document for `request` into memory.
pub fn render(request: &BoxLabelRequest) -> Result<Vec<u8>, RenderError> {
    let pages = layout_pages(request)?;

    let title = format!("Box Label - {}", request.vendor_name);
    let (doc, first_page, first_layer) =
        PdfDocument::new(title, pt(PAGE_WIDTH), pt(PAGE_HEIGHT), "Box 1");
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

    let mut encoded: Option<(&str, QrCode)> = None;
    for page in &pages {
        // Pages of one document share a payload; re-encode only when it changes.
        let qr = match encoded.take() {
            Some((payload, qr)) if payload == page.qr.payload => (payload, qr),
            _ => (page.qr.payload.as_str(), encode_qr(&page.qr.payload)?),
        };
        let qr = encoded.insert(qr);

        let layer = if page.index == 1 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_idx, layer_idx) = doc.add_page(
                pt(PAGE_WIDTH),
                pt(PAGE_HEIGHT),
                format!("Box {}", page.index),
            );
            doc.get_page(page_idx).get_layer(layer_idx)
        };
        draw_page(&layer, page, &qr.1, &regular, &bold);
    }

    Ok(doc.save_to_bytes()?)
}

fn draw_page(
    layer: &PdfLayerReference,
    page: &PageLayout,
    qr: &QrCode,
    regular: &IndirectFontRef,
    bold: &IndirectFontRef,
) {
    layer.set_outline_thickness(RULE_THICKNESS);
    for rule in &page.rules {
        layer.add_line(Line {
            points: vec![(point(rule.x1, rule.y), false), (point(rule.x2, rule.y), false)],
            is_closed: false,
        });
    }

    for run in &page.texts {
        let font = match run.face {
            Face::Regular => regular,
            Face::Bold => bold,
        };
        layer.use_text(run.text.as_str(), run.size, pt(run.x), pt(run.y), font);
    }

    draw_qr(layer, qr, &page.qr);
}

/// Draws the dark modules of `qr` as filled squares, merging horizontal runs
/// so each row costs one path per run instead of one per module.
fn draw_qr(layer: &PdfLayerReference, qr: &QrCode, placement: &QrPlacement) {
    let width = qr.width();
    let module = placement.size / (width + 2 * QR_QUIET_ZONE) as f32;
    let colors = qr.to_colors();

    for row in 0..width {
        let top = placement.y + placement.size - (QR_QUIET_ZONE + row) as f32 * module;
        let bottom = top - module;
        let mut col = 0;
        while col < width {
            if colors[row * width + col] != Color::Dark {
                col += 1;
                continue;
            }
            let start = col;
            while col < width && colors[row * width + col] == Color::Dark {
                col += 1;
            }
            let x1 = placement.x + (QR_QUIET_ZONE + start) as f32 * module;
            let x2 = placement.x + (QR_QUIET_ZONE + col) as f32 * module;
            layer.add_polygon(Polygon {
                rings: vec![vec![
                    (point(x1, bottom), false),
                    (point(x2, bottom), false),
                    (point(x2, top), false),
                    (point(x1, top), false),
                ]],
                mode: PaintMode::Fill,
                winding_order: WindingOrder::NonZero,
            });
        }
    }
}

/// Encodes a QR payload at error-correction level L, the densest level,
/// so the longest case ids still fit.
fn encode_qr(payload: &str) -> Result<QrCode, QrError> {
    QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::L)
}

fn pt(value: f32) -> Mm {
    Mm::from(Pt(value))
}

fn point(x: f32, y: f32) -> Point {
    Point::new(pt(x), pt(y))
}

/// Advance width of `text` set in Helvetica-Bold at `size` points.
///
/// Widths are the standard AFM metrics (1/1000 em) for printable ASCII;
/// anything else is measured as a digit.
fn bold_text_width(text: &str, size: f32) -> f32 {
    let units: u32 = text.chars().map(helvetica_bold_advance).sum();
    units as f32 * size / 1000.0
}

fn helvetica_bold_advance(c: char) -> u32 {
    const ADVANCES: [u32; 95] = [
        278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
        333, 333, 584, 584, 584, 611, 975, // ':'..'@'
        722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // 'A'..'M'
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
        333, 278, 333, 584, 556, 333, // '['..'`'
        556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // 'a'..'m'
        611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // 'n'..'z'
        389, 280, 389, 584, // '{'..'~'
    ];
    match c {
        ' '..='~' => ADVANCES[c as usize - ' ' as usize],
        _ => 556,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(box_count: u32) -> BoxLabelRequest {
        BoxLabelRequest {
            vendor_name: "Acme Corp".into(),
            po_number: "PO123".into(),
            store_code: "ST01".into(),
            delivery_date: "2024-01-01".into(),
            sku_barcode: "SKU999".into(),
            quantity: 10,
            case_id: "CASE42".into(),
            box_count,
            area_code: "A1".into(),
        }
    }

    #[test]
    fn one_layout_per_box() {
        for n in [1, 2, 5] {
            let pages = layout_pages(&request(n)).unwrap();
            assert_eq!(pages.len(), n as usize);
            for (i, page) in pages.iter().enumerate() {
                assert_eq!(page.index, i as u32 + 1);
                assert!(page.has_text(&format!("{} OF {}", i + 1, n)));
            }
        }
    }

    #[test]
    fn zero_boxes_is_an_error() {
        assert!(matches!(
            layout_pages(&request(0)),
            Err(RenderError::NoPages)
        ));
        assert!(matches!(render(&request(0)), Err(RenderError::NoPages)));
    }

    #[test]
    fn qr_carries_case_id_on_every_page() {
        let pages = layout_pages(&request(4)).unwrap();
        assert!(pages.iter().all(|p| p.qr.payload == "CASE42"));
        assert!(pages.windows(2).all(|w| w[0].qr == w[1].qr));
    }

    #[test]
    fn fields_are_printed_verbatim() {
        let page = &layout_pages(&request(1)).unwrap()[0];
        for text in [
            "OUTRIGHT - HANDYMAN",
            "Vendor Name:",
            "Acme Corp",
            "PO123",
            "ST01",
            "2024-01-01",
            "SKU / BARCODE",
            "SKU999",
            "10",
            "CASE ID",
            "BOX COUNT",
            "AREA CODE",
            "CASE42",
            "A1",
        ] {
            assert!(page.has_text(text), "missing {text:?}");
        }
    }

    #[test]
    fn block_is_centered_and_values_offset() {
        let page = &layout_pages(&request(1)).unwrap()[0];
        for rule in &page.rules {
            assert_eq!(rule.x1, 106.0);
            assert_eq!(rule.x2, 506.0);
        }
        let label = page.texts.iter().find(|r| r.text == "PO#:").unwrap();
        let value = page.texts.iter().find(|r| r.text == "PO123").unwrap();
        assert_eq!(value.x - label.x, 150.0);
        assert_eq!(label.y, value.y);

        let vendor = page.texts.iter().find(|r| r.text == "Vendor Name:").unwrap();
        assert_eq!(vendor.y - label.y, 20.0);

        let title = page.texts.iter().find(|r| r.face == Face::Bold).unwrap();
        let width = bold_text_width(&title.text, title.size);
        assert!((title.x + width / 2.0 - PAGE_WIDTH / 2.0).abs() < 0.01);
    }

    #[test]
    fn qr_sits_below_the_case_row() {
        let page = &layout_pages(&request(1)).unwrap()[0];
        let case_row = page.texts.iter().find(|r| r.text == "CASE42").unwrap();
        assert_eq!(page.qr.x, 106.0);
        assert_eq!(page.qr.size, 80.0);
        assert!(page.qr.y + page.qr.size < case_row.y);
        assert!(page.qr.y > 0.0);
    }

    #[test]
    fn renders_a_pdf_with_one_page_per_box() {
        let bytes = render(&request(3)).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
    }

    #[test]
    fn oversized_case_id_fails_qr_encoding() {
        // Beyond the 4296 alphanumeric characters of a version 40-L symbol.
        let mut req = request(2);
        req.case_id = "X".repeat(8000);
        assert!(matches!(render(&req), Err(RenderError::Qr(_))));
    }

    #[test]
    fn long_case_id_fits_at_low_error_correction() {
        // 3500 characters exceed level M (3391) but fit level L (4296).
        let mut req = request(1);
        req.case_id = "X".repeat(3500);
        let bytes = render(&req).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    /// Horizontal runs of dark modules in the symbol for `payload`.
    fn dark_runs(payload: &str) -> usize {
        let qr = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::L).unwrap();
        let width = qr.width();
        let colors = qr.to_colors();
        (0..width)
            .map(|row| {
                (0..width)
                    .filter(|&col| {
                        colors[row * width + col] == Color::Dark
                            && (col == 0 || colors[row * width + col - 1] != Color::Dark)
                    })
                    .count()
            })
            .sum()
    }

    /// Number of filled paths on each page of a rendered document.
    fn filled_paths(bytes: &[u8]) -> Vec<usize> {
        let mut doc = lopdf::Document::load_mem(bytes).unwrap();
        doc.decompress();
        doc.get_pages()
            .values()
            .map(|&page_id| {
                let raw = doc.get_page_content(page_id).unwrap();
                lopdf::content::Content::decode(&raw)
                    .unwrap()
                    .operations
                    .iter()
                    .filter(|op| op.operator == "f" || op.operator == "f*")
                    .count()
            })
            .collect()
    }

    #[test]
    fn drawn_qr_matches_case_id_on_every_page() {
        for case_id in ["CASE42", "https://example.com/cases/0001-ZZ"] {
            let mut req = request(3);
            req.case_id = case_id.into();
            let expected = dark_runs(case_id);
            let counts = filled_paths(&render(&req).unwrap());
            assert_eq!(counts, vec![expected; 3], "case id {case_id:?}");
        }
    }
}
