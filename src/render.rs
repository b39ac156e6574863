//! Low-level PDF op emission using `printpdf` (v0.8 ops-based API).
//!
//! Everything above this module thinks in millimetres measured from the top
//! left of the page, with text positioned by baseline. The helpers here
//! convert to printpdf's bottom-left point coordinates and keep the builtin
//! Helvetica + WinAnsi handling in one place.

use printpdf::*;

use crate::fonts::{TextMeasurer, MM_PER_PT};

/// A registered image XObject together with its source pixel dimensions.
#[derive(Debug, Clone)]
pub struct EmbeddedImage {
    pub xobj_id: XObjectId,
    pub px_width: u32,
    pub px_height: u32,
}

/// Millimetres → PDF points.
pub fn pt(mm: f32) -> Pt {
    Pt(mm / MM_PER_PT)
}

pub fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb(Rgb {
        r: f32::from(r) / 255.0,
        g: f32::from(g) / 255.0,
        b: f32::from(b) / 255.0,
        icc_profile: None,
    })
}

// Document palette.
pub fn black() -> Color {
    rgb(0, 0, 0)
}

pub fn brand_blue() -> Color {
    rgb(0, 82, 156)
}

pub fn accent_orange() -> Color {
    rgb(255, 102, 0)
}

pub fn dim_gray() -> Color {
    rgb(60, 60, 60)
}

fn builtin(bold: bool) -> BuiltinFont {
    if bold {
        BuiltinFont::HelveticaBold
    } else {
        BuiltinFont::Helvetica
    }
}

fn point(x_mm: f32, y_top_mm: f32, page_h_mm: f32) -> Point {
    Point {
        x: pt(x_mm),
        y: pt(page_h_mm - y_top_mm),
    }
}

/// Emit one line of text with its baseline at `baseline_y_mm` from page top.
#[allow(clippy::too_many_arguments)]
pub fn draw_text(
    ops: &mut Vec<Op>,
    text: &str,
    size_pt: f32,
    bold: bool,
    x_mm: f32,
    baseline_y_mm: f32,
    page_h_mm: f32,
    color: Color,
) {
    if text.is_empty() {
        return;
    }
    let font = builtin(bold);
    ops.push(Op::StartTextSection);
    ops.push(Op::SetTextCursor {
        pos: point(x_mm, baseline_y_mm, page_h_mm),
    });
    ops.push(Op::SetFontSizeBuiltinFont {
        size: Pt(size_pt),
        font,
    });
    ops.push(Op::SetFillColor { col: color });
    ops.push(Op::WriteTextBuiltinFont {
        items: vec![TextItem::Text(to_winlatin(text))],
        font,
    });
    ops.push(Op::EndTextSection);
}

/// Text with its right edge at `right_mm`.
#[allow(clippy::too_many_arguments)]
pub fn draw_text_right(
    ops: &mut Vec<Op>,
    measurer: &TextMeasurer,
    text: &str,
    size_pt: f32,
    bold: bool,
    right_mm: f32,
    baseline_y_mm: f32,
    page_h_mm: f32,
    color: Color,
) {
    let w = measurer.text_width_mm(text, size_pt, bold);
    draw_text(
        ops,
        text,
        size_pt,
        bold,
        right_mm - w,
        baseline_y_mm,
        page_h_mm,
        color,
    );
}

/// Text centred on `center_mm`.
#[allow(clippy::too_many_arguments)]
pub fn draw_text_center(
    ops: &mut Vec<Op>,
    measurer: &TextMeasurer,
    text: &str,
    size_pt: f32,
    bold: bool,
    center_mm: f32,
    baseline_y_mm: f32,
    page_h_mm: f32,
    color: Color,
) {
    let w = measurer.text_width_mm(text, size_pt, bold);
    draw_text(
        ops,
        text,
        size_pt,
        bold,
        center_mm - w / 2.0,
        baseline_y_mm,
        page_h_mm,
        color,
    );
}

pub fn draw_hline(
    ops: &mut Vec<Op>,
    x1_mm: f32,
    x2_mm: f32,
    y_mm: f32,
    thickness_mm: f32,
    color: Color,
    page_h_mm: f32,
) {
    ops.push(Op::SetOutlineColor { col: color });
    ops.push(Op::SetOutlineThickness {
        pt: pt(thickness_mm),
    });
    ops.push(Op::DrawLine {
        line: Line {
            points: vec![
                LinePoint {
                    p: point(x1_mm, y_mm, page_h_mm),
                    bezier: false,
                },
                LinePoint {
                    p: point(x2_mm, y_mm, page_h_mm),
                    bezier: false,
                },
            ],
            is_closed: false,
        },
    });
}

fn rect_points(x_mm: f32, y_top_mm: f32, w_mm: f32, h_mm: f32, page_h_mm: f32) -> Vec<LinePoint> {
    [
        (x_mm, y_top_mm),
        (x_mm + w_mm, y_top_mm),
        (x_mm + w_mm, y_top_mm + h_mm),
        (x_mm, y_top_mm + h_mm),
    ]
    .into_iter()
    .map(|(x, y)| LinePoint {
        p: point(x, y, page_h_mm),
        bezier: false,
    })
    .collect()
}

/// Stroke a rectangle whose top-left corner is at (`x_mm`, `y_top_mm`).
#[allow(clippy::too_many_arguments)]
pub fn stroke_rect(
    ops: &mut Vec<Op>,
    x_mm: f32,
    y_top_mm: f32,
    w_mm: f32,
    h_mm: f32,
    thickness_mm: f32,
    color: Color,
    page_h_mm: f32,
) {
    ops.push(Op::SetOutlineColor { col: color });
    ops.push(Op::SetOutlineThickness {
        pt: pt(thickness_mm),
    });
    ops.push(Op::DrawLine {
        line: Line {
            points: rect_points(x_mm, y_top_mm, w_mm, h_mm, page_h_mm),
            is_closed: true,
        },
    });
}

#[allow(clippy::too_many_arguments)]
pub fn fill_rect(
    ops: &mut Vec<Op>,
    x_mm: f32,
    y_top_mm: f32,
    w_mm: f32,
    h_mm: f32,
    color: Color,
    page_h_mm: f32,
) {
    ops.push(Op::SetFillColor { col: color });
    ops.push(Op::DrawPolygon {
        polygon: Polygon {
            rings: vec![PolygonRing {
                points: rect_points(x_mm, y_top_mm, w_mm, h_mm, page_h_mm),
            }],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        },
    });
}

/// Place a registered image with its top-left corner at (`x_mm`, `y_top_mm`)
/// scaled to `w_mm` × `h_mm`. At dpi=72 printpdf renders 1 px = 1 pt, so the
/// scale factor is desired_pt / px_dim.
#[allow(clippy::too_many_arguments)]
pub fn place_image(
    ops: &mut Vec<Op>,
    image: &EmbeddedImage,
    x_mm: f32,
    y_top_mm: f32,
    w_mm: f32,
    h_mm: f32,
    page_h_mm: f32,
) {
    let scale_x = if image.px_width > 0 {
        pt(w_mm).0 / image.px_width as f32
    } else {
        1.0
    };
    let scale_y = if image.px_height > 0 {
        pt(h_mm).0 / image.px_height as f32
    } else {
        1.0
    };

    ops.push(Op::UseXobject {
        id: image.xobj_id.clone(),
        transform: XObjectTransform {
            translate_x: Some(pt(x_mm)),
            translate_y: Some(pt(page_h_mm - y_top_mm - h_mm)),
            dpi: Some(72.0),
            scale_x: Some(scale_x),
            scale_y: Some(scale_y),
            rotate: None,
        },
    });
}

/// Convert a UTF-8 string to raw Windows-1252 bytes then wrap in a String so
/// printpdf writes the bytes unchanged into the PDF stream (builtin fonts use
/// WinAnsiEncoding, so each glyph is one byte 0x00–0xFF).
pub fn to_winlatin(s: &str) -> String {
    let bytes: Vec<u8> = s
        .chars()
        .map(|c| match c {
            '\u{20AC}' => 0x80, // euro
            '\u{2026}' => 0x85, // ellipsis
            '\u{2018}' => 0x91, // left single quote
            '\u{2019}' => 0x92, // right single quote
            '\u{201C}' => 0x93, // left double quote
            '\u{201D}' => 0x94, // right double quote
            '\u{2022}' => 0x95, // bullet
            '\u{2013}' => 0x96, // en-dash
            '\u{2014}' => 0x97, // em-dash
            '\u{00A0}' => 0x20, // non-breaking space -> space
            c if (c as u32) < 256 => c as u8,
            _ => b'?',
        })
        .collect();
    // SAFETY: intentionally non-UTF-8 for the 0x80-0x9F range; printpdf
    // passes these bytes straight to the PDF stream, decoded by
    // WinAnsiEncoding.
    #[allow(unsafe_code)]
    unsafe {
        String::from_utf8_unchecked(bytes)
    }
}

/// Assemble finished page op buffers into the document and serialize.
pub fn serialize_document(
    mut doc: PdfDocument,
    page_w_mm: f32,
    page_h_mm: f32,
    pages: Vec<Vec<Op>>,
) -> Result<Vec<u8>, String> {
    if pages.is_empty() {
        return Err("document produced no pages".to_string());
    }

    let page_w = Mm(page_w_mm);
    let page_h = Mm(page_h_mm);
    let pdf_pages: Vec<PdfPage> = pages
        .into_iter()
        .map(|ops| PdfPage::new(page_w, page_h, ops))
        .collect();

    doc.with_pages(pdf_pages);
    let bytes = doc.save(&PdfSaveOptions::default(), &mut Vec::new());
    Ok(bytes)
}
