//! Pipeline – the document assembler. Ties together validation, asset
//! loading, block rendering, pagination, the page-number pass, and
//! serialization into a single call.
//!
//! Stage order: validate → load assets (concurrent fan-out, soft failures)
//! → metadata on the first page → items in order (each after the first on a
//! fresh page) → terms on an unconditionally fresh page → signature →
//! stamp `Page i of N` on every page → serialize. Asset problems degrade the
//! page; everything after validation that still fails is fatal and surfaces
//! as one [`RenderError::Document`].

use std::collections::HashMap;

use printpdf::{Op, PdfDocument, PdfWarnMsg, RawImage};
use serde::{Deserialize, Serialize};

use crate::blocks;
use crate::chrome::Chrome;
use crate::fonts::TextMeasurer;
use crate::images::{self, LoadedImage};
use crate::model::{self, LineItem, Quotation, RenderContext, SelectedTerm};
use crate::outline::DocumentOutline;
use crate::pagination::{PageCursor, PageGeometry};
use crate::render::{self, black, draw_text_right, EmbeddedImage};

/// Everything one render consumes, supplied fully formed by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderRequest {
    pub quotation: Quotation,
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub context: RenderContext,
    /// Curated terms; empty means the fixed default set.
    #[serde(default)]
    pub selected_terms: Vec<SelectedTerm>,
}

/// A finished document: bytes to save, the filename to save them under, and
/// the structural outline of what was rendered.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub outline: DocumentOutline,
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Rejected before any page was opened.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Failed during layout/serialization; no partial document is returned.
    #[error("document render failed: {0}")]
    Document(String),
}

/// Render with heuristic text measurement.
pub fn render_quotation(req: &RenderRequest) -> Result<RenderedDocument, RenderError> {
    render_quotation_with(req, &TextMeasurer::new())
}

/// Render with a caller-supplied measurer (e.g. backed by a real TTF face).
///
/// Each call owns all of its mutable state; concurrent renders of different
/// quotations need nothing more than separate calls.
pub fn render_quotation_with(
    req: &RenderRequest,
    measurer: &TextMeasurer,
) -> Result<RenderedDocument, RenderError> {
    model::validate_inputs(&req.quotation, &req.items).map_err(RenderError::InvalidInput)?;

    let mut doc = PdfDocument::new(&format!("Quotation {}", req.quotation.quotation_number));
    let mut img_warnings: Vec<PdfWarnMsg> = Vec::new();

    // Logo failure leaves the header-left region empty.
    let logo = req.context.logo_source.as_deref().and_then(|source| {
        match images::load_image(source) {
            Ok(img) => embed_image(&mut doc, &img, &mut img_warnings),
            Err(e) => {
                log::warn!("Rendering without logo — {e}");
                None
            }
        }
    });

    // Fan out per-item photo loads and join before layout: flowing text
    // around a photo needs its final pixel dimensions.
    let loaded = images::load_item_images(&req.items);
    let mut item_images: HashMap<&str, EmbeddedImage> = HashMap::new();
    for item in &req.items {
        if let Some(img) = loaded.get(item.id.as_str()) {
            if let Some(embedded) = embed_image(&mut doc, img, &mut img_warnings) {
                item_images.insert(item.id.as_str(), embedded);
            }
        }
    }

    let geom = PageGeometry::a4();
    let mut cur = PageCursor::new(geom, Chrome::new(logo), measurer);

    blocks::metadata_block(&mut cur, &req.quotation, &req.context);

    for (index, item) in req.items.iter().enumerate() {
        if index > 0 {
            cur.break_page();
        }
        log::debug!("Rendering item {} '{}'", index + 1, item.name);
        blocks::item_title(&mut cur, item, index);
        blocks::description_block(&mut cur, item, index);
        blocks::image_features_block(&mut cur, item, item_images.get(item.id.as_str()), index);
        blocks::specifications_block(&mut cur, item, index);
        blocks::commercial_block(&mut cur, item, req.context.currency, index);
    }

    // The terms page is unconditional, even when the last item ended at the
    // top of a fresh page.
    cur.break_page();
    let default_terms;
    let terms: &[SelectedTerm] = if req.selected_terms.is_empty() {
        default_terms = model::default_terms();
        &default_terms
    } else {
        &req.selected_terms
    };
    blocks::terms_block(&mut cur, terms);
    blocks::signature_block(&mut cur, &req.context);

    let (mut pages, outline) = cur.finish();

    // Total page count only exists now; go back over every page.
    stamp_page_numbers(&mut pages, &geom, measurer);

    let bytes = render::serialize_document(doc, geom.width, geom.height, pages)
        .map_err(RenderError::Document)?;

    log::debug!(
        "Rendered quotation {} — {} pages, {} bytes",
        req.quotation.quotation_number,
        outline.page_count(),
        bytes.len()
    );

    Ok(RenderedDocument {
        bytes,
        file_name: format!("{}_Quotation.pdf", req.quotation.quotation_number),
        outline,
    })
}

/// Register decoded image bytes as a document XObject. Returns None (and
/// warns) when printpdf rejects the bytes; callers treat that like a failed
/// load.
fn embed_image(
    doc: &mut PdfDocument,
    img: &LoadedImage,
    warnings: &mut Vec<PdfWarnMsg>,
) -> Option<EmbeddedImage> {
    match RawImage::decode_from_bytes(&img.bytes, warnings) {
        Ok(raw) => Some(EmbeddedImage {
            xobj_id: doc.add_image(&raw),
            px_width: img.width,
            px_height: img.height,
        }),
        Err(e) => {
            log::warn!("Skipping image — PDF embed error: {e}");
            None
        }
    }
}

fn stamp_page_numbers(pages: &mut [Vec<Op>], geom: &PageGeometry, measurer: &TextMeasurer) {
    let total = pages.len();
    for (i, ops) in pages.iter_mut().enumerate() {
        draw_text_right(
            ops,
            measurer,
            &format!("Page {} of {}", i + 1, total),
            8.0,
            false,
            geom.right_edge(),
            geom.height - 8.0,
            geom.height,
            black(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples;
    use printpdf::TextItem;

    #[test]
    fn page_stamps_read_i_of_n() {
        let geom = PageGeometry::a4();
        let measurer = TextMeasurer::new();
        let mut pages: Vec<Vec<Op>> = vec![Vec::new(), Vec::new(), Vec::new()];
        stamp_page_numbers(&mut pages, &geom, &measurer);

        for (i, ops) in pages.iter().enumerate() {
            let texts: Vec<&String> = ops
                .iter()
                .filter_map(|op| match op {
                    Op::WriteTextBuiltinFont { items, .. } => {
                        items.iter().find_map(|item| match item {
                            TextItem::Text(t) => Some(t),
                            _ => None,
                        })
                    }
                    _ => None,
                })
                .collect();
            assert_eq!(texts, vec![&format!("Page {} of 3", i + 1)]);
        }
    }

    #[test]
    fn sample_request_renders() {
        let doc = render_quotation(&samples::sample_request()).unwrap();
        assert_eq!(&doc.bytes[0..5], b"%PDF-");
        assert_eq!(doc.file_name, "Q-2024-001_Quotation.pdf");
        assert!(doc.outline.page_count() >= 2);
    }

    #[test]
    fn empty_item_list_is_rejected() {
        let mut req = samples::sample_request();
        req.items.clear();
        match render_quotation(&req) {
            Err(RenderError::InvalidInput(msg)) => assert!(msg.contains("no line items")),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn request_json_round_trip() {
        let req = samples::sample_request();
        let json = serde_json::to_string(&req).unwrap();
        let parsed: RenderRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.quotation.quotation_number, "Q-2024-001");
        assert_eq!(parsed.items.len(), req.items.len());
    }
}
