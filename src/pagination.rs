//! Pagination – the cursor state machine that decides where page breaks go.
//!
//! Content renderers emit through [`PageCursor`]: they ask for vertical space
//! before drawing a block (`ensure_space`), move the cursor as they draw
//! (`advance`), or hand back a self-measured final position afterwards
//! (`confirm_y`, the convention for table blocks). When a block does not fit
//! above the footer reservation the cursor closes the page, opens a fresh
//! chromed one, and resets to the top-of-content offset.

use printpdf::Op;

use crate::chrome::Chrome;
use crate::fonts::TextMeasurer;
use crate::outline::{BlockKind, BlockRecord, DocumentOutline, PageOutline};

/// Fixed page geometry, all in millimetres.
#[derive(Debug, Clone, Copy)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    /// Where content resumes on a fresh page, below the header band.
    pub content_top: f32,
    /// Vertical space above the page bottom reserved for footer chrome.
    pub footer_reserve: f32,
}

impl PageGeometry {
    /// A4 portrait with the standard quotation insets.
    pub fn a4() -> Self {
        Self {
            width: 210.0,
            height: 297.0,
            margin: 15.0,
            content_top: 50.0,
            footer_reserve: 30.0,
        }
    }

    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    /// The threshold below which new content must not start.
    pub fn safe_bottom(&self) -> f32 {
        self.height - self.footer_reserve
    }

    pub fn right_edge(&self) -> f32 {
        self.width - self.margin
    }
}

/// Cursor and page bookkeeping for one in-progress document. Owns the
/// per-page op buffers and the outline under construction; nothing here is
/// shared between concurrent renders.
pub struct PageCursor<'a> {
    geom: PageGeometry,
    chrome: Chrome,
    measurer: &'a TextMeasurer,
    pages: Vec<Vec<Op>>,
    outline_pages: Vec<PageOutline>,
    y: f32,
}

impl<'a> PageCursor<'a> {
    /// Open the first page (chrome included) and park the cursor at the
    /// top-of-content offset.
    pub fn new(geom: PageGeometry, chrome: Chrome, measurer: &'a TextMeasurer) -> Self {
        let mut cursor = Self {
            geom,
            chrome,
            measurer,
            pages: Vec::new(),
            outline_pages: Vec::new(),
            y: geom.content_top,
        };
        cursor.open_page();
        cursor
    }

    pub fn geom(&self) -> &PageGeometry {
        &self.geom
    }

    /// The measurer outlives the cursor borrow, so renderers can hold it
    /// while emitting ops.
    pub fn measurer(&self) -> &'a TextMeasurer {
        self.measurer
    }

    /// Current vertical write position, mm from page top.
    pub fn y(&self) -> f32 {
        self.y
    }

    /// 0-based index of the page currently being written.
    pub fn page_index(&self) -> usize {
        self.pages.len() - 1
    }

    /// Op buffer of the current page.
    pub fn ops(&mut self) -> &mut Vec<Op> {
        self.pages
            .last_mut()
            .unwrap_or_else(|| unreachable!("cursor always holds an open page"))
    }

    /// Pre-check: make sure `required_mm` fits above the footer reservation,
    /// opening a fresh page when it does not. Returns whether a page break
    /// happened. A block taller than a full page still gets exactly one
    /// break and is then allowed to overflow.
    pub fn ensure_space(&mut self, required_mm: f32) -> bool {
        if self.y + required_mm > self.geom.safe_bottom() {
            self.open_page();
            return true;
        }
        false
    }

    /// Move the cursor down. Bounds are the caller's responsibility via
    /// `ensure_space`.
    pub fn advance(&mut self, consumed_mm: f32) {
        self.y += consumed_mm;
    }

    /// Post-adjust: adopt the final position reported by a block that only
    /// knows its height after drawing.
    pub fn confirm_y(&mut self, final_y_mm: f32) {
        self.y = final_y_mm;
    }

    /// Unconditionally start a fresh chromed page.
    pub fn break_page(&mut self) {
        self.open_page();
    }

    /// Record a finished block into the outline of the current page.
    pub fn record(&mut self, kind: BlockKind, item_index: Option<usize>, y: f32, bottom: f32) {
        let page = self.page_index();
        self.record_on(page, kind, item_index, y, bottom);
    }

    /// Record onto an explicit page – used when a block started on an
    /// earlier page than it ended on.
    pub fn record_on(
        &mut self,
        page_index: usize,
        kind: BlockKind,
        item_index: Option<usize>,
        y: f32,
        bottom: f32,
    ) {
        let page = self
            .outline_pages
            .get_mut(page_index)
            .unwrap_or_else(|| unreachable!("recorded page must already exist"));
        page.blocks.push(BlockRecord {
            kind,
            item_index,
            y,
            bottom,
        });
    }

    fn open_page(&mut self) {
        let mut ops = Vec::new();
        self.chrome.paint(&self.geom, self.measurer, &mut ops);
        self.pages.push(ops);
        self.outline_pages.push(PageOutline {
            page_index: self.outline_pages.len(),
            blocks: Vec::new(),
        });
        self.y = self.geom.content_top;
        log::debug!("Opened page {}", self.pages.len());
    }

    /// Close out: hand the op buffers and outline to the assembler for the
    /// page-number pass and serialization.
    pub fn finish(self) -> (Vec<Vec<Op>>, DocumentOutline) {
        let outline = DocumentOutline {
            page_width_mm: self.geom.width,
            page_height_mm: self.geom.height,
            pages: self.outline_pages,
        };
        (self.pages, outline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor(measurer: &TextMeasurer) -> PageCursor<'_> {
        PageCursor::new(PageGeometry::a4(), Chrome::default(), measurer)
    }

    #[test]
    fn starts_with_one_chromed_page() {
        let m = TextMeasurer::new();
        let cur = cursor(&m);
        assert_eq!(cur.page_index(), 0);
        assert_eq!(cur.y(), 50.0);
        let (pages, outline) = cur.finish();
        assert_eq!(pages.len(), 1);
        assert!(!pages[0].is_empty(), "chrome ops on the first page");
        assert_eq!(outline.page_count(), 1);
    }

    #[test]
    fn ensure_space_is_a_noop_within_bounds() {
        let m = TextMeasurer::new();
        let mut cur = cursor(&m);
        assert!(!cur.ensure_space(100.0));
        assert_eq!(cur.page_index(), 0);
        assert_eq!(cur.y(), 50.0);
    }

    #[test]
    fn ensure_space_breaks_at_safe_bottom() {
        let m = TextMeasurer::new();
        let mut cur = cursor(&m);
        cur.advance(200.0); // y = 250, safe bottom = 267
        assert!(cur.ensure_space(20.0));
        assert_eq!(cur.page_index(), 1);
        assert_eq!(cur.y(), 50.0);
    }

    #[test]
    fn boundary_block_still_fits() {
        let m = TextMeasurer::new();
        let mut cur = cursor(&m);
        cur.advance(200.0); // y = 250
        assert!(!cur.ensure_space(17.0)); // lands exactly on 267
        assert_eq!(cur.page_index(), 0);
    }

    #[test]
    fn oversized_block_breaks_exactly_once() {
        let m = TextMeasurer::new();
        let mut cur = cursor(&m);
        cur.advance(10.0);
        assert!(cur.ensure_space(500.0));
        assert_eq!(cur.page_index(), 1);
        // The block is then allowed to overflow; no further break happens
        // until the next ensure_space call.
        cur.advance(500.0);
        assert_eq!(cur.page_index(), 1);
    }

    #[test]
    fn confirm_y_adopts_reported_position() {
        let m = TextMeasurer::new();
        let mut cur = cursor(&m);
        cur.confirm_y(123.5);
        assert_eq!(cur.y(), 123.5);
    }

    #[test]
    fn break_page_is_unconditional() {
        let m = TextMeasurer::new();
        let mut cur = cursor(&m);
        cur.break_page();
        cur.break_page();
        assert_eq!(cur.page_index(), 2);
        assert_eq!(cur.y(), 50.0);
    }

    #[test]
    fn records_land_on_the_current_page() {
        let m = TextMeasurer::new();
        let mut cur = cursor(&m);
        cur.record(BlockKind::Metadata, None, 50.0, 80.0);
        cur.break_page();
        cur.record(BlockKind::Terms, None, 50.0, 90.0);
        let (_, outline) = cur.finish();
        assert_eq!(outline.pages[0].blocks[0].kind, BlockKind::Metadata);
        assert_eq!(outline.pages[1].blocks[0].kind, BlockKind::Terms);
    }
}
