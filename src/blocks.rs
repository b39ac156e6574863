//! Content block renderers – one per document section, composed by the
//! assembler in a fixed order per item: title banner → name subtitle →
//! description paragraph → image+features → specifications → commercial
//! table. Each renderer measures what it needs, asks the cursor for space,
//! draws, and moves the cursor past what it consumed.

use crate::model::{
    format_date, Currency, ImageMode, LineItem, Quotation, RenderContext, SelectedTerm,
};
use crate::outline::BlockKind;
use crate::pagination::PageCursor;
use crate::render::{
    black, brand_blue, draw_text, draw_text_center, draw_text_right, place_image, EmbeddedImage,
};
use crate::table::GridTable;

/// Body text size; everything but headings and chrome runs at this.
pub const BODY_PT: f32 = 12.0;

/// Vertical increment per wrapped body line.
pub const LINE_STEP_MM: f32 = 5.0;

/// Wrapped bullet text sits this far right of the bullet glyph.
const BULLET_INDENT_MM: f32 = 5.0;

/// Share of the content width given to the feature column in tall mode.
const TALL_TEXT_FRACTION: f32 = 0.58;

const COLUMN_GAP_MM: f32 = 5.0;

/// Visual top of a 12 pt line sits about this far above its baseline; used
/// to top-align images with neighbouring text.
const BASELINE_RISE_MM: f32 = 4.0;

/// Customer / quote metadata grid, rendered once on the first page.
pub fn metadata_block(cur: &mut PageCursor, quotation: &Quotation, ctx: &RenderContext) {
    let geom = *cur.geom();
    let m = cur.measurer();

    let mut to_cell = format!("To\n\n{}", quotation.customer_name);
    if let Some(address) = quotation.customer_address.as_deref() {
        if !address.is_empty() {
            to_cell.push('\n');
            to_cell.push_str(address);
        }
    }
    let validity = ctx
        .validity
        .resolve(quotation.created_at)
        .map(format_date)
        .unwrap_or_default();
    let quote_cell = format!(
        "Quote No : {}\nDate : {}\nValidity : {}",
        quotation.quotation_number,
        format_date(quotation.created_at),
        validity
    );

    let half = geom.content_width() / 2.0;
    let table = GridTable::new(vec![half, half], 10.0)
        .with_bold_body()
        .add_row(vec![to_cell, quote_cell]);

    cur.ensure_space(table.measure(m));
    let top = cur.y();
    let final_y = table.draw(m, cur.ops(), geom.margin, top, geom.height);
    cur.record(BlockKind::Metadata, None, top, final_y);
    cur.confirm_y(final_y + 10.0);
}

/// Centred offer banner plus the item-name subtitle.
pub fn item_title(cur: &mut PageCursor, item: &LineItem, item_index: usize) {
    let geom = *cur.geom();
    let m = cur.measurer();

    cur.ensure_space(17.0);
    let top = cur.y();
    draw_text_center(
        cur.ops(),
        m,
        "Technical & Commercial Offer",
        14.0,
        true,
        geom.width / 2.0,
        top,
        geom.height,
        brand_blue(),
    );
    cur.advance(7.0);
    let subtitle_y = cur.y();
    draw_text_center(
        cur.ops(),
        m,
        &format!("For {}", item.name),
        BODY_PT,
        true,
        geom.width / 2.0,
        subtitle_y,
        geom.height,
        black(),
    );
    cur.advance(10.0);
    cur.record(BlockKind::ItemTitle, Some(item_index), top, cur.y());
}

/// Word-wrapped description paragraph under a bold label. The paragraph is
/// atomic: space is reserved for the whole of it up front.
pub fn description_block(cur: &mut PageCursor, item: &LineItem, item_index: usize) {
    let geom = *cur.geom();
    let m = cur.measurer();

    let lines = m.wrap_to_width(&item.description, BODY_PT, false, geom.content_width());
    let height = 6.0 + lines.len() as f32 * LINE_STEP_MM + 5.0;
    cur.ensure_space(height);

    let top = cur.y();
    draw_text(
        cur.ops(),
        "Description:",
        BODY_PT,
        true,
        geom.margin,
        top,
        geom.height,
        black(),
    );
    cur.advance(6.0);
    let mut baseline = cur.y();
    for line in &lines {
        draw_text(
            cur.ops(),
            line,
            BODY_PT,
            false,
            geom.margin,
            baseline,
            geom.height,
            black(),
        );
        baseline += LINE_STEP_MM;
    }
    cur.advance(lines.len() as f32 * LINE_STEP_MM + 5.0);
    cur.record(BlockKind::Description, Some(item_index), top, cur.y());
}

/// Photo and feature list, in the item's layout mode. A missing photo falls
/// back to the plain full-width feature list with no space reserved for it.
pub fn image_features_block(
    cur: &mut PageCursor,
    item: &LineItem,
    image: Option<&EmbeddedImage>,
    item_index: usize,
) {
    match (item.image_mode, image) {
        (ImageMode::Wide, Some(img)) => {
            wide_image(cur, img, item_index);
            feature_list(cur, item, item_index);
        }
        (ImageMode::Tall, Some(img)) => {
            two_column_features(cur, item, img, item_index);
        }
        (_, None) => feature_list(cur, item, item_index),
    }
}

fn wide_image(cur: &mut PageCursor, img: &EmbeddedImage, item_index: usize) {
    let geom = *cur.geom();
    let width = geom.content_width() - 20.0;
    let height = scaled_height(img, width);

    cur.ensure_space(height + 10.0);
    let top = cur.y();
    place_image(
        cur.ops(),
        img,
        geom.margin + 10.0,
        top,
        width,
        height,
        geom.height,
    );
    cur.advance(height + 10.0);
    cur.record(BlockKind::Image, Some(item_index), top, top + height);
}

/// Full-width feature bullet list. Space is checked before each bullet, so a
/// break lands between bullets, never inside one.
fn feature_list(cur: &mut PageCursor, item: &LineItem, item_index: usize) {
    let geom = *cur.geom();
    let m = cur.measurer();
    let wrap_width = geom.content_width() - BULLET_INDENT_MM;

    cur.ensure_space(6.0 + LINE_STEP_MM);
    let start_page = cur.page_index();
    let top = cur.y();
    draw_text(
        cur.ops(),
        "FEATURES:",
        BODY_PT,
        true,
        geom.margin,
        top,
        geom.height,
        black(),
    );
    cur.advance(6.0);

    for feature in &item.features {
        let lines = m.wrap_to_width(feature, BODY_PT, false, wrap_width);
        emit_bullet(cur, &lines);
    }
    record_span(cur, BlockKind::Features, Some(item_index), start_page, top);
}

/// Tall mode: bullets on the left, photo on the right, both measured
/// independently; the pair reserves space as one unit and the taller column
/// decides where the next block starts.
fn two_column_features(
    cur: &mut PageCursor,
    item: &LineItem,
    img: &EmbeddedImage,
    item_index: usize,
) {
    let geom = *cur.geom();
    let m = cur.measurer();

    let text_width = geom.content_width() * TALL_TEXT_FRACTION;
    let wrap_width = text_width - BULLET_INDENT_MM;
    let image_x = geom.margin + text_width + COLUMN_GAP_MM;
    let image_width = geom.content_width() - text_width - COLUMN_GAP_MM;
    let image_height = scaled_height(img, image_width);

    let wrapped: Vec<Vec<String>> = item
        .features
        .iter()
        .map(|f| m.wrap_to_width(f, BODY_PT, false, wrap_width))
        .collect();
    let text_height =
        6.0 + wrapped.iter().map(|l| l.len()).sum::<usize>() as f32 * LINE_STEP_MM;
    cur.ensure_space(text_height.max(image_height));

    let top = cur.y();
    let image_top = top - BASELINE_RISE_MM;
    place_image(
        cur.ops(),
        img,
        image_x,
        image_top,
        image_width,
        image_height,
        geom.height,
    );

    draw_text(
        cur.ops(),
        "FEATURES:",
        BODY_PT,
        true,
        geom.margin,
        top,
        geom.height,
        black(),
    );
    let mut baseline = top + 6.0;
    for lines in &wrapped {
        draw_text(
            cur.ops(),
            "\u{2022}",
            BODY_PT,
            false,
            geom.margin,
            baseline,
            geom.height,
            black(),
        );
        for line in lines {
            draw_text(
                cur.ops(),
                line,
                BODY_PT,
                false,
                geom.margin + BULLET_INDENT_MM,
                baseline,
                geom.height,
                black(),
            );
            baseline += LINE_STEP_MM;
        }
    }

    let text_bottom = top + text_height;
    let image_bottom = image_top + image_height;
    cur.record(BlockKind::Image, Some(item_index), image_top, image_bottom);
    cur.record(BlockKind::Features, Some(item_index), top, text_bottom);
    cur.confirm_y(text_bottom.max(image_bottom));
}

/// Key/value specification bullets; skipped entirely when the item has none.
pub fn specifications_block(cur: &mut PageCursor, item: &LineItem, item_index: usize) {
    if item.specs.is_empty() {
        return;
    }
    let geom = *cur.geom();
    let m = cur.measurer();
    let wrap_width = geom.content_width() - BULLET_INDENT_MM;

    cur.advance(5.0);
    cur.ensure_space(6.0 + LINE_STEP_MM);
    let start_page = cur.page_index();
    let top = cur.y();
    draw_text(
        cur.ops(),
        "Specifications:",
        BODY_PT,
        true,
        geom.margin,
        top,
        geom.height,
        black(),
    );
    cur.advance(6.0);

    for spec in &item.specs {
        let text = format!("{}: {}", spec.key, spec.value);
        let lines = m.wrap_to_width(&text, BODY_PT, false, wrap_width);
        emit_bullet(cur, &lines);
    }
    record_span(
        cur,
        BlockKind::Specifications,
        Some(item_index),
        start_page,
        top,
    );
}

/// Commercial table: bold label plus a single-row grid table whose price
/// cell folds selected addon prices into the shown figure.
pub fn commercial_block(
    cur: &mut PageCursor,
    item: &LineItem,
    currency: Currency,
    item_index: usize,
) {
    let geom = *cur.geom();
    let m = cur.measurer();

    let mut description = item.name.clone();
    if !item.addons.is_empty() {
        description.push_str("\n\nStandard Accessories:");
        for addon in &item.addons {
            description.push_str(&format!("\n\u{2022} {}", addon.name));
        }
    }
    let price_cell = format!(
        "{} {}/-",
        currency.symbol(),
        currency.format_amount(item.quoted_price())
    );

    let content = geom.content_width();
    let table = GridTable::new(vec![15.0, content - 70.0, 15.0, 40.0], 10.0)
        .with_head(vec![
            "S.No".to_string(),
            "Description".to_string(),
            "Qty".to_string(),
            format!("Price ({})", currency.label()),
        ])
        .add_row(vec![
            "01".to_string(),
            description,
            "1".to_string(),
            price_cell,
        ]);

    cur.advance(10.0);
    cur.ensure_space(5.0 + table.measure(m));
    let top = cur.y();
    draw_text(
        cur.ops(),
        "Commercial Offer:",
        BODY_PT,
        true,
        geom.margin,
        top,
        geom.height,
        black(),
    );
    cur.advance(5.0);
    let table_top = cur.y();
    let final_y = table.draw(m, cur.ops(), geom.margin, table_top, geom.height);
    cur.record(BlockKind::CommercialTable, Some(item_index), top, final_y);
    cur.confirm_y(final_y + 10.0);
}

/// Terms-and-conditions bullets; the assembler opens the fresh page first.
pub fn terms_block(cur: &mut PageCursor, terms: &[SelectedTerm]) {
    let geom = *cur.geom();
    let m = cur.measurer();
    let wrap_width = geom.content_width() - BULLET_INDENT_MM;

    let start_page = cur.page_index();
    let top = cur.y();
    draw_text(
        cur.ops(),
        "Terms And Conditions:",
        BODY_PT,
        true,
        geom.margin,
        top,
        geom.height,
        brand_blue(),
    );
    cur.advance(10.0);

    for term in terms {
        let text = format!("{}: {}", term.title, term.text);
        let lines = m.wrap_to_width(&text, BODY_PT, false, wrap_width);
        emit_bullet(cur, &lines);
    }
    record_span(cur, BlockKind::Terms, None, start_page, top);
}

/// Right-aligned company / salesperson signature under the terms.
pub fn signature_block(cur: &mut PageCursor, ctx: &RenderContext) {
    let geom = *cur.geom();
    let m = cur.measurer();
    let right = geom.right_edge();

    cur.advance(15.0);
    cur.ensure_space(12.0);
    let top = cur.y();
    draw_text_right(
        cur.ops(),
        m,
        &format!("From {}", ctx.company_name),
        BODY_PT,
        true,
        right,
        top,
        geom.height,
        black(),
    );
    cur.advance(6.0);
    let name_y = cur.y();
    draw_text_right(
        cur.ops(),
        m,
        &ctx.salesperson_name,
        BODY_PT,
        true,
        right,
        name_y,
        geom.height,
        black(),
    );
    cur.advance(6.0);
    let phone_y = cur.y();
    draw_text_right(
        cur.ops(),
        m,
        &format!("Contact: {}", ctx.salesperson_phone),
        BODY_PT,
        false,
        right,
        phone_y,
        geom.height,
        black(),
    );
    cur.record(BlockKind::Signature, None, top, phone_y);
}

/// One bullet: glyph at the margin, wrapped lines at the indent. The whole
/// bullet is space-checked up front so it never splits across pages.
fn emit_bullet(cur: &mut PageCursor, lines: &[String]) {
    let geom = *cur.geom();
    let height = lines.len() as f32 * LINE_STEP_MM;
    cur.ensure_space(height);
    let mut baseline = cur.y();
    draw_text(
        cur.ops(),
        "\u{2022}",
        BODY_PT,
        false,
        geom.margin,
        baseline,
        geom.height,
        black(),
    );
    for line in lines {
        draw_text(
            cur.ops(),
            line,
            BODY_PT,
            false,
            geom.margin + BULLET_INDENT_MM,
            baseline,
            geom.height,
            black(),
        );
        baseline += LINE_STEP_MM;
    }
    cur.advance(height);
}

fn scaled_height(img: &EmbeddedImage, width_mm: f32) -> f32 {
    if img.px_width == 0 {
        return 0.0;
    }
    width_mm * img.px_height as f32 / img.px_width as f32
}

/// Record a block that may have flowed across pages: one outline entry per
/// page it touched.
fn record_span(
    cur: &mut PageCursor,
    kind: BlockKind,
    item_index: Option<usize>,
    start_page: usize,
    start_y: f32,
) {
    let end_page = cur.page_index();
    let end_y = cur.y();
    if end_page == start_page {
        cur.record_on(start_page, kind, item_index, start_y, end_y);
        return;
    }
    let safe_bottom = cur.geom().safe_bottom();
    let content_top = cur.geom().content_top;
    cur.record_on(start_page, kind, item_index, start_y, safe_bottom);
    for page in start_page + 1..end_page {
        cur.record_on(page, kind, item_index, content_top, safe_bottom);
    }
    cur.record_on(end_page, kind, item_index, content_top, end_y);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chrome::Chrome;
    use crate::fonts::TextMeasurer;
    use crate::model::SpecEntry;
    use crate::pagination::PageGeometry;

    fn item() -> LineItem {
        LineItem {
            id: "i1".to_string(),
            name: "Friability Apparatus".to_string(),
            description: "Twin drum model with digital counter.".to_string(),
            price: 85000.0,
            features: vec![
                "25 rpm drum speed".to_string(),
                "Digital display".to_string(),
            ],
            specs: vec![SpecEntry {
                key: "Power".to_string(),
                value: "230 V AC".to_string(),
            }],
            image_url: None,
            image_mode: ImageMode::Wide,
            addons: vec![],
        }
    }

    #[test]
    fn blocks_advance_in_fixed_order() {
        let m = TextMeasurer::new();
        let mut cur = PageCursor::new(PageGeometry::a4(), Chrome::default(), &m);
        let it = item();

        item_title(&mut cur, &it, 0);
        let after_title = cur.y();
        description_block(&mut cur, &it, 0);
        let after_desc = cur.y();
        image_features_block(&mut cur, &it, None, 0);
        let after_features = cur.y();
        specifications_block(&mut cur, &it, 0);
        commercial_block(&mut cur, &it, Currency::Inr, 0);

        assert!(after_title > 50.0);
        assert!(after_desc > after_title);
        assert!(after_features > after_desc);

        let (_, outline) = cur.finish();
        let kinds: Vec<_> = outline.pages[0].blocks.iter().map(|b| b.kind).collect();
        assert_eq!(
            kinds,
            vec![
                BlockKind::ItemTitle,
                BlockKind::Description,
                BlockKind::Features,
                BlockKind::Specifications,
                BlockKind::CommercialTable,
            ]
        );
    }

    #[test]
    fn missing_image_reserves_no_gap() {
        let m = TextMeasurer::new();
        let geom = PageGeometry::a4();
        let it = item();

        let mut with_none = PageCursor::new(geom, Chrome::default(), &m);
        image_features_block(&mut with_none, &it, None, 0);
        let y_without = with_none.y();

        // The feature list alone lands at the same place.
        let mut plain = PageCursor::new(geom, Chrome::default(), &m);
        feature_list(&mut plain, &it, 0);
        assert_eq!(y_without, plain.y());
    }

    #[test]
    fn empty_spec_list_is_skipped() {
        let m = TextMeasurer::new();
        let mut cur = PageCursor::new(PageGeometry::a4(), Chrome::default(), &m);
        let mut it = item();
        it.specs.clear();
        let before = cur.y();
        specifications_block(&mut cur, &it, 0);
        assert_eq!(cur.y(), before);
        let (_, outline) = cur.finish();
        assert!(outline.blocks_of(BlockKind::Specifications).is_empty());
    }

    #[test]
    fn long_feature_list_breaks_between_bullets() {
        let m = TextMeasurer::new();
        let mut cur = PageCursor::new(PageGeometry::a4(), Chrome::default(), &m);
        let mut it = item();
        it.features = (0..60).map(|i| format!("Feature number {i}")).collect();

        feature_list(&mut cur, &it, 0);
        assert!(cur.page_index() >= 1, "sixty bullets cannot fit one page");
        // After a break the cursor restarts at the content top, so every
        // bullet baseline stays inside the safe area.
        assert!(cur.y() <= cur.geom().safe_bottom());

        let (_, outline) = cur.finish();
        let features = outline.blocks_of(BlockKind::Features);
        assert!(features.len() >= 2, "one outline entry per touched page");
    }

    #[test]
    fn commercial_price_cell_folds_addons_in() {
        let m = TextMeasurer::new();
        let mut cur = PageCursor::new(PageGeometry::a4(), Chrome::default(), &m);
        let mut it = item();
        it.price = 125000.0;
        it.addons = vec![crate::model::Addon {
            name: "Spare drum".to_string(),
            price: 25000.0,
        }];
        commercial_block(&mut cur, &it, Currency::Inr, 0);
        let (_, outline) = cur.finish();
        assert_eq!(outline.blocks_of(BlockKind::CommercialTable).len(), 1);
        // 1,50,000 total – formatting itself is covered in model tests; here
        // we only care that the block landed and reported a span.
        let block = outline.blocks_of(BlockKind::CommercialTable)[0];
        assert!(block.bottom > block.y);
    }

    #[test]
    fn terms_and_signature_share_the_page() {
        let m = TextMeasurer::new();
        let mut cur = PageCursor::new(PageGeometry::a4(), Chrome::default(), &m);
        terms_block(&mut cur, &crate::model::default_terms());
        signature_block(&mut cur, &RenderContext::default());
        let (_, outline) = cur.finish();
        assert_eq!(outline.page_count(), 1);
        assert_eq!(outline.blocks_of(BlockKind::Terms).len(), 1);
        assert_eq!(outline.blocks_of(BlockKind::Signature).len(), 1);
    }
}
