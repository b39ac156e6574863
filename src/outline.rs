//! Document outline – the structural record of what landed where.
//!
//! The PDF bytes are opaque once serialized, so the cursor also keeps this
//! parallel record: one entry per content block per page, with the vertical
//! span it consumed. Tests assert pagination and ordering against it instead
//! of parsing PDF streams.

use serde::{Deserialize, Serialize};

/// The kinds of content block the assembler emits, in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    Metadata,
    ItemTitle,
    Description,
    Image,
    Features,
    Specifications,
    CommercialTable,
    Terms,
    Signature,
}

/// One rendered block: its kind, the item it belongs to (None for shared
/// blocks like metadata and terms), and the vertical span it covered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockRecord {
    pub kind: BlockKind,
    pub item_index: Option<usize>,
    /// Top of the block, mm from page top.
    pub y: f32,
    /// Bottom of the block, mm from page top.
    pub bottom: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageOutline {
    pub page_index: usize,
    pub blocks: Vec<BlockRecord>,
}

/// Structural summary of a finished document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentOutline {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub pages: Vec<PageOutline>,
}

impl DocumentOutline {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All block records of one kind, in page order.
    pub fn blocks_of(&self, kind: BlockKind) -> Vec<&BlockRecord> {
        self.pages
            .iter()
            .flat_map(|p| p.blocks.iter())
            .filter(|b| b.kind == kind)
            .collect()
    }

    /// Page index (0-based) of the first block of one kind for one item.
    pub fn page_of(&self, kind: BlockKind, item_index: Option<usize>) -> Option<usize> {
        self.pages.iter().find_map(|p| {
            p.blocks
                .iter()
                .any(|b| b.kind == kind && b.item_index == item_index)
                .then_some(p.page_index)
        })
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outline() -> DocumentOutline {
        DocumentOutline {
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            pages: vec![
                PageOutline {
                    page_index: 0,
                    blocks: vec![
                        BlockRecord {
                            kind: BlockKind::Metadata,
                            item_index: None,
                            y: 50.0,
                            bottom: 80.0,
                        },
                        BlockRecord {
                            kind: BlockKind::ItemTitle,
                            item_index: Some(0),
                            y: 90.0,
                            bottom: 107.0,
                        },
                    ],
                },
                PageOutline {
                    page_index: 1,
                    blocks: vec![BlockRecord {
                        kind: BlockKind::Terms,
                        item_index: None,
                        y: 50.0,
                        bottom: 120.0,
                    }],
                },
            ],
        }
    }

    #[test]
    fn lookup_by_kind_and_item() {
        let o = outline();
        assert_eq!(o.page_of(BlockKind::Terms, None), Some(1));
        assert_eq!(o.page_of(BlockKind::ItemTitle, Some(0)), Some(0));
        assert_eq!(o.page_of(BlockKind::ItemTitle, Some(1)), None);
        assert_eq!(o.blocks_of(BlockKind::Metadata).len(), 1);
    }

    #[test]
    fn json_round_trip() {
        let o = outline();
        let parsed = DocumentOutline::from_json(&o.to_json()).unwrap();
        assert_eq!(o, parsed);
    }
}
