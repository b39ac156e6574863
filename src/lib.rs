//! # quote_press – paginated quotation document engine
//!
//! Turns a quotation record plus its line items into a print-ready, paged
//! PDF. The pipeline stages are:
//!
//! 1. **Validate** – reject malformed input before any page opens ([`model`])
//! 2. **Load** – fetch, downscale, and re-encode photos concurrently
//!    ([`images`])
//! 3. **Flow** – block renderers emit through the pagination cursor, which
//!    inserts page breaks and re-draws chrome ([`blocks`], [`pagination`],
//!    [`chrome`])
//! 4. **Number** – stamp `Page i of N` once the total is known ([`pipeline`])
//! 5. **Serialize** – emit PDF bytes via printpdf ([`render`])
//!
//! Alongside the bytes, every render returns a [`outline::DocumentOutline`]
//! describing what landed on which page.

pub mod blocks;
pub mod chrome;
pub mod fonts;
pub mod images;
pub mod model;
pub mod outline;
pub mod pagination;
pub mod pipeline;
pub mod render;
pub mod samples;
pub mod table;

// Re-exports for convenience
pub use pipeline::{render_quotation, render_quotation_with, RenderRequest, RenderedDocument};
