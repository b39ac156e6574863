//! Page chrome – the fixed decorative frame drawn identically on every page:
//! double border, header band with logo and company address, two accent
//! rules, and the footer contact strip. Pure append of ops onto the current
//! page; what content follows never changes the result.

use printpdf::Op;

use crate::fonts::{TextMeasurer, MM_PER_PT};
use crate::pagination::PageGeometry;
use crate::render::{
    accent_orange, black, brand_blue, dim_gray, draw_hline, draw_text_center, draw_text_right,
    place_image, stroke_rect, EmbeddedImage,
};

pub const COMPANY_HEADER_NAME: &str = "RAISE LAB EQUIPMENT";

const COMPANY_ADDRESS: [&str; 3] = [
    "C-6, B1, Industrial Park, Moula Ali,",
    "Hyderabad, Secunderabad,",
    "Telangana 500040",
];

pub const CONTACT_LINE: &str =
    "Write us: info@raiselabequip.com / sales@raiselabequip.com | Contact: +91 91777 70365";

/// Logo box: 70×25 mm anchored at (margin, 12).
const LOGO_W_MM: f32 = 70.0;
const LOGO_H_MM: f32 = 25.0;
const LOGO_Y_MM: f32 = 12.0;

/// Painter for the per-page frame. Carries the registered logo XObject, or
/// nothing when the logo failed to load (the header-left region stays empty).
#[derive(Debug, Clone, Default)]
pub struct Chrome {
    pub logo: Option<EmbeddedImage>,
}

impl Chrome {
    pub fn new(logo: Option<EmbeddedImage>) -> Self {
        Self { logo }
    }

    pub fn paint(&self, geom: &PageGeometry, measurer: &TextMeasurer, ops: &mut Vec<Op>) {
        let w = geom.width;
        let h = geom.height;
        let margin = geom.margin;

        // Concentric decorative borders.
        stroke_rect(ops, 5.0, 5.0, w - 10.0, h - 10.0, 1.2, brand_blue(), h);
        stroke_rect(ops, 7.0, 7.0, w - 14.0, h - 14.0, 0.8, accent_orange(), h);

        // Footer contact strip.
        stroke_rect(
            ops,
            margin + 10.0,
            h - 20.0,
            w - margin * 2.0 - 20.0,
            8.0,
            0.3,
            black(),
            h,
        );
        draw_text_center(
            ops,
            measurer,
            CONTACT_LINE,
            8.0,
            true,
            w / 2.0,
            h - 14.5,
            h,
            black(),
        );

        // Header band: logo left, company block right-aligned.
        if let Some(logo) = &self.logo {
            place_image(ops, logo, margin, LOGO_Y_MM, LOGO_W_MM, LOGO_H_MM, h);
        }
        draw_text_right(
            ops,
            measurer,
            COMPANY_HEADER_NAME,
            11.0,
            true,
            w - margin,
            18.0,
            h,
            brand_blue(),
        );
        let address_step = 9.0 * 1.4 * MM_PER_PT;
        for (i, line) in COMPANY_ADDRESS.iter().enumerate() {
            draw_text_right(
                ops,
                measurer,
                line,
                9.0,
                false,
                w - margin,
                24.0 + i as f32 * address_step,
                h,
                dim_gray(),
            );
        }

        // Accent rules below the header.
        draw_hline(ops, margin, w - margin, 42.0, 0.3, brand_blue(), h);
        draw_hline(ops, margin, w - margin, 43.0, 0.3, accent_orange(), h);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paint_is_repeatable() {
        let chrome = Chrome::default();
        let geom = PageGeometry::a4();
        let measurer = TextMeasurer::new();

        let mut first = Vec::new();
        chrome.paint(&geom, &measurer, &mut first);
        let mut second = Vec::new();
        chrome.paint(&geom, &measurer, &mut second);

        assert!(!first.is_empty());
        assert_eq!(first.len(), second.len());
    }

    #[test]
    fn missing_logo_skips_header_left() {
        let geom = PageGeometry::a4();
        let measurer = TextMeasurer::new();

        let mut without = Vec::new();
        Chrome::default().paint(&geom, &measurer, &mut without);
        assert!(
            !without.iter().any(|op| matches!(op, Op::UseXobject { .. })),
            "no logo means no image placement"
        );
    }
}
