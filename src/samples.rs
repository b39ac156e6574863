//! Sample render requests for demos and tests.
//!
//! Each sample exercises a different slice of the engine: single-item
//! text-only, multi-item with photos in both layout modes, and long feature
//! lists that force page breaks.

use base64::{engine::general_purpose::STANDARD as BASE64_STD, Engine as _};
use chrono::NaiveDate;

use crate::model::{
    Addon, Currency, ImageMode, LineItem, Quotation, RenderContext, SpecEntry, Validity,
};
use crate::pipeline::RenderRequest;

/// A deterministic in-memory PNG wrapped in a data URI, so samples render
/// photos without touching disk or network.
pub fn sample_photo_data_uri(width: u32, height: u32) -> String {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([
            (40 + (x * 5) % 180) as u8,
            (60 + (y * 7) % 160) as u8,
            140,
        ])
    });
    let mut png = Vec::new();
    // Writing into an in-memory cursor cannot fail for a valid RGB buffer.
    let _ = image::DynamicImage::ImageRgb8(img).write_to(
        &mut std::io::Cursor::new(&mut png),
        image::ImageFormat::Png,
    );
    format!("data:image/png;base64,{}", BASE64_STD.encode(&png))
}

fn created_at() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 11, 5).unwrap_or_default()
}

/// Single text-only item, INR, default terms.
pub fn sample_request() -> RenderRequest {
    RenderRequest {
        quotation: Quotation {
            id: "q-disintegration".to_string(),
            quotation_number: "Q-2024-001".to_string(),
            customer_name: "Acme Pharma Labs".to_string(),
            customer_address: Some("Plot 14, Pharma City,\nVisakhapatnam 530012".to_string()),
            created_at: created_at(),
            grand_total: 125000.0,
        },
        items: vec![LineItem {
            id: "item-dt".to_string(),
            name: "Disintegration Tester".to_string(),
            description: "Two-station disintegration test apparatus for tablets and capsules, \
                          compliant with IP/BP/USP methods. Microprocessor-controlled bath \
                          temperature with digital display."
                .to_string(),
            price: 125000.0,
            features: vec![
                "Two baskets with 6 tubes each".to_string(),
                "PID-controlled water bath, 37 \u{00B0}C \u{00B1} 0.5".to_string(),
                "Automatic stroke counter with end-of-test alarm".to_string(),
            ],
            specs: vec![
                SpecEntry {
                    key: "Stroke rate".to_string(),
                    value: "30 cycles per minute".to_string(),
                },
                SpecEntry {
                    key: "Power supply".to_string(),
                    value: "230 V AC, 50 Hz".to_string(),
                },
            ],
            image_url: None,
            image_mode: ImageMode::Wide,
            addons: vec![],
        }],
        context: RenderContext {
            currency: Currency::Inr,
            salesperson_name: "R. Sharma".to_string(),
            salesperson_phone: "+91 91777 70365".to_string(),
            company_name: "Raise Lab Equipment".to_string(),
            logo_source: None,
            validity: Validity {
                date: None,
                days: Some(30),
            },
        },
        selected_terms: vec![],
    }
}

/// Two items: the first text-only with selected addons, the second with a
/// photo beside a tall feature column.
pub fn catalogue_request() -> RenderRequest {
    let mut req = sample_request();
    req.quotation.quotation_number = "Q-2024-002".to_string();
    req.quotation.grand_total = 410000.0;

    req.items[0].addons = vec![
        Addon {
            name: "Spare basket assembly".to_string(),
            price: 18000.0,
        },
        Addon {
            name: "Thermal printer".to_string(),
            price: 22000.0,
        },
    ];

    req.items.push(LineItem {
        id: "item-fr".to_string(),
        name: "Friability Test Apparatus".to_string(),
        description: "Single drum friability tester with brushless drive and preset count."
            .to_string(),
        price: 245000.0,
        features: vec![
            "Acrylic drum, 287 mm diameter".to_string(),
            "25 rpm fixed speed with count preset".to_string(),
            "Auto-stop and drum position parking".to_string(),
        ],
        specs: vec![SpecEntry {
            key: "Drum capacity".to_string(),
            value: "20 tablets nominal".to_string(),
        }],
        image_url: Some(sample_photo_data_uri(300, 420)),
        image_mode: ImageMode::Tall,
        addons: vec![],
    });
    req
}

/// Feature list long enough to overflow the first page.
pub fn overflow_request() -> RenderRequest {
    let mut req = sample_request();
    req.quotation.quotation_number = "Q-2024-003".to_string();
    req.items[0].features = (1..=70)
        .map(|i| format!("Listed capability number {i} of the installed configuration"))
        .collect();
    req
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_photo_is_a_png_data_uri() {
        let uri = sample_photo_data_uri(8, 8);
        assert!(uri.starts_with("data:image/png;base64,"));
        let loaded = crate::images::load_image(&uri).unwrap();
        assert_eq!((loaded.width, loaded.height), (8, 8));
    }

    #[test]
    fn samples_pass_validation() {
        for req in [sample_request(), catalogue_request(), overflow_request()] {
            crate::model::validate_inputs(&req.quotation, &req.items).unwrap();
        }
    }
}
