//! Input data model – the records the engine consumes from upstream
//! (quotation store, product catalogue, user session). All of it arrives
//! fully formed; this crate never touches a database.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// One quotation record. The grand total is trusted as supplied upstream and
/// never recomputed during rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quotation {
    pub id: String,
    /// Human-readable number, also the output filename stem.
    pub quotation_number: String,
    pub customer_name: String,
    #[serde(default)]
    pub customer_address: Option<String>,
    pub created_at: NaiveDate,
    #[serde(default)]
    pub grand_total: f64,
}

/// A quoted product/equipment entry with its own descriptive content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub specs: Vec<SpecEntry>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image_mode: ImageMode,
    /// Selected addons contribute to the displayed unit price and are listed
    /// as "Standard Accessories" in the commercial table.
    #[serde(default)]
    pub addons: Vec<Addon>,
}

impl LineItem {
    /// Unit price plus all selected addon prices – the figure shown in the
    /// commercial table's price cell.
    pub fn quoted_price(&self) -> f64 {
        self.price + self.addons.iter().map(|a| a.price).sum::<f64>()
    }
}

/// One key/value specification row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecEntry {
    pub key: String,
    pub value: String,
}

/// An optional accessory selected for a line item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Addon {
    pub name: String,
    pub price: f64,
}

/// How a line item's photo is placed relative to its feature list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageMode {
    /// Photo spans most of the content width, above the feature list.
    #[default]
    Wide,
    /// Feature bullets on the left, photo in the right column.
    Tall,
}

/// A curated terms-and-conditions entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectedTerm {
    pub title: String,
    pub text: String,
}

/// The fixed terms set used whenever no curated selection is supplied.
pub fn default_terms() -> Vec<SelectedTerm> {
    let entries = [
        ("Packaging", "Included in the quoted price."),
        ("Freight", "Extra at actuals, to the customer's account."),
        (
            "Delivery",
            "4-6 weeks from the date of confirmed purchase order with advance.",
        ),
        (
            "Installation & Training",
            "Free of cost at the customer site by our service engineer.",
        ),
        ("Payment", "100% advance along with the purchase order."),
        (
            "Warranty",
            "12 months from the date of installation against manufacturing defects.",
        ),
        (
            "Governing Law",
            "All disputes are subject to Hyderabad jurisdiction only.",
        ),
        (
            "Modification",
            "Specifications are subject to change without prior notice as part of continuous improvement.",
        ),
    ];
    entries
        .iter()
        .map(|(title, text)| SelectedTerm {
            title: (*title).to_string(),
            text: (*text).to_string(),
        })
        .collect()
}

/// Currency selector. Affects the symbol, the column label, and digit
/// grouping only – amounts are never converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Currency {
    #[default]
    #[serde(rename = "INR")]
    Inr,
    #[serde(rename = "USD")]
    Usd,
}

impl Currency {
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Inr => "Rs.",
            Currency::Usd => "$",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Currency::Inr => "INR",
            Currency::Usd => "USD",
        }
    }

    /// Group an amount for display: Indian lakh/crore grouping for INR
    /// (1,25,000), Western thousands for USD (125,000). Whole amounts render
    /// without decimals, fractional amounts with two.
    pub fn format_amount(&self, amount: f64) -> String {
        let negative = amount < 0.0;
        let amount = amount.abs();
        let mut whole = amount.trunc() as u64;
        let mut paise = ((amount - amount.trunc()) * 100.0).round() as u64;
        if paise >= 100 {
            whole += 1;
            paise = 0;
        }

        let mut grouped = match self {
            Currency::Inr => group_indian(whole),
            Currency::Usd => group_western(whole),
        };
        if paise > 0 {
            grouped.push_str(&format!(".{paise:02}"));
        }
        if negative {
            grouped.insert(0, '-');
        }
        grouped
    }
}

fn group_western(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Indian grouping: rightmost group of three, then groups of two.
fn group_indian(value: u64) -> String {
    let digits = value.to_string();
    if digits.len() <= 3 {
        return digits;
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut out = String::with_capacity(digits.len() + digits.len() / 2);
    for (i, ch) in head.chars().enumerate() {
        if i > 0 && (head.len() - i) % 2 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.push(',');
    out.push_str(tail);
    out
}

/// Validity of the offer: an explicit date wins over a day count relative to
/// the quotation date; with neither, the field renders blank.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Validity {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub days: Option<u32>,
}

impl Validity {
    pub fn resolve(&self, created_at: NaiveDate) -> Option<NaiveDate> {
        if self.date.is_some() {
            return self.date;
        }
        self.days
            .and_then(|d| created_at.checked_add_days(Days::new(u64::from(d))))
    }
}

/// Render-time context: currency, signature identity, and logo source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderContext {
    #[serde(default)]
    pub currency: Currency,
    #[serde(default = "RenderContext::default_salesperson")]
    pub salesperson_name: String,
    #[serde(default = "RenderContext::default_phone")]
    pub salesperson_phone: String,
    #[serde(default = "RenderContext::default_company")]
    pub company_name: String,
    /// Logo asset: a file path, an http(s) URL, or a base64 data URI.
    #[serde(default)]
    pub logo_source: Option<String>,
    #[serde(default)]
    pub validity: Validity,
}

impl RenderContext {
    fn default_salesperson() -> String {
        "SALES TEAM".to_string()
    }

    fn default_phone() -> String {
        "+91 91777 70365".to_string()
    }

    fn default_company() -> String {
        "Raise Lab Equipment".to_string()
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self {
            currency: Currency::default(),
            salesperson_name: Self::default_salesperson(),
            salesperson_phone: Self::default_phone(),
            company_name: Self::default_company(),
            logo_source: None,
            validity: Validity::default(),
        }
    }
}

/// Dates on the metadata grid use dd-mm-yyyy.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

/// Reject malformed input before any page is opened. Asset problems are
/// handled later and soft; everything checked here is fatal.
pub fn validate_inputs(quotation: &Quotation, items: &[LineItem]) -> Result<(), String> {
    if quotation.quotation_number.trim().is_empty() {
        return Err("quotation number is empty".to_string());
    }
    if quotation.customer_name.trim().is_empty() {
        return Err("customer name is empty".to_string());
    }
    if !quotation.grand_total.is_finite() || quotation.grand_total < 0.0 {
        return Err(format!(
            "quotation {}: grand total {} is not a valid amount",
            quotation.quotation_number, quotation.grand_total
        ));
    }
    if items.is_empty() {
        return Err(format!(
            "quotation {} has no line items",
            quotation.quotation_number
        ));
    }
    for item in items {
        if item.name.trim().is_empty() {
            return Err(format!("line item {} has no name", item.id));
        }
        if !item.price.is_finite() || item.price <= 0.0 {
            return Err(format!(
                "line item '{}': price {} is not a valid amount",
                item.name, item.price
            ));
        }
        for addon in &item.addons {
            if !addon.price.is_finite() || addon.price < 0.0 {
                return Err(format!(
                    "line item '{}': addon '{}' has an invalid price",
                    item.name, addon.name
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quotation() -> Quotation {
        Quotation {
            id: "q1".to_string(),
            quotation_number: "Q-2024-001".to_string(),
            customer_name: "Acme Pharma".to_string(),
            customer_address: None,
            created_at: NaiveDate::from_ymd_opt(2024, 11, 5).unwrap(),
            grand_total: 125000.0,
        }
    }

    fn item() -> LineItem {
        LineItem {
            id: "i1".to_string(),
            name: "Disintegration Tester".to_string(),
            description: String::new(),
            price: 125000.0,
            features: vec![],
            specs: vec![],
            image_url: None,
            image_mode: ImageMode::Wide,
            addons: vec![],
        }
    }

    #[test]
    fn indian_grouping() {
        assert_eq!(Currency::Inr.format_amount(125000.0), "1,25,000");
        assert_eq!(Currency::Inr.format_amount(1250000.0), "12,50,000");
        assert_eq!(Currency::Inr.format_amount(1000.0), "1,000");
        assert_eq!(Currency::Inr.format_amount(999.0), "999");
        assert_eq!(Currency::Inr.format_amount(10000000.0), "1,00,00,000");
    }

    #[test]
    fn western_grouping() {
        assert_eq!(Currency::Usd.format_amount(125000.0), "125,000");
        assert_eq!(Currency::Usd.format_amount(999.0), "999");
        assert_eq!(Currency::Usd.format_amount(1234567.0), "1,234,567");
    }

    #[test]
    fn fractional_amounts_keep_two_decimals() {
        assert_eq!(Currency::Inr.format_amount(1250.5), "1,250.50");
        assert_eq!(Currency::Usd.format_amount(99.99), "99.99");
    }

    #[test]
    fn quoted_price_includes_addons() {
        let mut it = item();
        it.addons = vec![
            Addon {
                name: "Spare basket".to_string(),
                price: 5000.0,
            },
            Addon {
                name: "Printer".to_string(),
                price: 20000.0,
            },
        ];
        assert!((it.quoted_price() - 150000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn validity_explicit_date_wins() {
        let created = NaiveDate::from_ymd_opt(2024, 11, 5).unwrap();
        let explicit = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let v = Validity {
            date: Some(explicit),
            days: Some(15),
        };
        assert_eq!(v.resolve(created), Some(explicit));
    }

    #[test]
    fn validity_days_offset_from_creation() {
        let created = NaiveDate::from_ymd_opt(2024, 11, 5).unwrap();
        let v = Validity {
            date: None,
            days: Some(30),
        };
        assert_eq!(
            v.resolve(created),
            NaiveDate::from_ymd_opt(2024, 12, 5)
        );
    }

    #[test]
    fn validation_rejects_missing_fields() {
        let q = quotation();
        assert!(validate_inputs(&q, &[]).is_err());

        let mut bad = item();
        bad.price = 0.0;
        assert!(validate_inputs(&q, &[bad]).is_err());

        let mut unnamed = item();
        unnamed.name = "  ".to_string();
        assert!(validate_inputs(&q, &[unnamed]).is_err());

        assert!(validate_inputs(&q, &[item()]).is_ok());
    }

    #[test]
    fn image_mode_serde_names() {
        let wide: ImageMode = serde_json::from_str("\"wide\"").unwrap();
        let tall: ImageMode = serde_json::from_str("\"tall\"").unwrap();
        assert_eq!(wide, ImageMode::Wide);
        assert_eq!(tall, ImageMode::Tall);
    }

    #[test]
    fn date_formatting() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(format_date(d), "09-03-2024");
    }

    #[test]
    fn default_terms_has_eight_entries() {
        let terms = default_terms();
        assert_eq!(terms.len(), 8);
        assert_eq!(terms[0].title, "Packaging");
    }
}
