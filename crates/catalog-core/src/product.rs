//! Product records as served by the catalog API.

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::ids::ProductId;

/// A product in the catalog.
///
/// Records are immutable once fetched. Field names follow the remote JSON
/// (`discountPercentage`, `thumbnail`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Display name.
    pub title: String,
    /// Long-form description.
    pub description: String,
    /// Unit price, non-negative.
    pub price: f64,
    /// Discount in percent, 0 to 100.
    pub discount_percentage: f64,
    /// Average rating, 0 to 5.
    pub rating: f64,
    /// Units in stock.
    pub stock: u64,
    /// Brand name, missing for unbranded goods.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Category slug.
    pub category: String,
    /// Thumbnail URL shown on cards.
    pub thumbnail: String,
    /// Gallery URLs in display order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

impl Product {
    /// Check field ranges.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let out_of_range = |field: &'static str, value: f64| CatalogError::OutOfRange {
            product_id: self.id.to_string(),
            field,
            value,
        };

        if !(self.price.is_finite() && self.price >= 0.0) {
            return Err(out_of_range("price", self.price));
        }
        if !(0.0..=100.0).contains(&self.discount_percentage) {
            return Err(out_of_range("discountPercentage", self.discount_percentage));
        }
        if !(0.0..=5.0).contains(&self.rating) {
            return Err(out_of_range("rating", self.rating));
        }
        if matches!(&self.images, Some(images) if images.is_empty()) {
            return Err(CatalogError::EmptyImages(self.id.to_string()));
        }
        Ok(())
    }

    /// Gallery images in order, empty when the record has none.
    pub fn images(&self) -> &[String] {
        self.images.as_deref().unwrap_or_default()
    }

    /// Brand name, or an empty string.
    pub fn brand_or_empty(&self) -> &str {
        self.brand.as_deref().unwrap_or("")
    }

    /// Price as shown to users, e.g. `$9.99`.
    pub fn price_display(&self) -> String {
        format!("${}", format_number(self.price))
    }

    /// `Price: $9.99`
    pub fn price_label(&self) -> String {
        format!("Price: {}", self.price_display())
    }

    /// `Discount: 7.17%`
    pub fn discount_label(&self) -> String {
        format!("Discount: {}%", format_number(self.discount_percentage))
    }

    /// `Rating: 4.94⭐`
    pub fn rating_label(&self) -> String {
        format!("Rating: {}\u{2b50}", format_number(self.rating))
    }

    /// `Stock: 5 units`
    pub fn stock_label(&self) -> String {
        format!("Stock: {} units", self.stock)
    }

    /// `Category: beauty`
    pub fn category_label(&self) -> String {
        format!("Category: {}", self.category)
    }

    /// `Brand: Essence`
    pub fn brand_label(&self) -> String {
        format!("Brand: {}", self.brand_or_empty())
    }

    /// Message pushed when the product is selected.
    pub fn selection_message(&self) -> String {
        format!("Selected: {} - {}", self.title, self.price_display())
    }

    /// Alt text for the gallery image at `index` (0-based).
    pub fn image_alt(&self, index: usize) -> String {
        format!("{} - Image {}", self.title, index + 1)
    }
}

/// Format a decimal the way a browser prints a number: shortest round-trip
/// digits, plain notation for exponents -7 < e < 21, `1e+21` / `1e-7` style
/// outside that range.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        // Avoid printing negative zero.
        return "0".to_string();
    }

    let scientific = format!("{:e}", value);
    let exponent = scientific
        .split_once('e')
        .and_then(|(mantissa, exp)| Some((mantissa, exp.parse::<i32>().ok()?)));
    match exponent {
        Some((mantissa, exp)) if exp >= 21 => format!("{}e+{}", mantissa, exp),
        Some((mantissa, exp)) if exp <= -7 => format!("{}e{}", mantissa, exp),
        _ => format!("{}", value),
    }
}
