//! Catalog error types.

use thiserror::Error;

/// Errors raised while turning a response body into a catalog.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// The body is not JSON or does not have the expected shape.
    #[error("Malformed catalog payload: {0}")]
    Malformed(String),

    /// A product field is outside its allowed range.
    #[error("Invalid {field} for product {product_id}: {value}")]
    OutOfRange {
        product_id: String,
        field: &'static str,
        value: f64,
    },

    /// A product carries an `images` list with no entries.
    #[error("Product {0} has an empty image list")]
    EmptyImages(String),

    /// Two products share an identifier.
    #[error("Duplicate product id: {0}")]
    DuplicateId(String),
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::Malformed(e.to_string())
    }
}
