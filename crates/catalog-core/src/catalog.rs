//! The catalog and its response envelope.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::ids::ProductId;
use crate::product::Product;

/// One page of the remote product listing.
///
/// Only `products` feeds the catalog; the paging counters are kept for
/// logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub skip: u64,
    #[serde(default)]
    pub limit: u64,
}

impl ProductPage {
    /// Parse a response body.
    pub fn from_slice(body: &[u8]) -> Result<Self, CatalogError> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Keep the products in response order, rejecting duplicate ids.
    pub fn into_catalog(self) -> Result<Catalog, CatalogError> {
        Catalog::new(self.products)
    }
}

/// The ordered product list from the last successful fetch.
///
/// Replaced wholesale on refetch, never edited in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids.
    ///
    /// Records with out-of-range fields are kept; `invalid_records` lists
    /// them.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if !seen.insert(&product.id) {
                return Err(CatalogError::DuplicateId(product.id.to_string()));
            }
        }
        Ok(Self { products })
    }

    /// Range violations of the records, in catalog order.
    pub fn invalid_records(&self) -> Vec<CatalogError> {
        self.products
            .iter()
            .filter_map(|p| p.validate().err())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Product> {
        self.products.iter()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by id.
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Product at a display position.
    pub fn at(&self, index: usize) -> Option<&Product> {
        self.products.get(index)
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Product;
    type IntoIter = std::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.products.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(products: serde_json::Value) -> Vec<u8> {
        serde_json::to_vec(&serde_json::json!({
            "products": products,
            "total": 194,
            "skip": 0,
            "limit": 30
        }))
        .unwrap()
    }

    fn product(id: u64, title: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "title": title,
            "description": "d",
            "price": 1.5,
            "discountPercentage": 0,
            "rating": 3,
            "stock": 1,
            "category": "misc",
            "thumbnail": "t.png",
            "images": ["a.png", "b.png"]
        })
    }

    #[test]
    fn test_page_keeps_order() {
        let page = ProductPage::from_slice(&body(serde_json::json!([
            product(3, "c"),
            product(1, "a"),
            product(2, "b"),
        ])))
        .unwrap();
        assert_eq!(page.total, 194);
        assert_eq!(page.limit, 30);

        let catalog = page.into_catalog().unwrap();
        let titles: Vec<_> = catalog.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["c", "a", "b"]);
        assert_eq!(catalog.get(&ProductId::new("1")).unwrap().title, "a");
        assert_eq!(catalog.at(2).unwrap().title, "b");
    }

    #[test]
    fn test_paging_fields_are_optional() {
        let page = ProductPage::from_slice(br#"{"products": []}"#).unwrap();
        assert_eq!(page.total, 0);
        assert!(page.into_catalog().unwrap().is_empty());
    }

    #[test]
    fn test_missing_products_is_malformed() {
        let err = ProductPage::from_slice(br#"{"total": 1}"#).unwrap_err();
        assert!(matches!(err, CatalogError::Malformed(_)));
    }

    #[test]
    fn test_not_json_is_malformed() {
        let err = ProductPage::from_slice(b"<html>").unwrap_err();
        assert!(matches!(err, CatalogError::Malformed(_)));
    }

    #[test]
    fn test_out_of_range_record_is_kept_and_reported() {
        let mut high = product(2, "b");
        high["rating"] = serde_json::json!(5.01);
        let page = ProductPage::from_slice(&body(serde_json::json!([product(1, "a"), high]))).unwrap();

        let catalog = page.into_catalog().unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.invalid_records(),
            [CatalogError::OutOfRange {
                product_id: "2".to_string(),
                field: "rating",
                value: 5.01,
            }]
        );
    }

    #[test]
    fn test_valid_records_report_nothing() {
        let page = ProductPage::from_slice(&body(serde_json::json!([product(1, "a")]))).unwrap();
        assert!(page.into_catalog().unwrap().invalid_records().is_empty());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let page = ProductPage::from_slice(&body(serde_json::json!([
            product(1, "a"),
            product(1, "b"),
        ])))
        .unwrap();
        assert_eq!(
            page.into_catalog(),
            Err(CatalogError::DuplicateId("1".to_string()))
        );
    }
}
