//! Product catalog data model.
//!
//! This crate provides:
//! - `ProductId` - Identifier accepted as a JSON integer or string
//! - `Product` - A single immutable catalog record
//! - `Catalog` - The ordered product list from one successful fetch
//! - `ProductPage` - The `{products, total, skip, limit}` response envelope

mod catalog;
mod error;
mod ids;
mod product;

pub use catalog::{Catalog, ProductPage};
pub use error::CatalogError;
pub use ids::ProductId;
pub use product::{format_number, Product};
