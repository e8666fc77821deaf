//! Query key composition.

use serde::{Deserialize, Serialize};

/// Identifies one cache entry.
///
/// Keys are built from one or more components joined with `:`, so
/// `QueryKey::new("products").with("page-2")` is `products:page-2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QueryKey {
    key: String,
    components: Vec<String>,
}

impl QueryKey {
    /// Create a single-component key.
    pub fn new(root: impl Into<String>) -> Self {
        let root = root.into();
        Self {
            key: root.clone(),
            components: vec![root],
        }
    }

    /// Key for the product listing.
    pub fn products() -> Self {
        Self::new("products")
    }

    /// Append a component.
    pub fn with(mut self, component: impl Into<String>) -> Self {
        let component = component.into();
        self.key.push(':');
        self.key.push_str(&component);
        self.components.push(component);
        self
    }

    /// Get the key string.
    pub fn as_str(&self) -> &str {
        &self.key
    }

    /// Get the key components.
    pub fn components(&self) -> &[String] {
        &self.components
    }
}

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key)
    }
}

impl From<&str> for QueryKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
