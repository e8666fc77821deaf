//! Catalog fetch client.

use catalog_core::{Catalog, CatalogError, ProductPage};

use crate::transport::{HttpTransport, ReqwestTransport};

/// Default product listing endpoint.
pub const DEFAULT_CATALOG_URL: &str = "https://dummyjson.com/products";

/// Broad failure category, as surfaced to the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// Transport failure or non-success status.
    Network,
    /// Body is not JSON or not a product page.
    Parse,
}

/// Error type for catalog fetches.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("HTTP error: {status} for {url}")]
    Http { status: u16, url: String },

    #[error("Parse error: {0}")]
    Parse(#[from] CatalogError),
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            Self::Connection(_) | Self::Http { .. } => FetchErrorKind::Network,
            Self::Parse(_) => FetchErrorKind::Parse,
        }
    }
}

/// Fetches the product catalog with a single GET.
///
/// No retry, no timeout and no paging: whatever page the endpoint returns by
/// default is the catalog.
#[derive(Debug, Clone)]
pub struct CatalogClient<T = ReqwestTransport> {
    transport: T,
    url: String,
}

impl CatalogClient<ReqwestTransport> {
    /// Client for the default endpoint over `reqwest`.
    pub fn new() -> Self {
        Self::with_transport(ReqwestTransport::new())
    }
}

impl Default for CatalogClient<ReqwestTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: HttpTransport> CatalogClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            url: DEFAULT_CATALOG_URL.to_string(),
        }
    }

    /// Point the client at another endpoint.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// GET the endpoint and parse its `products` array.
    pub async fn fetch_catalog(&self) -> Result<Catalog, FetchError> {
        tracing::debug!(url = %self.url, "fetching catalog");

        let resp = self
            .transport
            .get(&self.url)
            .await
            .map_err(|e| FetchError::Connection(e.to_string()))?;

        if !resp.status.is_success() {
            tracing::warn!(url = %self.url, status = resp.status.as_u16(), "catalog request failed");
            return Err(FetchError::Http {
                status: resp.status.as_u16(),
                url: self.url.clone(),
            });
        }

        let page = ProductPage::from_slice(&resp.body)?;
        let (total, skip, limit) = (page.total, page.skip, page.limit);
        let catalog = page.into_catalog()?;
        for problem in catalog.invalid_records() {
            tracing::warn!(url = %self.url, %problem, "catalog record out of range");
        }

        tracing::info!(
            url = %self.url,
            products = catalog.len(),
            total,
            skip,
            limit,
            "catalog fetched"
        );

        Ok(catalog)
    }
}
