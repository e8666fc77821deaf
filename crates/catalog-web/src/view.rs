//! Catalog view state machine.
//!
//! `CatalogView` owns the selection and the modal flag and decides what the
//! page shows for a given query state. It renders into plain view-models so
//! the Leptos components stay thin.

use std::rc::Rc;

use catalog_core::{Catalog, Product, ProductId};
use catalog_data::{CatalogClient, FetchError, HttpTransport};
use catalog_query::{QueryKey, QueryState, QueryStatus, QueryStore};

use crate::notify::{Notifier, Toast, ToastOptions};

pub const PAGE_TITLE: &str = "Products Catalog";
pub const SECTION_TITLE: &str = "Products";
pub const LOADING_TEXT: &str = "Loading products...";
pub const ERROR_TEXT: &str = "Error loading products";
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load products. Please try again later.";

pub type CatalogState = QueryState<Catalog, FetchError>;
pub type CatalogStore = QueryStore<Catalog, FetchError>;

/// Read the catalog from `store`, fetching it through `client` on first use.
pub fn load_catalog<T>(store: &CatalogStore, key: &QueryKey, client: Rc<CatalogClient<T>>) -> CatalogState
where
    T: HttpTransport + 'static,
{
    store.get_or_fetch(key, move || async move { client.fetch_catalog().await })
}

/// The chosen product and whether its modal is showing.
///
/// The product is held by id. Closing the modal keeps the id, so reopening
/// shows the same product until another card is clicked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub product: Option<ProductId>,
    pub modal_open: bool,
}

/// Page content for a query state.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogScreen {
    Loading,
    Failed,
    Grid(Vec<ProductCardModel>),
}

/// One card in the product grid.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductCardModel {
    pub id: ProductId,
    pub thumbnail: String,
    pub title: String,
    pub price: String,
    pub description: String,
    pub category: String,
    pub rating: String,
    pub stock: String,
}

impl From<&Product> for ProductCardModel {
    fn from(p: &Product) -> Self {
        Self {
            id: p.id.clone(),
            thumbnail: p.thumbnail.clone(),
            title: p.title.clone(),
            price: p.price_label(),
            description: p.description.clone(),
            category: p.category_label(),
            rating: p.rating_label(),
            stock: p.stock_label(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalImage {
    pub src: String,
    pub alt: String,
}

/// Body of the product modal.
#[derive(Debug, Clone, PartialEq)]
pub struct ModalContent {
    pub id: ProductId,
    pub title: String,
    pub images: Vec<ModalImage>,
    pub price: String,
    pub discount: String,
    pub description: String,
    pub brand: String,
    pub category: String,
    pub rating: String,
    pub stock: String,
}

impl From<&Product> for ModalContent {
    fn from(p: &Product) -> Self {
        Self {
            id: p.id.clone(),
            title: p.title.clone(),
            images: p
                .images()
                .iter()
                .enumerate()
                .map(|(i, src)| ModalImage {
                    src: src.clone(),
                    alt: p.image_alt(i),
                })
                .collect(),
            price: p.price_label(),
            discount: p.discount_label(),
            description: p.description.clone(),
            brand: p.brand_label(),
            category: p.category_label(),
            rating: p.rating_label(),
            stock: p.stock_label(),
        }
    }
}

/// Browsing state of the catalog page.
#[derive(Debug, Clone)]
pub struct CatalogView<N> {
    selection: Selection,
    notifier: N,
    selection_toast: ToastOptions,
    error_toast: ToastOptions,
    last_status: QueryStatus,
}

impl<N: Notifier> CatalogView<N> {
    pub fn new(notifier: N) -> Self {
        Self {
            selection: Selection::default(),
            notifier,
            selection_toast: ToastOptions::selection(),
            error_toast: ToastOptions::default(),
            last_status: QueryStatus::Idle,
        }
    }

    pub fn with_toast_options(mut self, selection: ToastOptions, error: ToastOptions) -> Self {
        self.selection_toast = selection;
        self.error_toast = error;
        self
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn is_modal_open(&self) -> bool {
        self.selection.modal_open
    }

    /// Select `product`, open the modal and announce the choice.
    pub fn select_product(&mut self, product: &Product) {
        tracing::debug!(product = %product.id, "product selected");
        self.selection.product = Some(product.id.clone());
        self.selection.modal_open = true;
        self.notifier.notify(Toast::info(
            product.selection_message(),
            self.selection_toast.clone(),
        ));
    }

    /// Select the product with `id` from the loaded catalog.
    ///
    /// Returns false, changing nothing, when the catalog is not loaded or
    /// does not contain `id`.
    pub fn select_by_id(&mut self, state: &CatalogState, id: &ProductId) -> bool {
        match state.data().and_then(|catalog| catalog.get(id)) {
            Some(product) => {
                self.select_product(product);
                true
            }
            None => false,
        }
    }

    /// Hide the modal. Closing an already closed modal does nothing.
    pub fn close_modal(&mut self) {
        if self.selection.modal_open {
            tracing::debug!("product modal closed");
        }
        self.selection.modal_open = false;
    }

    /// Feed a store transition to the view.
    ///
    /// Entering Error pushes the load-failure toast once; later reports of
    /// the same Error are ignored.
    pub fn observe(&mut self, state: &CatalogState) {
        let status = state.status();
        if status == QueryStatus::Error && self.last_status != QueryStatus::Error {
            if let Some(error) = state.error() {
                tracing::error!(error = %error, "catalog failed to load");
            }
            self.notifier
                .notify(Toast::error(LOAD_FAILED_MESSAGE, self.error_toast.clone()));
        }
        self.last_status = status;
    }

    pub fn screen(&self, state: &CatalogState) -> CatalogScreen {
        match state {
            QueryState::Idle | QueryState::Loading => CatalogScreen::Loading,
            QueryState::Error(_) => CatalogScreen::Failed,
            QueryState::Success(catalog) => {
                CatalogScreen::Grid(catalog.iter().map(ProductCardModel::from).collect())
            }
        }
    }

    /// Modal body while the modal is open and the selection resolves.
    pub fn modal(&self, state: &CatalogState) -> Option<ModalContent> {
        if !self.selection.modal_open {
            return None;
        }
        let id = self.selection.product.as_ref()?;
        state.data()?.get(id).map(ModalContent::from)
    }
}
