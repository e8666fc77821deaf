//! Application root and the products section.

use std::rc::Rc;

use catalog_core::ProductId;
use catalog_data::CatalogClient;
use catalog_query::QueryKey;
use leptos::prelude::*;
use leptos_meta::{provide_meta_context, Meta, Title};

use crate::components::{ProductGrid, ProductModal, ToastContainer, ToastNotifier};
use crate::config::{AppConfig, ToastSettings};
use crate::notify::ToastQueue;
use crate::spawn::BrowserSpawner;
use crate::view::{
    load_catalog, CatalogScreen, CatalogStore, CatalogView, ERROR_TEXT, LOADING_TEXT, PAGE_TITLE,
    SECTION_TITLE,
};

#[component]
pub fn App(config: AppConfig) -> impl IntoView {
    provide_meta_context();

    let store = CatalogStore::new(BrowserSpawner);
    let client = Rc::new(CatalogClient::new().with_url(config.catalog.endpoint.clone()));
    let toasts = RwSignal::new(ToastQueue::new());

    view! {
        <Title text=PAGE_TITLE/>
        <Meta name="description" content="Browse the product catalog"/>
        <div>
            <h1>{PAGE_TITLE}</h1>
            <ProductsSection
                store=store
                client=client
                query_key=config.query_key()
                toasts=toasts
                toast_settings=config.toast.clone()
            />
            <ToastContainer queue=toasts/>
        </div>
    }
}

/// Product grid plus detail modal, driven by the catalog query.
#[component]
pub fn ProductsSection(
    store: CatalogStore,
    client: Rc<CatalogClient>,
    query_key: QueryKey,
    toasts: RwSignal<ToastQueue>,
    toast_settings: ToastSettings,
) -> impl IntoView {
    let view_state = RwSignal::new(
        CatalogView::new(ToastNotifier::new(toasts))
            .with_toast_options(toast_settings.selection_options(), toast_settings.error_options()),
    );
    let query = RwSignal::new_local(store.state(&query_key));

    let subscription = store.subscribe(&query_key, move |state| {
        query.try_set(state.clone());
        view_state.try_update(|v| v.observe(state));
    });
    // Dropped with this component's owner.
    let _subscription = StoredValue::new_local(subscription);

    let initial = load_catalog(&store, &query_key, client);
    tracing::debug!(key = %query_key, status = %initial.status(), "catalog requested");

    let on_select = Callback::new(move |id: ProductId| {
        let state = query.get_untracked();
        view_state.update(|v| {
            v.select_by_id(&state, &id);
        });
    });
    let on_close = Callback::new(move |()| view_state.update(|v| v.close_modal()));
    let modal = Signal::derive(move || {
        let state = query.get();
        view_state.with(|v| v.modal(&state))
    });
    let open = Signal::derive(move || view_state.with(|v| v.is_modal_open()));

    move || {
        let state = query.get();
        match view_state.with_untracked(|v| v.screen(&state)) {
            CatalogScreen::Loading => view! { <div class="loading">{LOADING_TEXT}</div> }.into_any(),
            CatalogScreen::Failed => view! { <div class="error">{ERROR_TEXT}</div> }.into_any(),
            CatalogScreen::Grid(cards) => view! {
                <div class="container">
                    <div class="products-section">
                        <h2>{SECTION_TITLE}</h2>
                        <ProductGrid cards=cards on_select=on_select/>
                    </div>
                    <ProductModal content=modal open=open on_close=on_close/>
                </div>
            }
            .into_any(),
        }
    }
}
