//! End-to-end catalog flow: canned HTTP responses through the store and
//! into the view state.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use async_trait::async_trait;
use catalog_core::ProductId;
use catalog_data::{CatalogClient, HttpResponse, HttpTransport, TransportError};
use catalog_query::{QueryKey, QueryStatus, Subscription};
use catalog_web::notify::{Notifier, Toast, ToastKind};
use catalog_web::view::{
    load_catalog, CatalogScreen, CatalogStore, CatalogView, LOAD_FAILED_MESSAGE,
};
use futures::executor::LocalPool;
use http::StatusCode;

const PRODUCTS: &str = r#"{
    "products": [
        {"id": 1, "title": "Essence Mascara Lash Princess", "description": "Popular mascara",
         "price": 9.99, "discountPercentage": 7.17, "rating": 4.94, "stock": 5,
         "brand": "Essence", "category": "beauty", "thumbnail": "thumb-1.png",
         "images": ["1.png", "2.png", "3.png"]},
        {"id": 2, "title": "Eyeshadow Palette with Mirror", "description": "Versatile palette",
         "price": 19.99, "discountPercentage": 5.5, "rating": 3.28, "stock": 44,
         "brand": "Glamour Beauty", "category": "beauty", "thumbnail": "thumb-2.png",
         "images": ["4.png"]}
    ],
    "total": 194,
    "skip": 0,
    "limit": 2
}"#;

struct Canned {
    result: Result<HttpResponse, TransportError>,
    calls: Cell<usize>,
}

impl Canned {
    fn ok(body: &str) -> Rc<CatalogClient<Self>> {
        Self::client(Ok(HttpResponse::new(StatusCode::OK, body.as_bytes())))
    }

    fn client(result: Result<HttpResponse, TransportError>) -> Rc<CatalogClient<Self>> {
        Rc::new(CatalogClient::with_transport(Self {
            result,
            calls: Cell::new(0),
        }))
    }
}

#[async_trait(?Send)]
impl HttpTransport for Canned {
    async fn get(&self, _url: &str) -> Result<HttpResponse, TransportError> {
        self.calls.set(self.calls.get() + 1);
        self.result.clone()
    }
}

#[derive(Clone, Default)]
struct Recorder(Rc<RefCell<Vec<Toast>>>);

impl Notifier for Recorder {
    fn notify(&self, toast: Toast) {
        self.0.borrow_mut().push(toast);
    }
}

/// A view wired to store transitions the way the products section is.
fn observed_view(
    store: &CatalogStore,
    key: &QueryKey,
    recorder: &Recorder,
) -> (Rc<RefCell<CatalogView<Recorder>>>, Subscription) {
    let view = Rc::new(RefCell::new(CatalogView::new(recorder.clone())));
    let listener_view = Rc::clone(&view);
    let sub = store.subscribe(key, move |state| listener_view.borrow_mut().observe(state));
    (view, sub)
}

#[test]
fn test_browse_and_select_product() {
    let mut pool = LocalPool::new();
    let store = CatalogStore::new(pool.spawner());
    let key = QueryKey::products();
    let recorder = Recorder::default();
    let (view, _sub) = observed_view(&store, &key, &recorder);
    let client = Canned::ok(PRODUCTS);

    let state = load_catalog(&store, &key, Rc::clone(&client));
    assert_eq!(state.status(), QueryStatus::Loading);
    assert_eq!(view.borrow().screen(&state), CatalogScreen::Loading);

    pool.run_until_stalled();

    let state = store.state(&key);
    assert_eq!(state.status(), QueryStatus::Success);
    let CatalogScreen::Grid(cards) = view.borrow().screen(&state) else {
        panic!("expected grid");
    };
    let titles: Vec<_> = cards.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(
        titles,
        ["Essence Mascara Lash Princess", "Eyeshadow Palette with Mirror"]
    );

    assert!(view.borrow_mut().select_by_id(&state, &cards[0].id));
    let modal = view.borrow().modal(&state).unwrap();
    assert_eq!(modal.title, "Essence Mascara Lash Princess");
    assert_eq!(modal.price, "Price: $9.99");
    assert_eq!(modal.discount, "Discount: 7.17%");
    assert_eq!(modal.rating, "Rating: 4.94\u{2b50}");
    assert_eq!(modal.stock, "Stock: 5 units");
    assert_eq!(modal.images.len(), 3);

    let toasts = recorder.0.borrow().clone();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].kind, ToastKind::Info);
    assert_eq!(toasts[0].message, "Selected: Essence Mascara Lash Princess - $9.99");

    view.borrow_mut().close_modal();
    assert!(!view.borrow().is_modal_open());
    assert_eq!(view.borrow().modal(&state), None);
    assert_eq!(
        view.borrow().selection().product,
        Some(ProductId::new("1"))
    );
    assert_eq!(client.transport().calls.get(), 1);
}

#[test]
fn test_two_views_share_one_request() {
    let mut pool = LocalPool::new();
    let store = CatalogStore::new(pool.spawner());
    let key = QueryKey::products();
    let client = Canned::ok(PRODUCTS);

    let first = load_catalog(&store, &key, Rc::clone(&client));
    let second = load_catalog(&store, &key, Rc::clone(&client));
    assert_eq!(first.status(), QueryStatus::Loading);
    assert_eq!(second.status(), QueryStatus::Loading);

    pool.run_until_stalled();

    assert_eq!(client.transport().calls.get(), 1);
    assert_eq!(store.state(&key).data().map(|c| c.len()), Some(2));

    // A later mount is served from the cache.
    let third = load_catalog(&store, &key, Rc::clone(&client));
    assert_eq!(third.status(), QueryStatus::Success);
    pool.run_until_stalled();
    assert_eq!(client.transport().calls.get(), 1);
}

#[test]
fn test_failed_load_shows_error_and_one_toast() {
    let mut pool = LocalPool::new();
    let store = CatalogStore::new(pool.spawner());
    let key = QueryKey::products();
    let recorder = Recorder::default();
    let (view, _sub) = observed_view(&store, &key, &recorder);

    let statuses = Rc::new(RefCell::new(Vec::new()));
    let seen = Rc::clone(&statuses);
    let _statuses_sub = store.subscribe(&key, move |state| seen.borrow_mut().push(state.status()));

    let client = Canned::client(Err(TransportError("connection refused".to_string())));
    load_catalog(&store, &key, Rc::clone(&client));
    pool.run_until_stalled();

    assert_eq!(
        statuses.borrow().as_slice(),
        [QueryStatus::Loading, QueryStatus::Error]
    );
    let state = store.state(&key);
    assert_eq!(view.borrow().screen(&state), CatalogScreen::Failed);
    assert!(!view.borrow_mut().select_by_id(&state, &ProductId::new("1")));

    let toasts = recorder.0.borrow().clone();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].kind, ToastKind::Error);
    assert_eq!(toasts[0].message, LOAD_FAILED_MESSAGE);

    // Errors are not retried.
    load_catalog(&store, &key, Rc::clone(&client));
    pool.run_until_stalled();
    assert_eq!(client.transport().calls.get(), 1);
    assert_eq!(recorder.0.borrow().len(), 1);
}

#[test]
fn test_bad_status_is_an_error() {
    let mut pool = LocalPool::new();
    let store = CatalogStore::new(pool.spawner());
    let key = QueryKey::products();
    let client = Canned::client(Ok(HttpResponse::new(
        StatusCode::INTERNAL_SERVER_ERROR,
        "oops".as_bytes(),
    )));

    load_catalog(&store, &key, client);
    pool.run_until_stalled();

    assert_eq!(store.state(&key).status(), QueryStatus::Error);
}
