//! Query store with per-key request de-duplication.
//!
//! The store is single-threaded: entries live behind `Rc<RefCell<_>>` and
//! requests run on an injected `LocalSpawn` task queue. Each key keeps an
//! explicit in-flight record; a caller asking for a key that is already
//! loading attaches to that record instead of issuing another request.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::rc::{Rc, Weak};

use futures::future::{self, FutureExt, LocalBoxFuture, Shared};
use futures::task::{LocalSpawn, LocalSpawnExt};

use crate::key::QueryKey;
use crate::state::QueryState;

/// Outcome of a request, shared between every caller attached to it.
pub type FetchResult<T, E> = Result<Rc<T>, Rc<E>>;

type SharedFetch<T, E> = Shared<LocalBoxFuture<'static, FetchResult<T, E>>>;
type Listener<T, E> = Rc<dyn Fn(&QueryState<T, E>)>;

/// The request currently running for a key.
struct InFlight<T, E> {
    id: u64,
    future: SharedFetch<T, E>,
}

struct Entry<T, E> {
    state: QueryState<T, E>,
    in_flight: Option<InFlight<T, E>>,
    listeners: Vec<(u64, Listener<T, E>)>,
}

impl<T, E> Entry<T, E> {
    fn new() -> Self {
        Self {
            state: QueryState::Idle,
            in_flight: None,
            listeners: Vec::new(),
        }
    }
}

struct Inner<T, E> {
    entries: HashMap<QueryKey, Entry<T, E>>,
    /// Transitions waiting to be delivered, in the order they happened.
    pending: VecDeque<(QueryKey, QueryState<T, E>)>,
    dispatching: bool,
    next_id: u64,
}

impl<T, E> Inner<T, E> {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn entry(&mut self, key: &QueryKey) -> &mut Entry<T, E> {
        self.entries.entry(key.clone()).or_insert_with(Entry::new)
    }

    fn listener(&self, key: &QueryKey, id: u64) -> Option<Listener<T, E>> {
        self.entries
            .get(key)?
            .listeners
            .iter()
            .find(|(listener_id, _)| *listener_id == id)
            .map(|(_, listener)| Rc::clone(listener))
    }

    /// Set the state of `key` and queue the transition for delivery.
    ///
    /// Returns true when the caller must drain the queue.
    fn record(&mut self, key: &QueryKey, state: QueryState<T, E>) -> bool {
        tracing::debug!(key = %key, status = %state.status(), "query transition");
        self.entry(key).state = state.clone();
        self.pending.push_back((key.clone(), state));
        if self.dispatching {
            false
        } else {
            self.dispatching = true;
            true
        }
    }
}

/// Apply a transition and deliver it, along with any transitions listeners
/// cause, strictly in order.
fn transition<T, E>(inner: &RefCell<Inner<T, E>>, key: &QueryKey, state: QueryState<T, E>) {
    if !inner.borrow_mut().record(key, state) {
        return;
    }

    loop {
        let next = {
            let mut guard = inner.borrow_mut();
            match guard.pending.pop_front() {
                Some((key, state)) => {
                    let ids: Vec<u64> = guard
                        .entries
                        .get(&key)
                        .map(|e| e.listeners.iter().map(|(id, _)| *id).collect())
                        .unwrap_or_default();
                    Some((key, state, ids))
                }
                None => {
                    guard.dispatching = false;
                    None
                }
            }
        };

        let Some((key, state, ids)) = next else {
            break;
        };

        for id in ids {
            // A listener may unsubscribe another one mid-delivery.
            let listener = inner.borrow().listener(&key, id);
            if let Some(listener) = listener {
                listener(&state);
            }
        }
    }
}

/// Store the outcome of request `id`, unless a newer request replaced it.
fn settle<T, E>(inner: &RefCell<Inner<T, E>>, key: &QueryKey, id: u64, result: &FetchResult<T, E>) {
    let current = {
        let mut guard = inner.borrow_mut();
        match guard.entries.get_mut(key) {
            Some(entry) if entry.in_flight.as_ref().map(|f| f.id) == Some(id) => {
                entry.in_flight = None;
                true
            }
            _ => false,
        }
    };
    if !current {
        tracing::debug!(key = %key, request = id, "discarding superseded result");
        return;
    }

    let state = match result {
        Ok(data) => QueryState::Success(Rc::clone(data)),
        Err(error) => QueryState::Error(Rc::clone(error)),
    };
    transition(inner, key, state);
}

/// Cache of query results keyed by `QueryKey`.
///
/// Cloning the store yields another handle to the same cache. Entries have
/// no expiry; a settled entry is only replaced by `refetch`.
pub struct QueryStore<T, E> {
    inner: Rc<RefCell<Inner<T, E>>>,
    spawner: Rc<dyn LocalSpawn>,
}

impl<T, E> Clone for QueryStore<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
            spawner: Rc::clone(&self.spawner),
        }
    }
}

impl<T: 'static, E: 'static> QueryStore<T, E> {
    /// Create a store whose requests run on `spawner`.
    pub fn new(spawner: impl LocalSpawn + 'static) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                entries: HashMap::new(),
                pending: VecDeque::new(),
                dispatching: false,
                next_id: 0,
            })),
            spawner: Rc::new(spawner),
        }
    }

    /// Current state of `key`; Idle when never requested.
    pub fn state(&self, key: &QueryKey) -> QueryState<T, E> {
        self.inner
            .borrow()
            .entries
            .get(key)
            .map(|e| e.state.clone())
            .unwrap_or_default()
    }

    /// Whether a request for `key` is running.
    pub fn in_flight(&self, key: &QueryKey) -> bool {
        self.inner
            .borrow()
            .entries
            .get(key)
            .is_some_and(|e| e.in_flight.is_some())
    }

    /// Call `listener` on every transition of `key` until the returned
    /// subscription is dropped.
    pub fn subscribe(
        &self,
        key: &QueryKey,
        listener: impl Fn(&QueryState<T, E>) + 'static,
    ) -> Subscription {
        let listener: Listener<T, E> = Rc::new(listener);
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id();
            inner.entry(key).listeners.push((id, listener));
            id
        };

        let weak: Weak<RefCell<Inner<T, E>>> = Rc::downgrade(&self.inner);
        let key = key.clone();
        Subscription {
            unsubscribe: Some(Box::new(move || {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                // Dropped only after the borrow ends: the closure may own
                // other subscriptions.
                let removed: Vec<(u64, Listener<T, E>)> = match inner.borrow_mut().entries.get_mut(&key) {
                    Some(entry) => {
                        let (removed, kept) = std::mem::take(&mut entry.listeners)
                            .into_iter()
                            .partition(|(listener_id, _)| *listener_id == id);
                        entry.listeners = kept;
                        removed
                    }
                    None => Vec::new(),
                };
                drop(removed);
            })),
        }
    }

    /// Return the cached state of `key`, starting a request when there is
    /// none.
    ///
    /// - Success/Error: returned as is, `fetch` is not called.
    /// - Loading: the running request is reused, `fetch` is not called.
    /// - Idle: moves to Loading and queues `fetch`.
    pub fn get_or_fetch<F, Fut>(&self, key: &QueryKey, fetch: F) -> QueryState<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>> + 'static,
    {
        match self.state(key) {
            QueryState::Idle => {
                self.start(key, fetch);
                self.state(key)
            }
            QueryState::Loading => {
                tracing::debug!(key = %key, "attaching to in-flight request");
                QueryState::Loading
            }
            settled => settled,
        }
    }

    /// Awaitable form of `get_or_fetch`.
    ///
    /// Resolves immediately for settled entries and shares the running
    /// request when one exists.
    pub fn fetch<F, Fut>(&self, key: &QueryKey, fetch: F) -> LocalBoxFuture<'static, FetchResult<T, E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>> + 'static,
    {
        if let Some(running) = self.running(key) {
            tracing::debug!(key = %key, "attaching to in-flight request");
            return running.boxed_local();
        }
        match self.state(key) {
            QueryState::Success(data) => future::ready(Ok(data)).boxed_local(),
            QueryState::Error(error) => future::ready(Err(error)).boxed_local(),
            QueryState::Idle | QueryState::Loading => self.start(key, fetch).boxed_local(),
        }
    }

    /// Replace the entry for `key` with a fresh request.
    ///
    /// When a request is already running it is reused instead.
    pub fn refetch<F, Fut>(&self, key: &QueryKey, fetch: F) -> QueryState<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>> + 'static,
    {
        if self.running(key).is_some() {
            tracing::debug!(key = %key, "refetch attached to in-flight request");
        } else {
            self.start(key, fetch);
        }
        self.state(key)
    }

    fn running(&self, key: &QueryKey) -> Option<SharedFetch<T, E>> {
        self.inner
            .borrow()
            .entries
            .get(key)?
            .in_flight
            .as_ref()
            .map(|f| f.future.clone())
    }

    fn start<F, Fut>(&self, key: &QueryKey, fetch: F) -> SharedFetch<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>> + 'static,
    {
        let id = self.inner.borrow_mut().next_id();
        let weak = Rc::downgrade(&self.inner);
        let task_key = key.clone();
        let request = fetch();

        // Whoever polls the shared future first settles the entry, so the
        // state is written exactly once per request.
        let future = async move {
            let result = request.await.map(Rc::new).map_err(Rc::new);
            if let Some(inner) = weak.upgrade() {
                settle(&inner, &task_key, id, &result);
            }
            result
        }
        .boxed_local()
        .shared();

        self.inner.borrow_mut().entry(key).in_flight = Some(InFlight {
            id,
            future: future.clone(),
        });
        tracing::debug!(key = %key, request = id, "starting request");
        transition(&self.inner, key, QueryState::Loading);

        if let Err(err) = self.spawner.spawn_local(future.clone().map(|_| ())) {
            tracing::warn!(key = %key, error = %err, "task queue unavailable, request runs only when awaited");
        }

        future
    }
}

/// Listener registration returned by `QueryStore::subscribe`.
///
/// Dropping it removes the listener, so a request finishing after its view
/// is gone never calls back into that view.
#[must_use = "dropping a Subscription removes the listener"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Remove the listener now.
    pub fn cancel(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use futures::channel::oneshot;
    use futures::executor::{block_on, LocalPool};

    use super::*;
    use crate::state::QueryStatus;

    type Store = QueryStore<Vec<u32>, String>;

    fn recorder(store: &Store, key: &QueryKey) -> (Rc<RefCell<Vec<QueryStatus>>>, Subscription) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let sub = store.subscribe(key, move |s| sink.borrow_mut().push(s.status()));
        (seen, sub)
    }

    fn counting_fetch(
        calls: &Rc<Cell<usize>>,
        result: Result<Vec<u32>, String>,
    ) -> impl FnOnce() -> future::Ready<Result<Vec<u32>, String>> {
        let calls = Rc::clone(calls);
        move || {
            calls.set(calls.get() + 1);
            future::ready(result)
        }
    }

    #[test]
    fn test_success_transitions() {
        let mut pool = LocalPool::new();
        let store = Store::new(pool.spawner());
        let key = QueryKey::products();
        let (seen, _sub) = recorder(&store, &key);
        let calls = Rc::new(Cell::new(0));

        assert_eq!(store.state(&key).status(), QueryStatus::Idle);
        let state = store.get_or_fetch(&key, counting_fetch(&calls, Ok(vec![1, 2])));
        assert!(state.is_loading());
        assert!(store.in_flight(&key));

        pool.run_until_stalled();

        assert_eq!(*seen.borrow(), [QueryStatus::Loading, QueryStatus::Success]);
        assert_eq!(**store.state(&key).data().unwrap(), vec![1, 2]);
        assert!(!store.in_flight(&key));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_concurrent_callers_share_one_request() {
        let mut pool = LocalPool::new();
        let store = Store::new(pool.spawner());
        let key = QueryKey::products();
        let calls = Rc::new(Cell::new(0));

        let first = store.get_or_fetch(&key, counting_fetch(&calls, Ok(vec![7])));
        let second = store.get_or_fetch(&key, counting_fetch(&calls, Ok(vec![8])));
        assert!(first.is_loading());
        assert!(second.is_loading());

        pool.run_until_stalled();

        assert_eq!(calls.get(), 1);
        assert_eq!(**store.state(&key).data().unwrap(), vec![7]);
    }

    #[test]
    fn test_awaiting_callers_attach_to_in_flight_request() {
        let mut pool = LocalPool::new();
        let store = Store::new(pool.spawner());
        let key = QueryKey::products();
        let calls = Rc::new(Cell::new(0));
        let (tx, rx) = oneshot::channel::<Vec<u32>>();

        let counter = Rc::clone(&calls);
        let a = store.fetch(&key, move || {
            counter.set(counter.get() + 1);
            async move { rx.await.map_err(|e| e.to_string()) }
        });
        let b = store.fetch(&key, counting_fetch(&calls, Ok(vec![0])));

        tx.send(vec![4, 5]).unwrap();
        let (a, b) = pool.run_until(future::join(a, b));

        let (a, b) = (a.unwrap(), b.unwrap());
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(*a, vec![4, 5]);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_settled_entry_is_served_from_cache() {
        let mut pool = LocalPool::new();
        let store = Store::new(pool.spawner());
        let key = QueryKey::products();
        let calls = Rc::new(Cell::new(0));

        store.get_or_fetch(&key, counting_fetch(&calls, Ok(vec![1])));
        pool.run_until_stalled();

        let again = store.get_or_fetch(&key, counting_fetch(&calls, Ok(vec![2])));
        assert_eq!(again.status(), QueryStatus::Success);
        let awaited = block_on(store.fetch(&key, counting_fetch(&calls, Ok(vec![3])))).unwrap();
        assert_eq!(*awaited, vec![1]);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_failure_transitions_without_retry() {
        let mut pool = LocalPool::new();
        let store = Store::new(pool.spawner());
        let key = QueryKey::products();
        let (seen, _sub) = recorder(&store, &key);
        let calls = Rc::new(Cell::new(0));

        store.get_or_fetch(&key, counting_fetch(&calls, Err("connection refused".into())));
        pool.run_until_stalled();

        assert_eq!(*seen.borrow(), [QueryStatus::Loading, QueryStatus::Error]);
        assert_eq!(**store.state(&key).error().unwrap(), "connection refused");

        let again = store.get_or_fetch(&key, counting_fetch(&calls, Ok(vec![1])));
        assert_eq!(again.status(), QueryStatus::Error);
        pool.run_until_stalled();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_refetch_replaces_data_wholesale() {
        let mut pool = LocalPool::new();
        let store = Store::new(pool.spawner());
        let key = QueryKey::products();
        let calls = Rc::new(Cell::new(0));

        store.get_or_fetch(&key, counting_fetch(&calls, Err("down".into())));
        pool.run_until_stalled();
        let (seen, _sub) = recorder(&store, &key);

        let state = store.refetch(&key, counting_fetch(&calls, Ok(vec![9, 9])));
        assert!(state.is_loading());
        // A second refetch while loading attaches to the first.
        store.refetch(&key, counting_fetch(&calls, Ok(vec![0])));
        pool.run_until_stalled();

        assert_eq!(*seen.borrow(), [QueryStatus::Loading, QueryStatus::Success]);
        assert_eq!(**store.state(&key).data().unwrap(), vec![9, 9]);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_keys_are_independent() {
        let mut pool = LocalPool::new();
        let store = Store::new(pool.spawner());
        let calls = Rc::new(Cell::new(0));
        let products = QueryKey::products();
        let beauty = QueryKey::products().with("beauty");

        store.get_or_fetch(&products, counting_fetch(&calls, Ok(vec![1])));
        store.get_or_fetch(&beauty, counting_fetch(&calls, Ok(vec![2])));
        pool.run_until_stalled();

        assert_eq!(calls.get(), 2);
        assert_eq!(**store.state(&beauty).data().unwrap(), vec![2]);
    }

    #[test]
    fn test_dropped_subscription_is_not_called() {
        let mut pool = LocalPool::new();
        let store = Store::new(pool.spawner());
        let key = QueryKey::products();
        let (seen, sub) = recorder(&store, &key);
        let calls = Rc::new(Cell::new(0));

        store.get_or_fetch(&key, counting_fetch(&calls, Ok(vec![1])));
        drop(sub);
        pool.run_until_stalled();

        assert_eq!(*seen.borrow(), [QueryStatus::Loading]);
        assert_eq!(store.state(&key).status(), QueryStatus::Success);
    }

    #[test]
    fn test_request_outliving_store_is_harmless() {
        let mut pool = LocalPool::new();
        let store = Store::new(pool.spawner());
        let calls = Rc::new(Cell::new(0));

        store.get_or_fetch(&QueryKey::products(), counting_fetch(&calls, Ok(vec![1])));
        drop(store);
        pool.run_until_stalled();

        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_nested_transitions_are_delivered_in_order() {
        let mut pool = LocalPool::new();
        let store = Store::new(pool.spawner());
        let key = QueryKey::products();
        let calls = Rc::new(Cell::new(0));

        // Retries once from inside a listener when the first request fails.
        let retry_store = store.clone();
        let retry_key = key.clone();
        let retry_calls = Rc::clone(&calls);
        let _retry = store.subscribe(&key, move |state| {
            if state.status() == QueryStatus::Error && retry_calls.get() == 1 {
                retry_store.refetch(&retry_key, counting_fetch(&retry_calls, Ok(vec![3])));
            }
        });
        let (seen, _sub) = recorder(&store, &key);

        store.get_or_fetch(&key, counting_fetch(&calls, Err("flaky".into())));
        pool.run_until_stalled();

        assert_eq!(
            *seen.borrow(),
            [
                QueryStatus::Loading,
                QueryStatus::Error,
                QueryStatus::Loading,
                QueryStatus::Success,
            ]
        );
        assert_eq!(calls.get(), 2);
    }
}
