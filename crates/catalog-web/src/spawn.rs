//! Task queue backed by the browser event loop.

use futures::task::{LocalFutureObj, LocalSpawn, SpawnError};

/// Runs store requests through `leptos::task::spawn_local`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserSpawner;

impl LocalSpawn for BrowserSpawner {
    fn spawn_local_obj(&self, future: LocalFutureObj<'static, ()>) -> Result<(), SpawnError> {
        leptos::task::spawn_local(future);
        Ok(())
    }
}
