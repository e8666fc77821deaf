//! Leptos components.

mod app;
mod grid;
mod modal;
mod toast;

pub use app::{App, ProductsSection};
pub use grid::{ProductCard, ProductGrid};
pub use modal::{cycle_focus, Modal, ProductModal, APP_ROOT_ID};
pub use toast::{ToastContainer, ToastNotifier};
