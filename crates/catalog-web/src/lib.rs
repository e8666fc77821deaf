//! Product catalog browser application.
//!
//! Fetches the product listing once, shows it as a grid and opens a detail
//! modal when a card is clicked, with toasts for selection and load errors.
//!
//! - `config` - `catalog.toml` settings
//! - `notify` - Toasts and the queue behind them
//! - `view` - Selection/modal state machine and view-models
//! - `components` - Leptos components

pub mod components;
pub mod config;
pub mod notify;
pub mod spawn;
pub mod view;

use anyhow::Context;
use catalog_observability::{LogLevel, LogSink};
use leptos::prelude::*;
use wasm_bindgen::JsCast;

use crate::components::{App, APP_ROOT_ID};
use crate::config::AppConfig;

/// Load configuration, install logging and mount the application into the
/// `#root` element.
pub fn start() -> anyhow::Result<()> {
    let config = AppConfig::embedded().context("Failed to load catalog.toml")?;
    catalog_observability::init_logging(config.logging)
        .context("Failed to initialise logging")?;

    let root = document()
        .get_element_by_id(APP_ROOT_ID)
        .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok())
        .with_context(|| format!("Missing #{APP_ROOT_ID} mount point"))?;

    tracing::info!(endpoint = %config.catalog.endpoint, "starting catalog");
    leptos::mount::mount_to(root, move || view! { <App config=config/> }).forget();
    Ok(())
}

/// Write a startup failure to `sink`. Used before logging is installed.
pub fn report_startup_error<S: LogSink>(sink: &S, err: &anyhow::Error) {
    sink.write(LogLevel::Error, &format!("catalog failed to start: {err:#}"));
}
