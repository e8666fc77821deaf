//! Remote catalog client.
//!
//! This crate provides:
//! - `CatalogClient` - Single GET against the catalog endpoint
//! - `HttpTransport` - The seam between the client and the network
//! - `ReqwestTransport` - Transport backed by `reqwest` (fetch API in the browser)
//! - `FetchError` - Network and parse failures

mod client;
mod transport;

pub use client::*;
pub use transport::*;
