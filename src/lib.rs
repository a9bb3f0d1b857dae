//! # Buspoints (transit management client)
//!
//! `buspoints` talks to the transit-management REST API, a Spring Data REST
//! style service that serves bus points (stops), bus point types and carriers as
//! HAL documents.
//!
//! ## Stores
//!
//! Each resource is mirrored by a store that owns a sorted, de-duplicated view of
//! the remote collection. Stores only change their local state after the server
//! accepted a request, so the view always reflects the last known server state.
//!
//! - [`store::BusPointStore`] resolves the type of every bus point with one
//!   follow-up request per item. A failed lookup keeps the item with an
//!   unresolved type instead of failing the whole fetch.
//! - [`store::BusPointTypeStore`] and [`store::CarrierStore`] mirror plain
//!   collections.
//!
//! Transient failures are retried (3 attempts by default). Terminal failures
//! clear the loading flag and are forwarded once to the injected
//! [`store::ErrorHandler`].
//!
//! ## Authentication
//!
//! Requests to an allow-listed API origin carry the configured bearer token; see
//! [`api::ResourceServer`].

pub mod api;
pub mod cli;
pub mod model;
pub mod store;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
