//! Client-side mirrors of the remote collections.
//!
//! Each store keeps a sorted, de-duplicated list of records plus a loading flag
//! and the last page metadata, all observable through `tokio::sync::watch`
//! receivers. Every remote call runs under a [`RetryPolicy`]; terminal failures
//! reach the store's [`ErrorHandler`] once and are returned to the caller.

pub mod buspoint;
pub mod collection;
pub mod error;
pub mod observable;
pub mod retry;
pub mod state;
pub mod view_list;

pub use buspoint::BusPointStore;
pub use collection::{BusPointTypeStore, CarrierStore, CollectionStore};
pub use error::{user_message, ErrorHandler, StoreError, TracingErrorHandler};
pub use observable::Observable;
pub use retry::RetryPolicy;
pub use state::StoreState;
pub use view_list::ViewList;
