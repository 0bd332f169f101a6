//! Data-fetch and pagination control layer of the catalog browser.
//!
//! [`fetch::FetchClient`] issues bounded GET requests, [`catalog::CatalogApi`]
//! maps them onto the catalog endpoints, and [`listing::ListingController`]
//! drives a listing view through page changes, searches and retries.

pub mod catalog;
pub mod detail;
pub mod fetch;
pub mod listing;
pub mod pagination;
pub mod sequence;

pub use catalog::CatalogApi;
pub use detail::{DetailLoader, DetailState, RecordSource, RecordTarget};
pub use fetch::{FetchClient, InFlight, QueryParams, DEFAULT_TIMEOUT};
pub use listing::{ListingController, ListingState, PageSource};
pub use pagination::{pagination_window, PaginationControls, DEFAULT_MAX_BUTTONS};
pub use sequence::RequestSequencer;

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
