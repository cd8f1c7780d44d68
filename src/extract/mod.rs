//! HTML and embedded-data extractors
//!
//! Everything in here is synchronous and side-effect free: callers hand in
//! raw HTML and get records back. Parse failures inside one source are
//! logged and that source contributes nothing.

pub mod detail;
pub mod json;
pub mod listing;

pub use detail::extract_detail;
pub use listing::{ListingPage, extract_listing};
