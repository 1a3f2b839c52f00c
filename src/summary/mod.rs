//! Stats summary model
//!
//! The payload the dashboard polls for, and the ways fetching it can fail.

mod error;
mod types;

pub use error::{FetchError, FetchResult, NetworkFailure};
pub use types::{Scope, SummaryRecord};
