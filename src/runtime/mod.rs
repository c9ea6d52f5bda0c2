//! Runtime support for dispatch.
//!
//! This module tracks which stores are mid-dispatch on the current thread so
//! re-entrant dispatch from observers can be bounded.

mod context;

pub use context::DispatchContext;
pub(crate) use context::next_store_id;
