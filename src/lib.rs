//! # Compass
//!
//! Reactive application state for the Career Advisor client.
//!
//! Compass keeps the whole application state in one immutable snapshot and
//! changes it only through actions:
//!
//! ## Store
//!
//! - `Store<S>` - Thread-safe container for the current snapshot
//! - `dispatch` - Apply an action through its section's reducer, then notify
//! - `subscribe` - Register an observer, get back an RAII `Subscription`
//! - `select` - Derive a value that is re-evaluated on every notification
//!
//! ## Sections and actions
//!
//! State is split into sections, each with its own initial value, closed
//! action enum and pure reducer. String-namespaced actions
//! (`"profile/setProfile"`) are decoded into typed ones at the edge by
//! `RawAction`, and anything unknown is rejected rather than ignored.
//!
//! ## Application
//!
//! - `app` - The `user`, `profile` and `career` sections of the Career Advisor
//! - `boundary` - Contracts for the identity provider, document store and
//!   recommendation endpoint, plus helpers that feed them into a store

pub mod action;
pub mod app;
pub mod boundary;
pub mod error;
pub mod runtime;
pub mod select;
pub mod store;

// Re-export main types for convenience
pub use action::{Action, RawAction};
pub use error::{BoundaryError, ConfigError, ReduceError, StoreError};
pub use select::Selector;
pub use store::{Section, State, Store, StoreConfig, Subscription};
