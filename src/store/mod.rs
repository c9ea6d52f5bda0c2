//! The reactive store.
//!
//! A [`Store`] holds one immutable snapshot of a [`State`], applies actions
//! through per-[`Section`] reducers and notifies observers after each commit.

mod config;
pub(crate) mod observers;
mod state;
mod store;
mod subscription;

pub use config::StoreConfig;
pub use state::{reduce_section, Section, State};
pub use store::Store;
pub use subscription::Subscription;
