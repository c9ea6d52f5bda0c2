//! Derived reads over a store.

mod selector;

pub use selector::Selector;
