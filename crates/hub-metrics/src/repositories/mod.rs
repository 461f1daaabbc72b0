//! Repository layer for the hub metrics collectors.
//!
//! Collectors only read persisted state. All queries are parameterized and
//! go through the [`ActivityStore`] seam so tests can substitute an
//! in-memory store.

pub mod users;

pub use users::{ActivityStore, PgActivityStore};
