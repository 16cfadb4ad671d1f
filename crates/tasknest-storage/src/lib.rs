//! Tasknest Storage crate - the record store interface and its JSON-file
//! write-through implementation.
//!
//! Handlers only ever see [`Store`]; [`JsonFileStore`] mirrors an in-memory
//! record array to a single JSON file, rewriting it atomically on every
//! mutation.

pub mod json_file;
pub mod store;

pub use json_file::JsonFileStore;
pub use store::{Record, Store, WriteOutcome};
