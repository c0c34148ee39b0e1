//! Session state store for a transient lab session: roster, station
//! assignments, gradable tasks, passed-tasks ledger, and the derived
//! proposed grade per student — persisted as string-keyed JSON documents
//! and exportable as a structured report model.
//!
//! The `ipc` module and the `labstationd` binary wrap the store in a
//! line-delimited JSON protocol over stdin/stdout for the UI shell.

pub mod calc;
pub mod codec;
pub mod error;
pub mod events;
pub mod ipc;
pub mod kv;
pub mod logging;
pub mod model;
pub mod repo;
pub mod report;
pub mod store;

pub use error::{Result, StoreError};
pub use store::{SessionSnapshot, SessionStore};
