//! Read-only access to the dashboard's row store
//!
//! Call history, semantic analysis results and scheduled meetings are
//! served by a PostgREST-style REST endpoint. Nothing here writes.

mod client;
pub mod format;
mod rows;

pub use client::{RowStore, StoreError};
pub use rows::{CallRecord, Meeting, SemanticAnalysis};
