// Storage layer for Folio analytics
// Decision: Support both PostgreSQL (production) and in-memory (dev mode)
//
// Both backends implement folio_core::AnalyticsStore:
// - Database: PostgreSQL via sqlx
// - InMemoryDatabase: parking_lot-guarded Vec, lost on restart
// - StorageBackend: enum dispatch over the two, chosen at startup

pub mod backend;
pub mod memory;
pub mod models;
pub mod repositories;

pub use backend::StorageBackend;
pub use memory::InMemoryDatabase;
pub use models::*;
pub use repositories::*;

use folio_core::AnalyticsError;

/// Convert a backend error into the store-boundary error, keeping the
/// full context chain for server-side logs.
pub(crate) fn storage_error(err: anyhow::Error) -> AnalyticsError {
    AnalyticsError::storage(format!("{:#}", err))
}
