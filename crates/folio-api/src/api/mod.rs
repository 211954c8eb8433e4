// HTTP API routes
//
// Route handlers for the public analytics API. Paths are relative to the
// configured API prefix.

pub mod analytics;
pub mod common;

pub use common::ErrorResponse;
