//! HTTP API surface: router, endpoint handlers, and error mapping.

pub mod endpoints;
pub mod error;
pub mod router;

pub use router::ward_api_router;
