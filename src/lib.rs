//! Wardflow: inpatient admission and bed allocation.
//!
//! Tracks a ward's room/bed catalog, admits patients into catalog or manual
//! placements, keeps an append-only charge ledger per admission, and
//! processes discharges — each lifecycle step as one database transaction.

pub mod allocator;
pub mod api;
pub mod catalog;
pub mod charges;
pub mod config;
pub mod db;
pub mod discharge;
pub mod error;
pub mod models;
pub mod state;

#[cfg(test)]
pub mod testutil;
