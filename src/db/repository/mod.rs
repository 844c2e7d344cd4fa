//! Row-level data access. Functions take `&Connection` so they compose
//! inside a `rusqlite::Transaction` (which derefs to `Connection`) — the
//! transaction boundaries themselves live in the domain modules.

pub mod admission;
pub mod assignment;
pub mod charge;
pub mod room;

pub use admission::*;
pub use assignment::*;
pub use charge::*;
pub use room::*;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::DatabaseError;

pub(crate) fn parse_uuid(value: &str) -> Result<Uuid, DatabaseError> {
    Uuid::parse_str(value).map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))
}

pub(crate) fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))
}
