//! Domain-level errors shared by the catalog, allocator, charge, and
//! discharge operations. Mapped to HTTP responses in `api::error`.

use thiserror::Error;
use uuid::Uuid;

use crate::db::DatabaseError;

#[derive(Debug, Error)]
pub enum WardError {
    #[error("Room not found: {0}")]
    RoomNotFound(Uuid),

    #[error("Bed not found: {0}")]
    BedNotFound(Uuid),

    #[error("Admission not found: {0}")]
    AdmissionNotFound(String),

    #[error("Bed {bed_id} is not available: {reason}")]
    BedUnavailable { bed_id: Uuid, reason: String },

    #[error("Room {room_id} is at capacity ({capacity})")]
    RoomAtCapacity { room_id: Uuid, capacity: i64 },

    #[error("Bed {0} is held by an active admission")]
    BedInUse(Uuid),

    #[error("Admission {0} is already discharged")]
    AlreadyDischarged(String),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}
