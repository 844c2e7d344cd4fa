//! Resource catalog reads: available-bed lookup and room snapshots.
//! Strictly read-only; a missing bed is a normal outcome, not a fault.

use rusqlite::Connection;
use serde::Serialize;
use uuid::Uuid;

use crate::db::repository;
use crate::error::WardError;
use crate::models::{Bed, Room};

/// An available bed together with its room, as returned to callers picking
/// a placement for an admission.
#[derive(Debug, Clone, Serialize)]
pub struct AvailableBed {
    pub bed: Bed,
    pub room: Room,
}

/// First available bed in a room below capacity, optionally restricted to a
/// room type. `Ok(None)` means the catalog has nothing free right now.
pub fn find_available_bed(
    conn: &Connection,
    room_type: Option<&str>,
) -> Result<Option<AvailableBed>, WardError> {
    let found = repository::find_available_bed(conn, room_type)?;
    Ok(found.map(|(bed, room)| AvailableBed { bed, room }))
}

/// A room with its beds, for the ward dashboard and the bed-assignment
/// endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct RoomSnapshot {
    pub room: Room,
    pub beds: Vec<Bed>,
}

pub fn room_snapshot(conn: &Connection, room_id: &Uuid) -> Result<RoomSnapshot, WardError> {
    let room = repository::get_room(conn, room_id)?.ok_or(WardError::RoomNotFound(*room_id))?;
    let beds = repository::get_beds_in_room(conn, room_id)?;
    Ok(RoomSnapshot { room, beds })
}
