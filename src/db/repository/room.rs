use std::str::FromStr;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::{parse_timestamp, parse_uuid};
use crate::db::DatabaseError;
use crate::models::{Bed, BedStatus, Room};

pub fn insert_room(conn: &Connection, room: &Room) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO rooms (id, room_number, floor, room_type, capacity, current_occupancy)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            room.id.to_string(),
            room.room_number,
            room.floor,
            room.room_type,
            room.capacity,
            room.current_occupancy,
        ],
    )?;
    Ok(())
}

pub fn insert_bed(conn: &Connection, bed: &Bed) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO beds (id, room_id, bed_number, status, patient_id, patient_name, occupied_since)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            bed.id.to_string(),
            bed.room_id.to_string(),
            bed.bed_number,
            bed.status.as_str(),
            bed.patient_id.map(|id| id.to_string()),
            bed.patient_name,
            bed.occupied_since.map(|t| t.to_rfc3339()),
        ],
    )?;
    Ok(())
}

pub fn get_room(conn: &Connection, room_id: &Uuid) -> Result<Option<Room>, DatabaseError> {
    conn.query_row(
        "SELECT id, room_number, floor, room_type, capacity, current_occupancy
         FROM rooms WHERE id = ?1",
        params![room_id.to_string()],
        |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, i64>(4)?,
                row.get::<_, i64>(5)?,
            ))
        },
    )
    .optional()?
    .map(|(id, room_number, floor, room_type, capacity, current_occupancy)| {
        Ok(Room {
            id: parse_uuid(&id)?,
            room_number,
            floor,
            room_type,
            capacity,
            current_occupancy,
        })
    })
    .transpose()
}

pub fn get_bed(conn: &Connection, bed_id: &Uuid) -> Result<Option<Bed>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, room_id, bed_number, status, patient_id, patient_name, occupied_since
         FROM beds WHERE id = ?1",
    )?;
    let row = stmt
        .query_map(params![bed_id.to_string()], bed_row)?
        .next()
        .transpose()?;
    row.map(bed_from_row).transpose()
}

pub fn get_beds_in_room(conn: &Connection, room_id: &Uuid) -> Result<Vec<Bed>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, room_id, bed_number, status, patient_id, patient_name, occupied_since
         FROM beds WHERE room_id = ?1 ORDER BY bed_number",
    )?;
    let rows = stmt.query_map(params![room_id.to_string()], bed_row)?;

    let mut beds = Vec::new();
    for row in rows {
        beds.push(bed_from_row(row?)?);
    }
    Ok(beds)
}

/// First available bed in a room with spare capacity, ordered by room and
/// bed number so allocation is deterministic. `None` is a normal outcome.
pub fn find_available_bed(
    conn: &Connection,
    room_type: Option<&str>,
) -> Result<Option<(Bed, Room)>, DatabaseError> {
    let sql = "SELECT b.id, b.room_id, b.bed_number, b.status, b.patient_id, b.patient_name,
                      b.occupied_since,
                      r.id, r.room_number, r.floor, r.room_type, r.capacity, r.current_occupancy
               FROM beds b
               JOIN rooms r ON r.id = b.room_id
               WHERE b.status = 'available'
                 AND r.current_occupancy < r.capacity
                 AND (?1 IS NULL OR r.room_type = ?1)
               ORDER BY r.room_number, b.bed_number
               LIMIT 1";
    let mut stmt = conn.prepare(sql)?;
    let row = stmt
        .query_map(params![room_type], |row| {
            Ok((
                bed_row(row)?,
                (
                    row.get::<_, String>(7)?,
                    row.get::<_, String>(8)?,
                    row.get::<_, Option<String>>(9)?,
                    row.get::<_, String>(10)?,
                    row.get::<_, i64>(11)?,
                    row.get::<_, i64>(12)?,
                ),
            ))
        })?
        .next()
        .transpose()?;

    row.map(|(bed, (id, room_number, floor, room_type, capacity, current_occupancy))| {
        Ok((
            bed_from_row(bed)?,
            Room {
                id: parse_uuid(&id)?,
                room_number,
                floor,
                room_type,
                capacity,
                current_occupancy,
            },
        ))
    })
    .transpose()
}

pub fn set_bed_occupied(
    conn: &Connection,
    bed_id: &Uuid,
    patient_id: &Uuid,
    patient_name: &str,
) -> Result<(), DatabaseError> {
    let updated = conn.execute(
        "UPDATE beds SET status = 'occupied', patient_id = ?2, patient_name = ?3,
         occupied_since = ?4 WHERE id = ?1",
        params![
            bed_id.to_string(),
            patient_id.to_string(),
            patient_name,
            Utc::now().to_rfc3339(),
        ],
    )?;
    if updated == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Bed".into(),
            id: bed_id.to_string(),
        });
    }
    Ok(())
}

pub fn set_bed_available(conn: &Connection, bed_id: &Uuid) -> Result<(), DatabaseError> {
    let updated = conn.execute(
        "UPDATE beds SET status = 'available', patient_id = NULL, patient_name = NULL,
         occupied_since = NULL WHERE id = ?1",
        params![bed_id.to_string()],
    )?;
    if updated == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Bed".into(),
            id: bed_id.to_string(),
        });
    }
    Ok(())
}

/// Occupancy moves only inside the same transaction that flips a bed's
/// status. The CHECK constraint on `rooms` backstops the upper bound.
pub fn increment_room_occupancy(conn: &Connection, room_id: &Uuid) -> Result<(), DatabaseError> {
    conn.execute(
        "UPDATE rooms SET current_occupancy = current_occupancy + 1 WHERE id = ?1",
        params![room_id.to_string()],
    )?;
    Ok(())
}

/// Floor of zero: a pathological double-release must never drive the
/// counter negative.
pub fn decrement_room_occupancy(conn: &Connection, room_id: &Uuid) -> Result<(), DatabaseError> {
    conn.execute(
        "UPDATE rooms SET current_occupancy = MAX(current_occupancy - 1, 0) WHERE id = ?1",
        params![room_id.to_string()],
    )?;
    Ok(())
}

// Internal row type for Bed mapping
struct BedRow {
    id: String,
    room_id: String,
    bed_number: String,
    status: String,
    patient_id: Option<String>,
    patient_name: Option<String>,
    occupied_since: Option<String>,
}

fn bed_row(row: &rusqlite::Row<'_>) -> Result<BedRow, rusqlite::Error> {
    Ok(BedRow {
        id: row.get(0)?,
        room_id: row.get(1)?,
        bed_number: row.get(2)?,
        status: row.get(3)?,
        patient_id: row.get(4)?,
        patient_name: row.get(5)?,
        occupied_since: row.get(6)?,
    })
}

fn bed_from_row(row: BedRow) -> Result<Bed, DatabaseError> {
    Ok(Bed {
        id: parse_uuid(&row.id)?,
        room_id: parse_uuid(&row.room_id)?,
        bed_number: row.bed_number,
        status: BedStatus::from_str(&row.status)?,
        patient_id: row.patient_id.as_deref().map(parse_uuid).transpose()?,
        patient_name: row.patient_name,
        occupied_since: row.occupied_since.as_deref().map(parse_timestamp).transpose()?,
    })
}
