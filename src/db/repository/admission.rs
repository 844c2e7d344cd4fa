use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::{parse_timestamp, parse_uuid};
use crate::db::DatabaseError;
use crate::models::{Admission, AdmissionStatus, BedReference};

const ADMISSION_COLUMNS: &str =
    "id, admission_code, patient_id, patient_name, doctor_id, room_id, bed_id,
     manual_room_label, manual_bed_label, status, notes, total_charges_cents,
     admitted_at, admitted_by, discharged_at, discharged_by";

pub fn insert_admission(conn: &Connection, admission: &Admission) -> Result<(), DatabaseError> {
    let (room_id, bed_id, manual_room, manual_bed) = reference_columns(&admission.bed_reference);
    conn.execute(
        "INSERT INTO admissions (id, admission_code, patient_id, patient_name, doctor_id,
         room_id, bed_id, manual_room_label, manual_bed_label, status, notes,
         total_charges_cents, admitted_at, admitted_by, discharged_at, discharged_by)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        params![
            admission.id.to_string(),
            admission.admission_code,
            admission.patient_id.to_string(),
            admission.patient_name,
            admission.doctor_id.to_string(),
            room_id,
            bed_id,
            manual_room,
            manual_bed,
            admission.status.as_str(),
            admission.notes,
            admission.total_charges_cents,
            admission.admitted_at.to_rfc3339(),
            admission.admitted_by.to_string(),
            admission.discharged_at.map(|t| t.to_rfc3339()),
            admission.discharged_by.map(|id| id.to_string()),
        ],
    )?;
    Ok(())
}

pub fn get_admission(conn: &Connection, id: &Uuid) -> Result<Option<Admission>, DatabaseError> {
    let sql = format!("SELECT {ADMISSION_COLUMNS} FROM admissions WHERE id = ?1");
    let mut stmt = conn.prepare(&sql)?;
    let row = stmt
        .query_map(params![id.to_string()], admission_row)?
        .next()
        .transpose()?;
    row.map(admission_from_row).transpose()
}

pub fn get_admission_by_code(
    conn: &Connection,
    code: &str,
) -> Result<Option<Admission>, DatabaseError> {
    let sql = format!("SELECT {ADMISSION_COLUMNS} FROM admissions WHERE admission_code = ?1");
    let mut stmt = conn.prepare(&sql)?;
    let row = stmt.query_map(params![code], admission_row)?.next().transpose()?;
    row.map(admission_from_row).transpose()
}

/// The admission (if any) currently holding a catalog bed. At most one row
/// can match; the bed-exclusivity invariant depends on it.
pub fn active_admission_for_bed(
    conn: &Connection,
    bed_id: &Uuid,
) -> Result<Option<Admission>, DatabaseError> {
    let sql = format!(
        "SELECT {ADMISSION_COLUMNS} FROM admissions
         WHERE bed_id = ?1 AND status = 'admitted'"
    );
    let mut stmt = conn.prepare(&sql)?;
    let row = stmt
        .query_map(params![bed_id.to_string()], admission_row)?
        .next()
        .transpose()?;
    row.map(admission_from_row).transpose()
}

/// Adjust the denormalized running total. Only the charge-append transaction
/// calls this, in the same transaction as the line-item insert.
pub fn add_to_total_charges(
    conn: &Connection,
    admission_id: &Uuid,
    delta_cents: i64,
) -> Result<(), DatabaseError> {
    let updated = conn.execute(
        "UPDATE admissions SET total_charges_cents = total_charges_cents + ?2 WHERE id = ?1",
        params![admission_id.to_string(), delta_cents],
    )?;
    if updated == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Admission".into(),
            id: admission_id.to_string(),
        });
    }
    Ok(())
}

pub fn mark_discharged(
    conn: &Connection,
    admission_id: &Uuid,
    discharged_at: DateTime<Utc>,
    discharged_by: &Uuid,
) -> Result<(), DatabaseError> {
    let updated = conn.execute(
        "UPDATE admissions SET status = 'discharged', discharged_at = ?2, discharged_by = ?3
         WHERE id = ?1",
        params![
            admission_id.to_string(),
            discharged_at.to_rfc3339(),
            discharged_by.to_string(),
        ],
    )?;
    if updated == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Admission".into(),
            id: admission_id.to_string(),
        });
    }
    Ok(())
}

pub fn update_bed_reference(
    conn: &Connection,
    admission_id: &Uuid,
    reference: &BedReference,
) -> Result<(), DatabaseError> {
    let (room_id, bed_id, manual_room, manual_bed) = reference_columns(reference);
    let updated = conn.execute(
        "UPDATE admissions SET room_id = ?2, bed_id = ?3, manual_room_label = ?4,
         manual_bed_label = ?5 WHERE id = ?1",
        params![admission_id.to_string(), room_id, bed_id, manual_room, manual_bed],
    )?;
    if updated == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Admission".into(),
            id: admission_id.to_string(),
        });
    }
    Ok(())
}

fn reference_columns(
    reference: &BedReference,
) -> (Option<String>, Option<String>, Option<String>, Option<String>) {
    match reference {
        BedReference::Catalog { room_id, bed_id } => {
            (Some(room_id.to_string()), Some(bed_id.to_string()), None, None)
        }
        BedReference::Manual { room_label, bed_label } => {
            (None, None, Some(room_label.clone()), Some(bed_label.clone()))
        }
    }
}

// Internal row type for Admission mapping
struct AdmissionRow {
    id: String,
    admission_code: String,
    patient_id: String,
    patient_name: String,
    doctor_id: String,
    room_id: Option<String>,
    bed_id: Option<String>,
    manual_room_label: Option<String>,
    manual_bed_label: Option<String>,
    status: String,
    notes: Option<String>,
    total_charges_cents: i64,
    admitted_at: String,
    admitted_by: String,
    discharged_at: Option<String>,
    discharged_by: Option<String>,
}

fn admission_row(row: &rusqlite::Row<'_>) -> Result<AdmissionRow, rusqlite::Error> {
    Ok(AdmissionRow {
        id: row.get(0)?,
        admission_code: row.get(1)?,
        patient_id: row.get(2)?,
        patient_name: row.get(3)?,
        doctor_id: row.get(4)?,
        room_id: row.get(5)?,
        bed_id: row.get(6)?,
        manual_room_label: row.get(7)?,
        manual_bed_label: row.get(8)?,
        status: row.get(9)?,
        notes: row.get(10)?,
        total_charges_cents: row.get(11)?,
        admitted_at: row.get(12)?,
        admitted_by: row.get(13)?,
        discharged_at: row.get(14)?,
        discharged_by: row.get(15)?,
    })
}

fn admission_from_row(row: AdmissionRow) -> Result<Admission, DatabaseError> {
    let bed_reference = BedReference::from_columns(
        row.room_id.as_deref().map(parse_uuid).transpose()?,
        row.bed_id.as_deref().map(parse_uuid).transpose()?,
        row.manual_room_label,
        row.manual_bed_label,
    )?;
    Ok(Admission {
        id: parse_uuid(&row.id)?,
        admission_code: row.admission_code,
        patient_id: parse_uuid(&row.patient_id)?,
        patient_name: row.patient_name,
        doctor_id: parse_uuid(&row.doctor_id)?,
        bed_reference,
        status: AdmissionStatus::from_str(&row.status)?,
        notes: row.notes,
        total_charges_cents: row.total_charges_cents,
        admitted_at: parse_timestamp(&row.admitted_at)?,
        admitted_by: parse_uuid(&row.admitted_by)?,
        discharged_at: row.discharged_at.as_deref().map(parse_timestamp).transpose()?,
        discharged_by: row.discharged_by.as_deref().map(parse_uuid).transpose()?,
    })
}
