//! Bed allocator: the atomic admit transaction and mid-stay bed
//! reassignment.
//!
//! Every entry point opens a single `BEGIN IMMEDIATE` transaction covering
//! the admission row, the bed/room state flip, and the assignment history
//! append. Concurrent admits serialize on the write lock; the loser re-reads
//! the bed inside its own transaction and fails the availability check
//! instead of double-committing.

use chrono::Utc;
use rusqlite::{Connection, TransactionBehavior};
use serde::Deserialize;
use uuid::Uuid;

use crate::db::repository;
use crate::error::WardError;
use crate::models::{Admission, AdmissionStatus, Bed, BedAssignmentRecord, BedReference, BedStatus};

/// Everything needed to admit a patient. Required fields are required at
/// the type level; "missing field" is a parse error, not a runtime check.
#[derive(Debug, Clone, Deserialize)]
pub struct AdmitRequest {
    pub patient_id: Uuid,
    pub patient_name: String,
    pub doctor_id: Uuid,
    pub bed_reference: BedReference,
    pub notes: Option<String>,
    pub admitted_by: Uuid,
}

/// Admit a patient into a catalog bed or a manual placement.
///
/// Catalog placements are validated (bed exists in the named room, bed
/// Available, room below capacity) and flip bed + occupancy state. Manual
/// placements skip the capacity check: they exist so reception is never
/// blocked when the physical bed has no catalog entry.
pub fn admit(conn: &mut Connection, request: &AdmitRequest) -> Result<Admission, WardError> {
    if request.patient_name.trim().is_empty() {
        return Err(WardError::Validation("patient_name must not be empty".into()));
    }
    validate_reference(&request.bed_reference)?;

    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(crate::db::DatabaseError::from)?;

    let (room_label, bed_label) = match &request.bed_reference {
        BedReference::Catalog { room_id, bed_id } => occupy_catalog_bed(
            &tx,
            room_id,
            bed_id,
            &request.patient_id,
            &request.patient_name,
        )?,
        BedReference::Manual { room_label, bed_label } => {
            tracing::warn!(
                room_label,
                bed_label,
                patient = %request.patient_id,
                "Manual bed placement: no capacity check applies"
            );
            (room_label.clone(), bed_label.clone())
        }
    };

    let id = Uuid::new_v4();
    let admission = Admission {
        id,
        admission_code: Admission::generate_code(&id),
        patient_id: request.patient_id,
        patient_name: request.patient_name.clone(),
        doctor_id: request.doctor_id,
        bed_reference: request.bed_reference.clone(),
        status: AdmissionStatus::Admitted,
        notes: request.notes.clone(),
        total_charges_cents: 0,
        admitted_at: Utc::now(),
        admitted_by: request.admitted_by,
        discharged_at: None,
        discharged_by: None,
    };
    repository::insert_admission(&tx, &admission)?;

    append_assignment(
        &tx,
        &admission.id,
        &admission.bed_reference,
        &room_label,
        &bed_label,
        &request.admitted_by,
    )?;

    tx.commit().map_err(crate::db::DatabaseError::from)?;

    tracing::info!(
        admission = %admission.admission_code,
        patient = %admission.patient_id,
        room = %room_label,
        bed = %bed_label,
        "Patient admitted"
    );
    Ok(admission)
}

/// Move an active admission to a different bed.
///
/// Releases the old catalog bed (if any), occupies the new placement under
/// the same checks as admit, updates the admission's reference, and appends
/// to the assignment history — all in one transaction.
pub fn reassign_bed(
    conn: &mut Connection,
    admission_id: &Uuid,
    new_reference: &BedReference,
    assigned_by: &Uuid,
) -> Result<Admission, WardError> {
    validate_reference(new_reference)?;

    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(crate::db::DatabaseError::from)?;

    let admission = repository::get_admission(&tx, admission_id)?
        .ok_or_else(|| WardError::AdmissionNotFound(admission_id.to_string()))?;
    if admission.status == AdmissionStatus::Discharged {
        return Err(WardError::AlreadyDischarged(admission.admission_code));
    }
    if admission.bed_reference == *new_reference {
        return Err(WardError::Validation("admission already occupies that bed".into()));
    }

    if let BedReference::Catalog { room_id, bed_id } = &admission.bed_reference {
        repository::set_bed_available(&tx, bed_id)?;
        repository::decrement_room_occupancy(&tx, room_id)?;
    }

    let (room_label, bed_label) = match new_reference {
        BedReference::Catalog { room_id, bed_id } => occupy_catalog_bed(
            &tx,
            room_id,
            bed_id,
            &admission.patient_id,
            &admission.patient_name,
        )?,
        BedReference::Manual { room_label, bed_label } => {
            tracing::warn!(
                room_label,
                bed_label,
                admission = %admission.admission_code,
                "Manual bed reassignment: no capacity check applies"
            );
            (room_label.clone(), bed_label.clone())
        }
    };

    repository::update_bed_reference(&tx, admission_id, new_reference)?;
    append_assignment(&tx, &admission.id, new_reference, &room_label, &bed_label, assigned_by)?;

    tx.commit().map_err(crate::db::DatabaseError::from)?;

    tracing::info!(
        admission = %admission.admission_code,
        room = %room_label,
        bed = %bed_label,
        "Bed reassigned"
    );
    repository::get_admission(conn, admission_id)?
        .ok_or_else(|| WardError::AdmissionNotFound(admission_id.to_string()))
}

/// Validate, occupy, and count a catalog bed. Returns the human-readable
/// room/bed labels for the assignment record.
fn occupy_catalog_bed(
    conn: &Connection,
    room_id: &Uuid,
    bed_id: &Uuid,
    patient_id: &Uuid,
    patient_name: &str,
) -> Result<(String, String), WardError> {
    let bed = repository::get_bed(conn, bed_id)?.ok_or(WardError::BedNotFound(*bed_id))?;
    if bed.room_id != *room_id {
        return Err(WardError::Validation(format!(
            "bed {bed_id} does not belong to room {room_id}"
        )));
    }
    if !bed.is_available() {
        return Err(WardError::BedUnavailable {
            bed_id: *bed_id,
            reason: format!(
                "occupied by {}",
                bed.patient_name.as_deref().unwrap_or("another patient")
            ),
        });
    }

    let room = repository::get_room(conn, room_id)?.ok_or(WardError::RoomNotFound(*room_id))?;
    if !room.has_free_capacity() {
        return Err(WardError::RoomAtCapacity { room_id: *room_id, capacity: room.capacity });
    }

    repository::set_bed_occupied(conn, bed_id, patient_id, patient_name)?;
    repository::increment_room_occupancy(conn, room_id)?;

    Ok((room.room_number, bed.bed_number))
}

fn append_assignment(
    conn: &Connection,
    admission_id: &Uuid,
    reference: &BedReference,
    room_label: &str,
    bed_label: &str,
    assigned_by: &Uuid,
) -> Result<(), WardError> {
    let (room_id, bed_id) = match reference {
        BedReference::Catalog { room_id, bed_id } => (Some(*room_id), Some(*bed_id)),
        BedReference::Manual { .. } => (None, None),
    };
    let record = BedAssignmentRecord {
        id: Uuid::new_v4(),
        admission_id: *admission_id,
        room_id,
        bed_id,
        room_label: room_label.to_string(),
        bed_label: bed_label.to_string(),
        assigned_by: *assigned_by,
        assigned_at: Utc::now(),
    };
    repository::insert_assignment(conn, &record)?;
    Ok(())
}

/// Manually correct a bed's catalog status, outside any admission.
///
/// A bed with an active admission cannot be released here; that path goes
/// through discharge so the admission, bed, and occupancy move together.
/// Flipping to Occupied is refused outright because an occupied bed without
/// an occupant reference would break the exclusivity invariant.
pub fn set_bed_status(
    conn: &mut Connection,
    room_id: &Uuid,
    bed_id: &Uuid,
    status: BedStatus,
) -> Result<Bed, WardError> {
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(crate::db::DatabaseError::from)?;

    let bed = repository::get_bed(&tx, bed_id)?.ok_or(WardError::BedNotFound(*bed_id))?;
    if bed.room_id != *room_id {
        return Err(WardError::Validation(format!(
            "bed {bed_id} does not belong to room {room_id}"
        )));
    }
    if bed.status == status {
        return Ok(bed);
    }
    if status == BedStatus::Occupied {
        return Err(WardError::Validation(
            "beds become occupied only through an admission".into(),
        ));
    }
    if repository::active_admission_for_bed(&tx, bed_id)?.is_some() {
        return Err(WardError::BedInUse(*bed_id));
    }

    repository::set_bed_available(&tx, bed_id)?;
    repository::decrement_room_occupancy(&tx, room_id)?;
    tx.commit().map_err(crate::db::DatabaseError::from)?;

    tracing::info!(bed = %bed_id, "Bed status corrected to available");
    repository::get_bed(conn, bed_id)?.ok_or(WardError::BedNotFound(*bed_id))
}

fn validate_reference(reference: &BedReference) -> Result<(), WardError> {
    if let BedReference::Manual { room_label, bed_label } = reference {
        if room_label.trim().is_empty() || bed_label.trim().is_empty() {
            return Err(WardError::Validation(
                "manual room and bed labels must not be empty".into(),
            ));
        }
    }
    Ok(())
}
