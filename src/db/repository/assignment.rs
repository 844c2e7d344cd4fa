use rusqlite::{params, Connection};
use uuid::Uuid;

use super::{parse_timestamp, parse_uuid};
use crate::db::DatabaseError;
use crate::models::BedAssignmentRecord;

pub fn insert_assignment(
    conn: &Connection,
    record: &BedAssignmentRecord,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO bed_assignments (id, admission_id, room_id, bed_id, room_label,
         bed_label, assigned_by, assigned_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            record.id.to_string(),
            record.admission_id.to_string(),
            record.room_id.map(|id| id.to_string()),
            record.bed_id.map(|id| id.to_string()),
            record.room_label,
            record.bed_label,
            record.assigned_by.to_string(),
            record.assigned_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

/// Full assignment history for an admission, oldest first — "who was in
/// which bed when".
pub fn get_assignments(
    conn: &Connection,
    admission_id: &Uuid,
) -> Result<Vec<BedAssignmentRecord>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, admission_id, room_id, bed_id, room_label, bed_label,
         assigned_by, assigned_at
         FROM bed_assignments WHERE admission_id = ?1 ORDER BY assigned_at, id",
    )?;

    let rows = stmt.query_map(params![admission_id.to_string()], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, Option<String>>(2)?,
            row.get::<_, Option<String>>(3)?,
            row.get::<_, String>(4)?,
            row.get::<_, String>(5)?,
            row.get::<_, String>(6)?,
            row.get::<_, String>(7)?,
        ))
    })?;

    let mut records = Vec::new();
    for row in rows {
        let (id, admission_id, room_id, bed_id, room_label, bed_label, assigned_by, assigned_at) =
            row?;
        records.push(BedAssignmentRecord {
            id: parse_uuid(&id)?,
            admission_id: parse_uuid(&admission_id)?,
            room_id: room_id.as_deref().map(parse_uuid).transpose()?,
            bed_id: bed_id.as_deref().map(parse_uuid).transpose()?,
            room_label,
            bed_label,
            assigned_by: parse_uuid(&assigned_by)?,
            assigned_at: parse_timestamp(&assigned_at)?,
        });
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    use crate::db::sqlite::open_memory_database;
    use crate::models::{Admission, AdmissionStatus, BedReference};

    fn seed_admission(conn: &Connection) -> Uuid {
        let id = Uuid::new_v4();
        let admission = Admission {
            id,
            admission_code: Admission::generate_code(&id),
            patient_id: Uuid::new_v4(),
            patient_name: "Grace Hopper".into(),
            doctor_id: Uuid::new_v4(),
            bed_reference: BedReference::Manual {
                room_label: "Annex".into(),
                bed_label: "A-1".into(),
            },
            status: AdmissionStatus::Admitted,
            notes: None,
            total_charges_cents: 0,
            admitted_at: Utc::now(),
            admitted_by: Uuid::new_v4(),
            discharged_at: None,
            discharged_by: None,
        };
        crate::db::repository::insert_admission(conn, &admission).unwrap();
        id
    }

    fn record(admission_id: Uuid, bed_label: &str, offset_secs: i64) -> BedAssignmentRecord {
        BedAssignmentRecord {
            id: Uuid::new_v4(),
            admission_id,
            room_id: None,
            bed_id: None,
            room_label: "Annex".into(),
            bed_label: bed_label.into(),
            assigned_by: Uuid::new_v4(),
            assigned_at: Utc::now() + Duration::seconds(offset_secs),
        }
    }

    #[test]
    fn history_ordered_oldest_first() {
        let conn = open_memory_database().unwrap();
        let admission_id = seed_admission(&conn);
        insert_assignment(&conn, &record(admission_id, "A-2", 10)).unwrap();
        insert_assignment(&conn, &record(admission_id, "A-1", 0)).unwrap();

        let history = get_assignments(&conn, &admission_id).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].bed_label, "A-1");
        assert_eq!(history[1].bed_label, "A-2");
    }

    #[test]
    fn history_isolated_per_admission() {
        let conn = open_memory_database().unwrap();
        let first = seed_admission(&conn);
        let second = seed_admission(&conn);
        insert_assignment(&conn, &record(first, "A-1", 0)).unwrap();

        assert_eq!(get_assignments(&conn, &first).unwrap().len(), 1);
        assert!(get_assignments(&conn, &second).unwrap().is_empty());
    }
}
