use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{AdmissionStatus, ChargeCategory};
use crate::db::DatabaseError;

/// Where a patient is placed: either a catalog room/bed pair subject to the
/// capacity invariant, or a free-text manual label for beds outside the
/// catalog (no capacity check — an explicit, visible waiver).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BedReference {
    Catalog { room_id: Uuid, bed_id: Uuid },
    Manual { room_label: String, bed_label: String },
}

impl BedReference {
    pub fn is_catalog(&self) -> bool {
        matches!(self, Self::Catalog { .. })
    }

    /// Reassemble from the two nullable column pairs on `admissions`.
    /// Rows populating neither or both sides are corrupt.
    pub fn from_columns(
        room_id: Option<Uuid>,
        bed_id: Option<Uuid>,
        manual_room: Option<String>,
        manual_bed: Option<String>,
    ) -> Result<Self, DatabaseError> {
        match (room_id, bed_id, manual_room, manual_bed) {
            (Some(room_id), Some(bed_id), None, None) => Ok(Self::Catalog { room_id, bed_id }),
            (None, None, Some(room_label), Some(bed_label)) => {
                Ok(Self::Manual { room_label, bed_label })
            }
            _ => Err(DatabaseError::ConstraintViolation(
                "admission bed reference must be exactly one of catalog or manual".into(),
            )),
        }
    }
}

/// One continuous inpatient stay, admit to discharge. The aggregate root for
/// the charge ledger and the bed-assignment history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Admission {
    pub id: Uuid,
    pub admission_code: String,
    pub patient_id: Uuid,
    pub patient_name: String,
    pub doctor_id: Uuid,
    pub bed_reference: BedReference,
    pub status: AdmissionStatus,
    pub notes: Option<String>,
    pub total_charges_cents: i64,
    pub admitted_at: DateTime<Utc>,
    pub admitted_by: Uuid,
    pub discharged_at: Option<DateTime<Utc>>,
    pub discharged_by: Option<Uuid>,
}

impl Admission {
    /// Human-readable code handed to reception staff, e.g. `ADM-4F2A9C01`.
    pub fn generate_code(id: &Uuid) -> String {
        let hex = id.simple().to_string();
        format!("ADM-{}", hex[..8].to_uppercase())
    }
}

/// A billable line item. Written once, never mutated; corrections are new
/// offsetting entries with a negative amount.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeLineItem {
    pub id: Uuid,
    pub admission_id: Uuid,
    pub category: ChargeCategory,
    pub description: String,
    pub amount_cents: i64,
    pub quantity: i64,
    pub charge_date: NaiveDate,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl ChargeLineItem {
    /// `None` when `amount × quantity` overflows; the append operation
    /// rejects such requests before anything is written.
    pub fn line_total_cents(&self) -> Option<i64> {
        self.amount_cents.checked_mul(self.quantity)
    }
}

/// Audit record of a bed (re)assignment. `room_id`/`bed_id` are present for
/// catalog placements; the labels are always filled so the history reads
/// without catalog joins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BedAssignmentRecord {
    pub id: Uuid,
    pub admission_id: Uuid,
    pub room_id: Option<Uuid>,
    pub bed_id: Option<Uuid>,
    pub room_label: String,
    pub bed_label: String,
    pub assigned_by: Uuid,
    pub assigned_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bed_reference_catalog_from_columns() {
        let room = Uuid::new_v4();
        let bed = Uuid::new_v4();
        let reference = BedReference::from_columns(Some(room), Some(bed), None, None).unwrap();
        assert_eq!(reference, BedReference::Catalog { room_id: room, bed_id: bed });
        assert!(reference.is_catalog());
    }

    #[test]
    fn bed_reference_manual_from_columns() {
        let reference =
            BedReference::from_columns(None, None, Some("East Annex".into()), Some("E-3".into()))
                .unwrap();
        assert_eq!(
            reference,
            BedReference::Manual { room_label: "East Annex".into(), bed_label: "E-3".into() }
        );
        assert!(!reference.is_catalog());
    }

    #[test]
    fn bed_reference_rejects_empty_row() {
        assert!(BedReference::from_columns(None, None, None, None).is_err());
    }

    #[test]
    fn bed_reference_rejects_both_sides() {
        let result = BedReference::from_columns(
            Some(Uuid::new_v4()),
            Some(Uuid::new_v4()),
            Some("Annex".into()),
            Some("A-1".into()),
        );
        assert!(result.is_err());
    }

    #[test]
    fn admission_code_shape() {
        let id = Uuid::new_v4();
        let code = Admission::generate_code(&id);
        assert!(code.starts_with("ADM-"));
        assert_eq!(code.len(), 12);
        assert!(code[4..].chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn line_total_multiplies_quantity() {
        let item = ChargeLineItem {
            id: Uuid::new_v4(),
            admission_id: Uuid::new_v4(),
            category: ChargeCategory::RoomRent,
            description: "Room rent".into(),
            amount_cents: 50_000,
            quantity: 2,
            charge_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
        };
        assert_eq!(item.line_total_cents(), Some(100_000));
    }

    #[test]
    fn line_total_overflow_is_none() {
        let item = ChargeLineItem {
            id: Uuid::new_v4(),
            admission_id: Uuid::new_v4(),
            category: ChargeCategory::Other,
            description: "Bad actor".into(),
            amount_cents: i64::MAX,
            quantity: 2,
            charge_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
        };
        assert_eq!(item.line_total_cents(), None);
    }

    #[test]
    fn negative_amount_offsets() {
        let item = ChargeLineItem {
            id: Uuid::new_v4(),
            admission_id: Uuid::new_v4(),
            category: ChargeCategory::Other,
            description: "Correction: duplicate room rent".into(),
            amount_cents: -50_000,
            quantity: 1,
            charge_date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
        };
        assert_eq!(item.line_total_cents(), Some(-50_000));
    }
}
