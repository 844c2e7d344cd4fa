//! Discharge processor: closes out an admission in one transaction —
//! summary persisted, status flipped, catalog bed released, occupancy
//! decremented. A second discharge of the same admission is rejected
//! before any write happens.

use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, Transaction, TransactionBehavior};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::{repository, DatabaseError};
use crate::error::WardError;
use crate::models::{Admission, AdmissionStatus, BedReference};

/// Clinical free-text payload. Owned by the clinical-documentation side;
/// this subsystem only stores it and never interprets it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DischargeSummary {
    pub diagnosis: String,
    pub treatment_summary: Option<String>,
    pub discharge_instructions: Option<String>,
    pub followup_date: Option<NaiveDate>,
}

/// Storage seam for the discharge summary. The default sink writes into the
/// same transaction so the whole discharge commits or rolls back together;
/// tests inject a failing sink to prove nothing leaks on failure.
pub trait SummarySink {
    fn store(
        &self,
        tx: &Transaction<'_>,
        admission_id: &Uuid,
        summary: &DischargeSummary,
    ) -> Result<Uuid, DatabaseError>;
}

/// Default sink: `discharge_summaries` table, one row per admission.
pub struct SqliteSummarySink;

impl SummarySink for SqliteSummarySink {
    fn store(
        &self,
        tx: &Transaction<'_>,
        admission_id: &Uuid,
        summary: &DischargeSummary,
    ) -> Result<Uuid, DatabaseError> {
        let id = Uuid::new_v4();
        tx.execute(
            "INSERT INTO discharge_summaries (id, admission_id, diagnosis, treatment_summary,
             discharge_instructions, followup_date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                id.to_string(),
                admission_id.to_string(),
                summary.diagnosis,
                summary.treatment_summary,
                summary.discharge_instructions,
                summary.followup_date.map(|d| d.to_string()),
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(id)
    }
}

/// What the discharge transaction produced.
#[derive(Debug, Clone, Serialize)]
pub struct DischargeOutcome {
    pub summary_id: Uuid,
    pub admission: Admission,
}

/// Discharge an admission.
///
/// `Admitted → Discharged` is the only legal transition and it is terminal:
/// a repeat call returns `AlreadyDischarged` and changes nothing, so the
/// bed release and occupancy decrement can never happen twice.
pub fn discharge(
    conn: &mut Connection,
    sink: &dyn SummarySink,
    admission_id: &Uuid,
    discharged_by: &Uuid,
    summary: &DischargeSummary,
) -> Result<DischargeOutcome, WardError> {
    if summary.diagnosis.trim().is_empty() {
        return Err(WardError::Validation("diagnosis must not be empty".into()));
    }

    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(DatabaseError::from)?;

    let admission = repository::get_admission(&tx, admission_id)?
        .ok_or_else(|| WardError::AdmissionNotFound(admission_id.to_string()))?;
    if admission.status == AdmissionStatus::Discharged {
        return Err(WardError::AlreadyDischarged(admission.admission_code));
    }

    let summary_id = sink.store(&tx, admission_id, summary)?;
    repository::mark_discharged(&tx, admission_id, Utc::now(), discharged_by)?;

    if let BedReference::Catalog { room_id, bed_id } = &admission.bed_reference {
        repository::set_bed_available(&tx, bed_id)?;
        repository::decrement_room_occupancy(&tx, room_id)?;
    }

    tx.commit().map_err(DatabaseError::from)?;

    let admission = repository::get_admission(conn, admission_id)?
        .ok_or_else(|| WardError::AdmissionNotFound(admission_id.to_string()))?;

    tracing::info!(
        admission = %admission.admission_code,
        summary = %summary_id,
        "Patient discharged"
    );
    Ok(DischargeOutcome { summary_id, admission })
}
