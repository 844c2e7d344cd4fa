//! Charge ledger: append-only billable line items per admission, with the
//! admission's denormalized running total updated in the same transaction.
//!
//! Nothing here ever reduces or deletes a charge; corrections are new
//! offsetting entries so the audit trail stays complete.

use chrono::{NaiveDate, Utc};
use rusqlite::{Connection, TransactionBehavior};
use serde::Deserialize;
use uuid::Uuid;

use crate::db::repository;
use crate::error::WardError;
use crate::models::{AdmissionStatus, ChargeCategory, ChargeLineItem};

#[derive(Debug, Clone, Deserialize)]
pub struct ChargeRequest {
    pub category: ChargeCategory,
    pub description: String,
    pub amount_cents: i64,
    pub quantity: i64,
    pub charge_date: NaiveDate,
    pub created_by: Uuid,
}

/// Append one line item and bump the admission's total, atomically.
///
/// Appends to a discharged admission are allowed (late billing arrives
/// after the patient leaves) but logged, since the ledger is conceptually
/// sealed at discharge.
pub fn append_charge(
    conn: &mut Connection,
    admission_id: &Uuid,
    request: &ChargeRequest,
) -> Result<ChargeLineItem, WardError> {
    if request.description.trim().is_empty() {
        return Err(WardError::Validation("description must not be empty".into()));
    }
    if request.quantity < 1 {
        return Err(WardError::Validation("quantity must be at least 1".into()));
    }
    let line_total = request.amount_cents.checked_mul(request.quantity).ok_or_else(|| {
        WardError::Validation("amount_cents times quantity overflows the ledger".into())
    })?;

    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(crate::db::DatabaseError::from)?;

    let admission = repository::get_admission(&tx, admission_id)?
        .ok_or_else(|| WardError::AdmissionNotFound(admission_id.to_string()))?;
    if admission.status == AdmissionStatus::Discharged {
        tracing::warn!(
            admission = %admission.admission_code,
            "Charge appended to a discharged admission"
        );
    }

    let item = ChargeLineItem {
        id: Uuid::new_v4(),
        admission_id: *admission_id,
        category: request.category,
        description: request.description.clone(),
        amount_cents: request.amount_cents,
        quantity: request.quantity,
        charge_date: request.charge_date,
        created_by: request.created_by,
        created_at: Utc::now(),
    };
    repository::insert_charge(&tx, &item)?;
    repository::add_to_total_charges(&tx, admission_id, line_total)?;

    tx.commit().map_err(crate::db::DatabaseError::from)?;

    tracing::debug!(
        admission = %admission.admission_code,
        category = item.category.as_str(),
        total_cents = line_total,
        "Charge appended"
    );
    Ok(item)
}

/// The full ledger for an admission, oldest entry first.
pub fn ledger(conn: &Connection, admission_id: &Uuid) -> Result<Vec<ChargeLineItem>, WardError> {
    Ok(repository::get_charges(conn, admission_id)?)
}

/// Ledger sum, for reconciliation against the denormalized total.
pub fn ledger_total(conn: &Connection, admission_id: &Uuid) -> Result<i64, WardError> {
    Ok(repository::ledger_total_cents(conn, admission_id)?)
}
