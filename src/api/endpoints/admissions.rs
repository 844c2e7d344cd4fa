//! Admission endpoints.
//!
//! - `POST /api/admissions` — admit a patient
//! - `GET /api/admissions/:id` — admission detail (ledger + bed history)
//! - `POST /api/admissions/:id/charges` — append a charge line item
//! - `POST /api/admissions/:id/discharge` — discharge the patient

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::allocator::{self, AdmitRequest};
use crate::charges::{self, ChargeRequest};
use crate::db::repository;
use crate::discharge::{self, DischargeOutcome, DischargeSummary, SqliteSummarySink};
use crate::error::WardError;
use crate::models::{Admission, BedAssignmentRecord, ChargeLineItem};
use crate::state::AppState;

/// `POST /api/admissions`
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AdmitRequest>,
) -> Result<(StatusCode, Json<Admission>), ApiError> {
    let mut conn = state.open_db()?;
    let admission = allocator::admit(&mut conn, &request)?;
    Ok((StatusCode::CREATED, Json(admission)))
}

#[derive(Serialize)]
pub struct AdmissionDetailResponse {
    pub admission: Admission,
    pub charges: Vec<ChargeLineItem>,
    pub bed_history: Vec<BedAssignmentRecord>,
    pub ledger_total_cents: i64,
}

/// `GET /api/admissions/:id` — accepts the surrogate UUID or the
/// human-readable admission code (`ADM-XXXXXXXX`).
pub async fn detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<AdmissionDetailResponse>, ApiError> {
    let conn = state.open_db()?;
    let admission = resolve_admission(&conn, &id)?;

    let charges = charges::ledger(&conn, &admission.id)?;
    let bed_history = repository::get_assignments(&conn, &admission.id)
        .map_err(WardError::from)?;
    let ledger_total_cents = charges::ledger_total(&conn, &admission.id)?;

    Ok(Json(AdmissionDetailResponse { admission, charges, bed_history, ledger_total_cents }))
}

/// `POST /api/admissions/:id/charges`
pub async fn append_charge(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<ChargeRequest>,
) -> Result<(StatusCode, Json<ChargeLineItem>), ApiError> {
    let mut conn = state.open_db()?;
    let admission = resolve_admission(&conn, &id)?;
    let item = charges::append_charge(&mut conn, &admission.id, &request)?;
    Ok((StatusCode::CREATED, Json(item)))
}

#[derive(Deserialize)]
pub struct DischargeBody {
    pub discharged_by: Uuid,
    pub diagnosis: String,
    pub treatment_summary: Option<String>,
    pub discharge_instructions: Option<String>,
    pub followup_date: Option<NaiveDate>,
}

/// `POST /api/admissions/:id/discharge`
pub async fn discharge(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<DischargeBody>,
) -> Result<Json<DischargeOutcome>, ApiError> {
    let mut conn = state.open_db()?;
    let admission = resolve_admission(&conn, &id)?;

    let summary = DischargeSummary {
        diagnosis: body.diagnosis,
        treatment_summary: body.treatment_summary,
        discharge_instructions: body.discharge_instructions,
        followup_date: body.followup_date,
    };
    let outcome = discharge::discharge(
        &mut conn,
        &SqliteSummarySink,
        &admission.id,
        &body.discharged_by,
        &summary,
    )?;
    Ok(Json(outcome))
}

/// Look up an admission by UUID first, then by admission code.
fn resolve_admission(conn: &Connection, id: &str) -> Result<Admission, ApiError> {
    let found = match Uuid::parse_str(id) {
        Ok(uuid) => repository::get_admission(conn, &uuid).map_err(WardError::from)?,
        Err(_) => repository::get_admission_by_code(conn, id).map_err(WardError::from)?,
    };
    found.ok_or_else(|| ApiError::NotFound(format!("Admission not found: {id}")))
}
