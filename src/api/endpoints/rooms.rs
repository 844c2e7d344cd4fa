//! Room and bed catalog endpoints.
//!
//! - `GET /api/rooms/:id/beds` — room snapshot with its beds
//! - `POST /api/rooms/:id/beds` — assign an active admission to a bed here
//! - `PUT /api/rooms/:id/beds` — release a bed (discharge) or correct status
//! - `GET /api/beds/available` — first free bed, optionally by room type

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::allocator;
use crate::catalog::{self, AvailableBed, RoomSnapshot};
use crate::db::repository;
use crate::discharge::{self, DischargeOutcome, DischargeSummary, SqliteSummarySink};
use crate::error::WardError;
use crate::models::{Admission, Bed, BedReference, BedStatus};
use crate::state::AppState;

/// `GET /api/rooms/:id/beds`
pub async fn snapshot(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomSnapshot>, ApiError> {
    let conn = state.open_db()?;
    let room_id = parse_room_id(&room_id)?;
    Ok(Json(catalog::room_snapshot(&conn, &room_id)?))
}

#[derive(Deserialize)]
pub struct AssignBedBody {
    pub admission_id: Uuid,
    pub bed_id: Uuid,
    pub assigned_by: Uuid,
}

/// `POST /api/rooms/:id/beds` — move an active admission into a bed of this
/// room, under the same availability and capacity checks as admit.
pub async fn assign_bed(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    Json(body): Json<AssignBedBody>,
) -> Result<Json<Admission>, ApiError> {
    let mut conn = state.open_db()?;
    let room_id = parse_room_id(&room_id)?;

    let reference = BedReference::Catalog { room_id, bed_id: body.bed_id };
    let admission =
        allocator::reassign_bed(&mut conn, &body.admission_id, &reference, &body.assigned_by)?;
    Ok(Json(admission))
}

/// Bed-level actions keyed on `action`, matching the two ways a bed leaves
/// the occupied state: its admission ends, or staff correct a stale record.
#[derive(Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum BedActionBody {
    Discharge {
        bed_id: Uuid,
        discharged_by: Uuid,
        diagnosis: String,
        treatment_summary: Option<String>,
        discharge_instructions: Option<String>,
        followup_date: Option<NaiveDate>,
    },
    UpdateStatus {
        bed_id: Uuid,
        status: BedStatus,
    },
}

#[derive(serde::Serialize)]
#[serde(untagged)]
pub enum BedActionResponse {
    Discharged(DischargeOutcome),
    StatusUpdated(Bed),
}

/// `PUT /api/rooms/:id/beds`
pub async fn bed_action(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    Json(body): Json<BedActionBody>,
) -> Result<Json<BedActionResponse>, ApiError> {
    let mut conn = state.open_db()?;
    let room_id = parse_room_id(&room_id)?;

    match body {
        BedActionBody::Discharge {
            bed_id,
            discharged_by,
            diagnosis,
            treatment_summary,
            discharge_instructions,
            followup_date,
        } => {
            let bed = repository::get_bed(&conn, &bed_id)
                .map_err(WardError::from)?
                .ok_or(WardError::BedNotFound(bed_id))
                .map_err(ApiError::from)?;
            if bed.room_id != room_id {
                return Err(ApiError::BadRequest(format!(
                    "bed {bed_id} does not belong to room {room_id}"
                )));
            }

            let admission = repository::active_admission_for_bed(&conn, &bed_id)
                .map_err(WardError::from)?
                .ok_or_else(|| {
                    ApiError::NotFound(format!("No active admission occupies bed {bed_id}"))
                })?;

            let summary = DischargeSummary {
                diagnosis,
                treatment_summary,
                discharge_instructions,
                followup_date,
            };
            let outcome = discharge::discharge(
                &mut conn,
                &SqliteSummarySink,
                &admission.id,
                &discharged_by,
                &summary,
            )?;
            Ok(Json(BedActionResponse::Discharged(outcome)))
        }
        BedActionBody::UpdateStatus { bed_id, status } => {
            let bed = allocator::set_bed_status(&mut conn, &room_id, &bed_id, status)?;
            Ok(Json(BedActionResponse::StatusUpdated(bed)))
        }
    }
}

#[derive(Deserialize)]
pub struct AvailableBedQuery {
    pub room_type: Option<String>,
}

/// `GET /api/beds/available` — 404 when nothing in the catalog is free.
pub async fn available_bed(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AvailableBedQuery>,
) -> Result<Json<AvailableBed>, ApiError> {
    let conn = state.open_db()?;
    let found = catalog::find_available_bed(&conn, query.room_type.as_deref())?;
    found
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("No available bed in the catalog".into()))
}

fn parse_room_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|e| ApiError::BadRequest(format!("Invalid room ID: {e}")))
}
