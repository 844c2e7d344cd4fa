use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::BedStatus;

/// A physical room in the ward catalog.
///
/// `current_occupancy` is never written directly by callers; it moves only
/// inside the admit/discharge/reassign transactions, together with the bed
/// status flip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: Uuid,
    pub room_number: String,
    pub floor: Option<String>,
    pub room_type: String,
    pub capacity: i64,
    pub current_occupancy: i64,
}

impl Room {
    pub fn has_free_capacity(&self) -> bool {
        self.current_occupancy < self.capacity
    }
}

/// A bed within a room. Occupied iff it carries exactly one occupant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bed {
    pub id: Uuid,
    pub room_id: Uuid,
    pub bed_number: String,
    pub status: BedStatus,
    pub patient_id: Option<Uuid>,
    pub patient_name: Option<String>,
    pub occupied_since: Option<DateTime<Utc>>,
}

impl Bed {
    pub fn is_available(&self) -> bool {
        self.status == BedStatus::Available
    }
}
