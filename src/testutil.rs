//! Shared fixtures for unit tests: seeded rooms/beds and canned requests.

use rusqlite::Connection;
use uuid::Uuid;

use crate::db::repository::{insert_bed, insert_room};
use crate::models::{Bed, BedReference, BedStatus, Room};

pub fn seed_room_with_capacity(conn: &Connection, capacity: i64) -> Room {
    let id = Uuid::new_v4();
    let room = Room {
        id,
        room_number: format!("R-{}", &id.simple().to_string()[..6]),
        floor: Some("2".into()),
        room_type: "general".into(),
        capacity,
        current_occupancy: 0,
    };
    insert_room(conn, &room).unwrap();
    room
}

pub fn seed_bed_in_room(conn: &Connection, room_id: &Uuid, number: &str) -> Bed {
    let bed = Bed {
        id: Uuid::new_v4(),
        room_id: *room_id,
        bed_number: number.into(),
        status: BedStatus::Available,
        patient_id: None,
        patient_name: None,
        occupied_since: None,
    };
    insert_bed(conn, &bed).unwrap();
    bed
}

/// One room of the given capacity with a single bed; the most common fixture.
pub fn seed_single_bed_room(conn: &Connection, capacity: i64) -> (Room, Bed) {
    let room = seed_room_with_capacity(conn, capacity);
    let bed = seed_bed_in_room(conn, &room.id, "A");
    (room, bed)
}

pub fn catalog_reference(room: &Room, bed: &Bed) -> BedReference {
    BedReference::Catalog { room_id: room.id, bed_id: bed.id }
}

pub fn admit_request(room: &Room, bed: &Bed) -> crate::allocator::AdmitRequest {
    crate::allocator::AdmitRequest {
        patient_id: Uuid::new_v4(),
        patient_name: "Grace Hopper".into(),
        doctor_id: Uuid::new_v4(),
        bed_reference: catalog_reference(room, bed),
        notes: None,
        admitted_by: Uuid::new_v4(),
    }
}
