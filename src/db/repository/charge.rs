use std::str::FromStr;

use chrono::NaiveDate;
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::{parse_timestamp, parse_uuid};
use crate::db::DatabaseError;
use crate::models::{ChargeCategory, ChargeLineItem};

pub fn insert_charge(conn: &Connection, item: &ChargeLineItem) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO admission_charges (id, admission_id, category, description, amount_cents,
         quantity, charge_date, created_by, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            item.id.to_string(),
            item.admission_id.to_string(),
            item.category.as_str(),
            item.description,
            item.amount_cents,
            item.quantity,
            item.charge_date.to_string(),
            item.created_by.to_string(),
            item.created_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

pub fn get_charges(
    conn: &Connection,
    admission_id: &Uuid,
) -> Result<Vec<ChargeLineItem>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, admission_id, category, description, amount_cents, quantity,
         charge_date, created_by, created_at
         FROM admission_charges WHERE admission_id = ?1 ORDER BY created_at, id",
    )?;

    let rows = stmt.query_map(params![admission_id.to_string()], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, i64>(4)?,
            row.get::<_, i64>(5)?,
            row.get::<_, String>(6)?,
            row.get::<_, String>(7)?,
            row.get::<_, String>(8)?,
        ))
    })?;

    let mut items = Vec::new();
    for row in rows {
        let (id, admission_id, category, description, amount_cents, quantity, charge_date, created_by, created_at) =
            row?;
        items.push(ChargeLineItem {
            id: parse_uuid(&id)?,
            admission_id: parse_uuid(&admission_id)?,
            category: ChargeCategory::from_str(&category)?,
            description,
            amount_cents,
            quantity,
            charge_date: NaiveDate::parse_from_str(&charge_date, "%Y-%m-%d")
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
            created_by: parse_uuid(&created_by)?,
            created_at: parse_timestamp(&created_at)?,
        });
    }
    Ok(items)
}

/// Sum of `amount × quantity` over the ledger. The reconciliation tests
/// compare this against the admission's denormalized total.
pub fn ledger_total_cents(conn: &Connection, admission_id: &Uuid) -> Result<i64, DatabaseError> {
    let total = conn.query_row(
        "SELECT COALESCE(SUM(amount_cents * quantity), 0)
         FROM admission_charges WHERE admission_id = ?1",
        params![admission_id.to_string()],
        |row| row.get::<_, i64>(0),
    )?;
    Ok(total)
}
