use common_security::Ownership;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteConnection};

use super::{affected, found, StoreResult};

pub const RESOURCE: &str = "appointment";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Appointment {
    pub id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub appointment_time: String,
    pub status: String,
}

impl Appointment {
    pub fn ownership(&self) -> Ownership {
        Ownership::both(self.patient_id, self.doctor_id)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppointmentDetails {
    pub patient_id: i64,
    pub doctor_id: i64,
    pub appointment_time: String,
    pub status: String,
}

impl AppointmentDetails {
    pub fn ownership(&self) -> Ownership {
        Ownership::both(self.patient_id, self.doctor_id)
    }
}

pub async fn create(conn: &mut SqliteConnection, details: &AppointmentDetails) -> StoreResult<i64> {
    let result = sqlx::query(
        "INSERT INTO appointments (patient_id, doctor_id, appointment_time, status) VALUES (?, ?, ?, ?)",
    )
    .bind(details.patient_id)
    .bind(details.doctor_id)
    .bind(&details.appointment_time)
    .bind(&details.status)
    .execute(conn)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn get(conn: &mut SqliteConnection, id: i64) -> StoreResult<Appointment> {
    let row = sqlx::query_as::<_, Appointment>(
        "SELECT id, patient_id, doctor_id, appointment_time, status FROM appointments WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;
    found(row, RESOURCE)
}

/// Lists appointments, restricted to `scope` when given.
pub async fn list(
    conn: &mut SqliteConnection,
    scope: Option<Ownership>,
) -> StoreResult<Vec<Appointment>> {
    let scope = scope.unwrap_or_default();
    let rows = sqlx::query_as::<_, Appointment>(
        "SELECT id, patient_id, doctor_id, appointment_time, status FROM appointments
         WHERE (?1 IS NULL OR patient_id = ?1) AND (?2 IS NULL OR doctor_id = ?2)
         ORDER BY id",
    )
    .bind(scope.patient_id)
    .bind(scope.doctor_id)
    .fetch_all(conn)
    .await?;
    Ok(rows)
}

pub async fn update(
    conn: &mut SqliteConnection,
    id: i64,
    details: &AppointmentDetails,
) -> StoreResult<Appointment> {
    let row = sqlx::query_as::<_, Appointment>(
        "UPDATE appointments SET patient_id = ?, doctor_id = ?, appointment_time = ?, status = ? WHERE id = ?
         RETURNING id, patient_id, doctor_id, appointment_time, status",
    )
    .bind(details.patient_id)
    .bind(details.doctor_id)
    .bind(&details.appointment_time)
    .bind(&details.status)
    .bind(id)
    .fetch_optional(conn)
    .await?;
    found(row, RESOURCE)
}

pub async fn delete(conn: &mut SqliteConnection, id: i64) -> StoreResult<()> {
    let result = sqlx::query("DELETE FROM appointments WHERE id = ?")
        .bind(id)
        .execute(conn)
        .await?;
    affected(result.rows_affected(), RESOURCE)
}
