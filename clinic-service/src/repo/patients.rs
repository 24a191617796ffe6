use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteConnection};

use super::{affected, found, StoreResult};

pub const RESOURCE: &str = "patient";

/// Patient as returned to callers. The password digest is deliberately absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Patient {
    pub id: i64,
    pub name: String,
    pub date_of_birth: String,
    pub phone: String,
    pub address: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PatientDetails {
    pub name: String,
    pub date_of_birth: String,
    pub phone: String,
    pub address: String,
}

#[derive(FromRow)]
pub struct PatientCredentials {
    pub id: i64,
    pub password_digest: String,
}

pub async fn create(
    conn: &mut SqliteConnection,
    details: &PatientDetails,
    password_digest: &str,
) -> StoreResult<i64> {
    let result = sqlx::query(
        "INSERT INTO patients (name, date_of_birth, phone, address, password_digest) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&details.name)
    .bind(&details.date_of_birth)
    .bind(&details.phone)
    .bind(&details.address)
    .bind(password_digest)
    .execute(conn)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn get(conn: &mut SqliteConnection, id: i64) -> StoreResult<Patient> {
    let row = sqlx::query_as::<_, Patient>(
        "SELECT id, name, date_of_birth, phone, address FROM patients WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;
    found(row, RESOURCE)
}

pub async fn list(conn: &mut SqliteConnection) -> StoreResult<Vec<Patient>> {
    let rows = sqlx::query_as::<_, Patient>(
        "SELECT id, name, date_of_birth, phone, address FROM patients ORDER BY id",
    )
    .fetch_all(conn)
    .await?;
    Ok(rows)
}

pub async fn update(
    conn: &mut SqliteConnection,
    id: i64,
    details: &PatientDetails,
) -> StoreResult<Patient> {
    let row = sqlx::query_as::<_, Patient>(
        "UPDATE patients SET name = ?, date_of_birth = ?, phone = ?, address = ? WHERE id = ?
         RETURNING id, name, date_of_birth, phone, address",
    )
    .bind(&details.name)
    .bind(&details.date_of_birth)
    .bind(&details.phone)
    .bind(&details.address)
    .bind(id)
    .fetch_optional(conn)
    .await?;
    found(row, RESOURCE)
}

pub async fn delete(conn: &mut SqliteConnection, id: i64) -> StoreResult<()> {
    let result = sqlx::query("DELETE FROM patients WHERE id = ?")
        .bind(id)
        .execute(conn)
        .await?;
    affected(result.rows_affected(), RESOURCE)
}

pub async fn credentials(conn: &mut SqliteConnection, id: i64) -> StoreResult<PatientCredentials> {
    let row = sqlx::query_as::<_, PatientCredentials>(
        "SELECT id, password_digest FROM patients WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;
    found(row, RESOURCE)
}
