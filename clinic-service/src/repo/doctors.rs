use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteConnection};

use super::{found, StoreResult};

pub const RESOURCE: &str = "doctor";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Doctor {
    pub id: i64,
    pub name: String,
    pub specialty: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewDoctor {
    pub name: String,
    pub specialty: String,
}

pub async fn create(conn: &mut SqliteConnection, doctor: &NewDoctor) -> StoreResult<i64> {
    let result = sqlx::query("INSERT INTO doctors (name, specialty) VALUES (?, ?)")
        .bind(&doctor.name)
        .bind(&doctor.specialty)
        .execute(conn)
        .await?;
    Ok(result.last_insert_rowid())
}

pub async fn get(conn: &mut SqliteConnection, id: i64) -> StoreResult<Doctor> {
    let row = sqlx::query_as::<_, Doctor>("SELECT id, name, specialty FROM doctors WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await?;
    found(row, RESOURCE)
}

pub async fn list(conn: &mut SqliteConnection) -> StoreResult<Vec<Doctor>> {
    let rows = sqlx::query_as::<_, Doctor>("SELECT id, name, specialty FROM doctors ORDER BY id")
        .fetch_all(conn)
        .await?;
    Ok(rows)
}
