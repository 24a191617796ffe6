use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteConnection};

use super::StoreResult;

pub const RESOURCE: &str = "staff";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Staff {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewStaff {
    pub name: String,
}

pub async fn create(conn: &mut SqliteConnection, staff: &NewStaff) -> StoreResult<i64> {
    let result = sqlx::query("INSERT INTO staff (name) VALUES (?)")
        .bind(&staff.name)
        .execute(conn)
        .await?;
    Ok(result.last_insert_rowid())
}

pub async fn list(conn: &mut SqliteConnection) -> StoreResult<Vec<Staff>> {
    let rows = sqlx::query_as::<_, Staff>("SELECT id, name FROM staff ORDER BY id")
        .fetch_all(conn)
        .await?;
    Ok(rows)
}
