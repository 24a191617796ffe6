use common_security::Ownership;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteConnection};

use super::StoreResult;

pub const RESOURCE: &str = "prescription";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Prescription {
    pub id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub medications: String,
    pub date_issued: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewPrescription {
    pub patient_id: i64,
    pub doctor_id: i64,
    pub medications: String,
    pub date_issued: String,
}

impl NewPrescription {
    pub fn ownership(&self) -> Ownership {
        Ownership::both(self.patient_id, self.doctor_id)
    }
}

pub async fn create(conn: &mut SqliteConnection, prescription: &NewPrescription) -> StoreResult<i64> {
    let result = sqlx::query(
        "INSERT INTO prescriptions (patient_id, doctor_id, medications, date_issued) VALUES (?, ?, ?, ?)",
    )
    .bind(prescription.patient_id)
    .bind(prescription.doctor_id)
    .bind(&prescription.medications)
    .bind(&prescription.date_issued)
    .execute(conn)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn list(
    conn: &mut SqliteConnection,
    scope: Option<Ownership>,
) -> StoreResult<Vec<Prescription>> {
    let scope = scope.unwrap_or_default();
    let rows = sqlx::query_as::<_, Prescription>(
        "SELECT id, patient_id, doctor_id, medications, date_issued FROM prescriptions
         WHERE (?1 IS NULL OR patient_id = ?1) AND (?2 IS NULL OR doctor_id = ?2)
         ORDER BY id",
    )
    .bind(scope.patient_id)
    .bind(scope.doctor_id)
    .fetch_all(conn)
    .await?;
    Ok(rows)
}
