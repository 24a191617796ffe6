mod support;

use anyhow::Result;
use axum::http::StatusCode;
use common_auth::Role;
use serde_json::json;
use support::TestApp;

/// Two doctors (ids 1, 2) and three patients (ids 1, 2, 3).
async fn seeded() -> Result<(TestApp, Vec<String>)> {
    let app = TestApp::spawn().await?;
    app.add_doctor("Dr. House", "Diagnostics").await?;
    app.add_doctor("Dr. Grey", "Surgery").await?;
    let mut tokens = Vec::new();
    for name in ["Alice", "Bob", "Carol"] {
        let (_, token) = app.register(name, "secret-pw").await?;
        tokens.push(token);
    }
    Ok((app, tokens))
}

#[tokio::test]
async fn appointment_visibility_follows_ownership() -> Result<()> {
    let (app, patients) = seeded().await?;
    let alice = &patients[0];

    let booked = app.book(alice, 1, 2).await?;
    assert_eq!(booked.status, StatusCode::OK);
    let appointment_id = booked.body["id"].as_i64().expect("id");

    let mine = app.get("/appointments", Some(alice)).await?;
    assert_eq!(mine.status, StatusCode::OK);
    let rows = mine.body.as_array().expect("array");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], appointment_id);
    assert_eq!(rows[0]["patient_id"], 1);
    assert_eq!(rows[0]["doctor_id"], 2);

    let doctor = app.token(2, Role::Doctor);
    let theirs = app.get("/appointments", Some(&doctor)).await?;
    assert_eq!(theirs.body.as_array().expect("array").len(), 1);

    let other_doctor = app.token(1, Role::Doctor);
    let none = app.get("/appointments", Some(&other_doctor)).await?;
    assert_eq!(none.body, json!([]));

    let carol = &patients[2];
    let empty = app.get("/appointments", Some(carol)).await?;
    assert_eq!(empty.status, StatusCode::OK);
    assert_eq!(empty.body, json!([]));

    let staff = app.staff_token();
    let all = app.get("/appointments", Some(&staff)).await?;
    assert_eq!(all.body.as_array().expect("array").len(), 1);
    Ok(())
}

#[tokio::test]
async fn patient_cannot_book_for_someone_else() -> Result<()> {
    let (app, patients) = seeded().await?;
    let resp = app.book(&patients[0], 2, 1).await?;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);

    let doctor = app.token(1, Role::Doctor);
    let resp = app.book(&doctor, 1, 1).await?;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);

    let staff = app.staff_token();
    let resp = app.book(&staff, 2, 1).await?;
    assert_eq!(resp.status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn booking_with_an_unknown_doctor_is_a_bad_request() -> Result<()> {
    let (app, patients) = seeded().await?;
    let resp = app.book(&patients[0], 1, 77).await?;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error_code.as_deref(), Some("constraint_violation"));
    Ok(())
}

#[tokio::test]
async fn appointment_by_id_is_guarded_by_ownership() -> Result<()> {
    let (app, patients) = seeded().await?;
    let booked = app.book(&patients[0], 1, 2).await?;
    let uri = format!("/appointments/{}", booked.body["id"]);

    let resp = app.get(&uri, Some(&patients[0])).await?;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["status"], "scheduled");

    let resp = app.get(&uri, Some(&app.token(2, Role::Doctor))).await?;
    assert_eq!(resp.status, StatusCode::OK);

    let resp = app.get(&uri, Some(&patients[1])).await?;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);

    let resp = app.get(&uri, Some(&app.token(1, Role::Doctor))).await?;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);

    let resp = app.get("/appointments/999", Some(&patients[0])).await?;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.error_code.as_deref(), Some("appointment_not_found"));

    let resp = app.get(&uri, None).await?;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn only_staff_change_or_cancel_appointments() -> Result<()> {
    let (app, patients) = seeded().await?;
    let booked = app.book(&patients[0], 1, 2).await?;
    let uri = format!("/appointments/{}", booked.body["id"]);
    let moved = json!({
        "patient_id": 1,
        "doctor_id": 1,
        "appointment_time": "2024-05-02T14:00:00",
        "status": "rescheduled",
    });

    let resp = app.put(&uri, Some(&patients[0]), moved.clone()).await?;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);
    let resp = app.delete(&uri, Some(&patients[0])).await?;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);

    let staff = app.staff_token();
    let resp = app.put(&uri, Some(&staff), moved).await?;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["doctor_id"], 1);
    assert_eq!(resp.body["status"], "rescheduled");

    let resp = app.delete(&uri, Some(&staff)).await?;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["detail"], "Appointment deleted");

    let resp = app.get(&uri, Some(&staff)).await?;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn denials_are_counted_in_metrics() -> Result<()> {
    let (app, patients) = seeded().await?;
    let resp = app.get("/patients", Some(&patients[0])).await?;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);

    let metrics = app.get("/metrics", None).await?;
    assert_eq!(metrics.status, StatusCode::OK);
    let text = metrics.body.as_str().expect("text exposition");
    assert_eq!(
        sample(text, "clinic_access_denied_total", &["resource=\"patient\"", "action=\"list\""]),
        Some(1.0)
    );
    assert_eq!(
        sample(text, "http_errors_total", &["code=\"forbidden\"", "status=\"403\""]),
        Some(1.0)
    );
    assert_eq!(
        sample(text, "clinic_tokens_issued_total", &["role=\"patient\""]),
        Some(3.0)
    );
    Ok(())
}

fn sample(text: &str, name: &str, labels: &[&str]) -> Option<f64> {
    text.lines()
        .filter(|line| line.starts_with(&format!("{name}{{")))
        .find(|line| labels.iter().all(|label| line.contains(label)))
        .and_then(|line| line.rsplit(' ').next())
        .and_then(|value| value.parse().ok())
}
