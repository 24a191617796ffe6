mod support;

use anyhow::Result;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use common_auth::Role;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use support::TestApp;
use tower::util::ServiceExt;
use uuid::Uuid;

#[tokio::test]
async fn incomplete_body_gets_the_error_envelope() -> Result<()> {
    let app = TestApp::spawn().await?;
    let patient = app.token(1, Role::Patient);

    let resp = app
        .post(
            "/appointments",
            Some(&patient),
            json!({ "patient_id": 1, "doctor_id": 2 }),
        )
        .await?;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error_code.as_deref(), Some("invalid_body"));
    assert_eq!(resp.body["code"], "invalid_body");
    let message = resp.body["message"].as_str().expect("message");
    assert!(message.contains("appointment_time"), "message={message}");
    assert!(resp.body["trace_id"].is_string());
    Ok(())
}

#[tokio::test]
async fn mistyped_login_is_a_bad_request() -> Result<()> {
    let app = TestApp::spawn().await?;
    let resp = app
        .post("/token", None, json!({ "patient_id": "one", "password": "pw" }))
        .await?;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error_code.as_deref(), Some("invalid_body"));
    assert_eq!(resp.body["code"], "invalid_body");
    Ok(())
}

#[tokio::test]
async fn non_numeric_id_is_invalid_path() -> Result<()> {
    let app = TestApp::spawn().await?;
    let staff = app.staff_token();

    let resp = app.get("/patients/abc", Some(&staff)).await?;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error_code.as_deref(), Some("invalid_path"));
    assert_eq!(resp.body["code"], "invalid_path");

    let resp = app.get("/doctors/abc", None).await?;
    assert_eq!(resp.error_code.as_deref(), Some("invalid_path"));
    Ok(())
}

#[tokio::test]
async fn malformed_requests_are_counted_by_code() -> Result<()> {
    let app = TestApp::spawn().await?;
    let patient = app.token(1, Role::Patient);
    app.post("/appointments", Some(&patient), json!({})).await?;
    app.post("/token", None, json!({ "patient_id": "one" })).await?;

    let metrics = app.get("/metrics", None).await?;
    let text = metrics.body.as_str().expect("text exposition");
    let invalid_body = text
        .lines()
        .find(|line| line.starts_with("http_errors_total{") && line.contains("code=\"invalid_body\""))
        .expect("invalid_body sample");
    assert!(invalid_body.ends_with(" 2"), "line={invalid_body}");
    assert!(!text.contains("code=\"unknown\""));
    Ok(())
}

#[tokio::test]
async fn caller_trace_id_is_echoed_in_errors() -> Result<()> {
    let app = TestApp::spawn().await?;
    let trace = Uuid::new_v4();

    for (uri, body) in [
        ("/appointments", Body::empty()),
        ("/token", Body::from(r#"{"patient_id": 5, "password": "nope"}"#)),
    ] {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .header("x-trace-id", trace.to_string())
            .body(body)?;
        let resp = app.router.clone().oneshot(req).await?;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{uri}");
        let bytes = resp.into_body().collect().await?.to_bytes();
        let body: Value = serde_json::from_slice(&bytes)?;
        assert_eq!(body["trace_id"], trace.to_string(), "{uri}");
    }
    Ok(())
}
