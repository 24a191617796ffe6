#![allow(dead_code)]

use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use clinic_service::{db, router, AppState};
use common_auth::{JwtConfig, Role, TokenSigner};
use common_observability::ClinicMetrics;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tower::util::ServiceExt;

pub const TEST_SECRET: &str = "clinic-integration-test-secret";

pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    pub signer: TokenSigner,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub error_code: Option<String>,
    pub body: Value,
}

impl TestApp {
    /// Fresh in-memory database on a single pinned connection, schema applied.
    pub async fn spawn() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .context("open in-memory sqlite")?;
        db::migrate(&pool).await?;

        let jwt = JwtConfig::new(TEST_SECRET)?;
        let signer = TokenSigner::new(&jwt);
        let state = AppState::new(pool.clone(), jwt, Arc::new(ClinicMetrics::default()));
        Ok(Self {
            router: router(state),
            pool,
            signer,
        })
    }

    pub fn token(&self, subject_id: i64, role: Role) -> String {
        self.signer
            .issue(subject_id, role)
            .expect("issue token")
            .access_token
    }

    pub fn expired_token(&self, subject_id: i64, role: Role) -> String {
        self.signer
            .issue_at(subject_id, role, Utc::now() - Duration::minutes(31))
            .expect("issue token")
            .access_token
    }

    pub fn staff_token(&self) -> String {
        self.token(1, Role::Staff)
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<TestResponse> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body)?))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let error_code = response
            .headers()
            .get("x-error-code")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.into_body().collect().await?.to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        Ok(TestResponse {
            status,
            error_code,
            body,
        })
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Result<TestResponse> {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> Result<TestResponse> {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> Result<TestResponse> {
        self.send(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> Result<TestResponse> {
        self.send(Method::DELETE, uri, token, None).await
    }

    /// Registers a patient and returns `(id, access_token)`.
    pub async fn register(&self, name: &str, password: &str) -> Result<(i64, String)> {
        let resp = self
            .post(
                "/patients",
                None,
                json!({
                    "name": name,
                    "date_of_birth": "1990-01-01",
                    "phone": "555-0100",
                    "address": "1 Main St",
                    "password": password,
                }),
            )
            .await?;
        assert_eq!(resp.status, StatusCode::OK, "register {name}: {:?}", resp.body);
        let id = resp.body["id"].as_i64().context("registration id")?;
        let token = resp.body["access_token"]
            .as_str()
            .context("registration token")?
            .to_string();
        Ok((id, token))
    }

    pub async fn add_doctor(&self, name: &str, specialty: &str) -> Result<i64> {
        let staff = self.staff_token();
        let resp = self
            .post(
                "/doctors",
                Some(&staff),
                json!({ "name": name, "specialty": specialty }),
            )
            .await?;
        assert_eq!(resp.status, StatusCode::OK, "add doctor {name}: {:?}", resp.body);
        resp.body["id"].as_i64().context("doctor id")
    }

    pub async fn book(&self, token: &str, patient_id: i64, doctor_id: i64) -> Result<TestResponse> {
        self.post(
            "/appointments",
            Some(token),
            json!({
                "patient_id": patient_id,
                "doctor_id": doctor_id,
                "appointment_time": "2024-05-01T09:30:00",
                "status": "scheduled",
            }),
        )
        .await
    }
}
