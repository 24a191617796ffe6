use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderValue, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct ClinicMetrics {
    pub registry: Registry,
    pub http_errors_total: IntCounterVec,
    pub tokens_issued_total: IntCounterVec,
    pub access_denied_total: IntCounterVec,
    service: &'static str,
}

impl ClinicMetrics {
    pub fn new(service: &'static str) -> Self {
        let registry = Registry::new();
        let http_errors_total = IntCounterVec::new(
            Opts::new(
                "http_errors_total",
                "Count of HTTP error responses emitted (status >= 400)"
            ),
            &["service", "code", "status"]
        ).unwrap();
        let tokens_issued_total = IntCounterVec::new(
            Opts::new(
                "clinic_tokens_issued_total",
                "Session tokens issued grouped by role"
            ),
            &["role"]
        ).unwrap();
        let access_denied_total = IntCounterVec::new(
            Opts::new(
                "clinic_access_denied_total",
                "Requests rejected by the access guard"
            ),
            &["resource", "action"]
        ).unwrap();
        let _ = registry.register(Box::new(http_errors_total.clone()));
        let _ = registry.register(Box::new(tokens_issued_total.clone()));
        let _ = registry.register(Box::new(access_denied_total.clone()));
        ClinicMetrics { registry, http_errors_total, tokens_issued_total, access_denied_total, service }
    }

    pub fn token_issued(&self, role: &str) {
        self.tokens_issued_total.with_label_values(&[role]).inc();
    }

    pub fn access_denied(&self, resource: &str, action: &str) {
        self.access_denied_total.with_label_values(&[resource, action]).inc();
    }

    pub fn http_error(&self, code: &str, status: StatusCode) {
        self.http_errors_total
            .with_label_values(&[self.service, code, status.as_str()])
            .inc();
    }

    pub fn render(&self) -> Response {
        let encoder = TextEncoder::new();
        let families = self.registry.gather();
        let mut buf = Vec::new();
        if let Err(e) = encoder.encode(&families, &mut buf) {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("metrics encode error: {e}"),
            ).into_response();
        }
        (
            [(header::CONTENT_TYPE, HeaderValue::from_static("text/plain; version=0.0.4"))],
            buf,
        ).into_response()
    }
}

impl Default for ClinicMetrics {
    fn default() -> Self { Self::new("clinic-service") }
}

/// Counts every response with status >= 400, labelled by its `X-Error-Code`.
pub async fn error_metrics_mw(
    State(metrics): State<Arc<ClinicMetrics>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let resp = next.run(req).await;
    let status = resp.status();
    if status.as_u16() >= 400 {
        let code = resp
            .headers()
            .get("x-error-code")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown");
        metrics.http_error(code, status);
    }
    resp
}
