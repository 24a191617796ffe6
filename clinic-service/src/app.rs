use axum::{
    body::Body,
    extract::State,
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderName, HeaderValue, Method, Request,
    },
    middleware,
    response::Response,
    routing::{get, post},
    Router,
};
use common_observability::error_metrics_mw;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{field, info_span, Span};

use crate::app_state::AppState;
use crate::appointment_handlers::{
    create_appointment, delete_appointment, get_appointment, list_appointments,
    update_appointment,
};
use crate::doctor_handlers::{create_doctor, get_doctor, list_doctors};
use crate::patient_handlers::{
    delete_patient, get_patient, list_patients, register_patient, update_patient,
};
use crate::prescription_handlers::{create_prescription, list_prescriptions};
use crate::session_handlers::login;
use crate::staff_handlers::{create_staff, list_staff};

async fn render_metrics(State(state): State<AppState>) -> Response {
    state.metrics.render()
}

fn request_span(req: &Request<Body>) -> Span {
    info_span!(
        "http_request",
        method = %req.method(),
        path = %req.uri().path(),
        trace_id = field::Empty,
        subject_id = field::Empty,
    )
}

pub fn cors_layer(origins: &[String]) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(
            origins
                .iter()
                .filter_map(|origin| origin.parse::<HeaderValue>().ok())
                .collect::<Vec<_>>(),
        ))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            ACCEPT,
            CONTENT_TYPE,
            AUTHORIZATION,
            HeaderName::from_static("x-trace-id"),
        ])
}

/// Every route the service exposes. CORS is layered on by the caller.
pub fn router(state: AppState) -> Router {
    let metrics = state.metrics.clone();
    Router::new()
        .route("/patients", post(register_patient).get(list_patients))
        .route(
            "/patients/:id",
            get(get_patient).put(update_patient).delete(delete_patient),
        )
        .route("/token", post(login))
        .route("/doctors", post(create_doctor).get(list_doctors))
        .route("/doctors/:id", get(get_doctor))
        .route("/staff", post(create_staff).get(list_staff))
        .route(
            "/appointments",
            get(list_appointments).post(create_appointment),
        )
        .route(
            "/appointments/:id",
            get(get_appointment)
                .put(update_appointment)
                .delete(delete_appointment),
        )
        .route(
            "/prescriptions",
            post(create_prescription).get(list_prescriptions),
        )
        .route("/healthz", get(|| async { "ok" }))
        .route("/metrics", get(render_metrics))
        .with_state(state)
        .layer(middleware::from_fn_with_state(metrics, error_metrics_mw))
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
}
