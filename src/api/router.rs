use axum::{
    http::header::{HeaderValue, ACCEPT, CONTENT_TYPE, ORIGIN},
    http::{HeaderName, Method, Request, Response},
    routing::get,
    Router,
};
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    normalize_path::NormalizePathLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::Span;

use crate::api::generator;
use crate::api::handlers;
use crate::api::sessions;
use crate::core::{config::Settings, state::AppState};

const API_V1_PREFIX: &str = "/api/v1";

pub(crate) fn router(state: AppState) -> Router {
    let cors = build_cors_layer(state.settings());

    let api_v1 = Router::new()
        .nest("/generator", generator::router())
        .nest("/exams", sessions::exam_router())
        .nest("/attempts", sessions::attempt_router());

    let request_id_header = HeaderName::from_static("x-request-id");
    let request_id_header_for_span = request_id_header.clone();
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(move |request: &Request<_>| {
            let request_id = request
                .headers()
                .get(&request_id_header_for_span)
                .and_then(|value| value.to_str().ok())
                .unwrap_or("-");
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id
            )
        })
        .on_response(|response: &Response<axum::body::Body>, latency: Duration, _span: &Span| {
            let status_label = response.status().as_u16().to_string();
            metrics::counter!(
                "http_requests_total",
                "status" => status_label.clone()
            )
            .increment(1);
            metrics::histogram!(
                "http_request_duration_seconds",
                "status" => status_label
            )
            .record(latency.as_secs_f64());
        });

    let mut router: Router<AppState> = Router::new()
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz).head(handlers::healthz))
        .nest(API_V1_PREFIX, api_v1)
        .layer(NormalizePathLayer::trim_trailing_slash())
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(trace_layer)
        .layer(cors);

    if state.settings().telemetry().prometheus_enabled {
        router = router.route("/metrics", get(handlers::metrics));
    }

    router.with_state(state)
}

fn build_cors_layer(settings: &Settings) -> CorsLayer {
    let origins = settings
        .cors()
        .origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect::<Vec<_>>();

    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            CONTENT_TYPE,
            ACCEPT,
            ORIGIN,
            HeaderName::from_static("x-student-id"),
            HeaderName::from_static("x-request-id"),
        ])
        .expose_headers([HeaderName::from_static("x-request-id")])
        .max_age(Duration::from_secs(3600));

    if origins.is_empty() {
        // Wildcard origin cannot be combined with allow_credentials
        base.allow_origin(Any)
    } else {
        base.allow_credentials(true).allow_origin(AllowOrigin::list(origins))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{body::to_bytes, body::Body, http::Request, http::StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::router;
    use crate::core::config::Settings;
    use crate::core::state::AppState;
    use crate::test_support::{MemoryStore, StoredExam};

    fn build_state(store: Arc<MemoryStore>) -> AppState {
        let settings = Settings::load().expect("settings");
        let db = sqlx::PgPool::connect_lazy(&settings.database().database_url()).expect("lazy pool");
        AppState::new(settings, db, store)
    }

    fn seeded_store() -> Arc<MemoryStore> {
        let store = MemoryStore::new();
        store.add_exam(StoredExam::active("exam-1"));
        for order in 0..2 {
            store.add_question("exam-1", &format!("q{order}"), order, 1, 30);
        }
        Arc::new(store)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .header("x-student-id", "student-1")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    #[tokio::test]
    async fn root_returns_service_banner() {
        let app = router(build_state(seeded_store()));
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).expect("request"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Examhall API");
    }

    #[tokio::test]
    async fn metrics_route_absent_without_prometheus() {
        let app = router(build_state(seeded_store()));
        let response = app
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).expect("request"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn generator_produces_requested_batch() {
        let app = router(build_state(seeded_store()));
        let response = app
            .oneshot(json_request(
                "POST",
                "/api/v1/generator/questions",
                json!({ "count": 5, "grade": 3 }),
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["count"], 5);
        assert_eq!(body["questions"].as_array().map(Vec::len), Some(5));
        for question in body["questions"].as_array().expect("questions") {
            assert_eq!(question["options"].as_array().map(Vec::len), Some(4));
            assert_eq!(question["grade_level"], 3);
        }
    }

    #[tokio::test]
    async fn generator_rejects_zero_count() {
        let app = router(build_state(seeded_store()));
        let response = app
            .oneshot(json_request("POST", "/api/v1/generator/questions", json!({ "count": 0 })))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn join_requires_student_header() {
        let app = router(build_state(seeded_store()));
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/exams/exam-1/session")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn session_flow_over_http() {
        let app = router(build_state(seeded_store()));

        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/v1/exams/exam-1/session", json!({})))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let snapshot = body_json(response).await;
        let attempt_id = snapshot["attempt_id"].as_str().expect("attempt id").to_string();
        assert_eq!(snapshot["current_index"], 0);
        assert_eq!(snapshot["total_questions"], 2);

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/v1/attempts/{attempt_id}/answer"),
                json!({ "option": 1 }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["answered_count"], 1);

        // One question still unanswered: submission is rejected inline.
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/v1/attempts/{attempt_id}/submit"),
                json!({}),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["detail"], "1 question(s) remaining");

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/v1/attempts/{attempt_id}/next"),
                json!({}),
            ))
            .await
            .expect("response");
        assert_eq!(body_json(response).await["current_index"], 1);

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/v1/attempts/{attempt_id}/answer"),
                json!({ "option": 0 }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/v1/attempts/{attempt_id}/submit"),
                json!({}),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let summary = body_json(response).await;
        assert_eq!(summary["correct_answers"], 1);
        assert_eq!(summary["total_questions"], 2);

        // The live session is gone once the attempt is submitted.
        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/v1/attempts/{attempt_id}"))
                    .header("x-student-id", "student-1")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn leaving_preserves_attempt_for_rejoin() {
        let store = seeded_store();
        let app = router(build_state(Arc::clone(&store)));

        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/v1/exams/exam-1/session", json!({})))
            .await
            .expect("response");
        let attempt_id =
            body_json(response).await["attempt_id"].as_str().expect("attempt id").to_string();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/v1/attempts/{attempt_id}"))
                    .header("x-student-id", "student-1")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(json_request("POST", "/api/v1/exams/exam-1/session", json!({})))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["attempt_id"], attempt_id.as_str());
    }

    #[tokio::test]
    async fn attempts_are_scoped_to_their_student() {
        let app = router(build_state(seeded_store()));

        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/v1/exams/exam-1/session", json!({})))
            .await
            .expect("response");
        let attempt_id =
            body_json(response).await["attempt_id"].as_str().expect("attempt id").to_string();

        // Someone else's attempt looks like a missing one.
        for method in ["GET", "DELETE"] {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .method(method)
                        .uri(format!("/api/v1/attempts/{attempt_id}"))
                        .header("x-student-id", "student-2")
                        .body(Body::empty())
                        .expect("request"),
                )
                .await
                .expect("response");
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
        }

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/v1/attempts/{attempt_id}/answer"),
                json!({ "option": 1 }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/v1/attempts/{attempt_id}"))
                    .header("x-student-id", "student-1")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["answered_count"], 1);
    }
}
