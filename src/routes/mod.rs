//! Router assembly: pages, HTTP endpoints, WebSocket upgrade, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;
pub mod pages;
pub mod ws;

/// Build the application router with:
/// - Identity screen at `/`, quiz screen at `/quiz`
/// - Quiz WebSocket at `/ws?userId=...`
/// - REST-ish API under `/api/v1/...`
/// - Every other path redirected to `/`
/// - CORS (allow any origin/method/headers)
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(pages::identity_page))
        .route("/quiz", get(pages::quiz_page))
        .route("/ws", get(ws::ws_upgrade))
        .route("/api/v1/health", get(http::http_health))
        .route("/api/v1/login", post(http::http_post_login))
        .fallback(pages::redirect_home)
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use tower::ServiceExt;

    use crate::config::{QuizSettings, SupabaseSettings};
    use crate::protocol::{ErrorOut, LoginOut};
    use crate::seeds::seed_questions;
    use crate::store::{MemoryStore, Store};
    use crate::supabase::Supabase;

    fn app() -> (Router, MemoryStore) {
        let mem = MemoryStore::default();
        let state = AppState::with_parts(seed_questions(), QuizSettings::default(), Store::Memory(mem.clone()));
        (build_router(Arc::new(state)), mem)
    }

    fn login_request(user_id: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::json!({ "userId": user_id }).to_string()))
            .expect("request")
    }

    #[tokio::test]
    async fn screens_are_served() {
        let (app, _) = app();
        for path in ["/", "/quiz"] {
            let res = app
                .clone()
                .oneshot(Request::builder().uri(path).body(Body::empty()).expect("request"))
                .await
                .expect("response");
            assert_eq!(res.status(), StatusCode::OK, "{path}");
        }
    }

    #[tokio::test]
    async fn unknown_paths_redirect_to_identity_screen() {
        let (app, _) = app();
        let res = app
            .oneshot(Request::builder().uri("/nope/deeper").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers()[header::LOCATION], "/");
    }

    #[tokio::test]
    async fn login_normalizes_and_is_idempotent() {
        let (app, mem) = app();

        let res = app.clone().oneshot(login_request(" scmn42 ")).await.expect("response");
        assert_eq!(res.status(), StatusCode::OK);
        let body = to_bytes(res.into_body(), usize::MAX).await.expect("body");
        let out: LoginOut = serde_json::from_slice(&body).expect("json");
        assert_eq!(out.user_id, "SCMN42");
        assert!(out.created);

        let res = app.oneshot(login_request("SCMN42")).await.expect("response");
        let body = to_bytes(res.into_body(), usize::MAX).await.expect("body");
        let out: LoginOut = serde_json::from_slice(&body).expect("json");
        assert!(!out.created);

        assert_eq!(mem.users().await.len(), 1);
    }

    #[tokio::test]
    async fn blank_login_is_a_bad_request() {
        let (app, _) = app();
        let res = app.oneshot(login_request("  ")).await.expect("response");
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body = to_bytes(res.into_body(), usize::MAX).await.expect("body");
        let out: ErrorOut = serde_json::from_slice(&body).expect("json");
        assert!(!out.error.is_empty());
    }

    #[tokio::test]
    async fn store_outage_is_a_generic_bad_gateway() {
        let sb = Supabase::new(SupabaseSettings { url: "http://127.0.0.1:9".into(), anon_key: "k".into() })
            .expect("client");
        let state = AppState::with_parts(seed_questions(), QuizSettings::default(), Store::Supabase(sb));
        let app = build_router(Arc::new(state));

        let res = app.oneshot(login_request("scmn1")).await.expect("response");
        assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
        let body = to_bytes(res.into_body(), usize::MAX).await.expect("body");
        let v: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(v, serde_json::json!({ "error": "Something went wrong. Please try again." }));
    }

    #[tokio::test]
    async fn health_reports_store_kind() {
        let (app, _) = app();
        let res = app
            .oneshot(Request::builder().uri("/api/v1/health").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(res.status(), StatusCode::OK);
        let body = to_bytes(res.into_body(), usize::MAX).await.expect("body");
        let v: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(v, serde_json::json!({ "ok": true, "store": "memory" }));
    }
}
