//! In-process HTTP fixtures for tests

use axum::Router;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use std::path::{Path, PathBuf};

/// Serve `router` on an ephemeral localhost port, returning its base URL
pub async fn spawn_mock(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn json_route(body: &'static str) -> axum::routing::MethodRouter {
    get(move || async move {
        (
            StatusCode::OK,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body,
        )
    })
}

fn failing_route(status: StatusCode) -> axum::routing::MethodRouter {
    get(move || async move { (status, "upstream unavailable").into_response() })
}

pub const ASTROS_JSON: &str = r#"{"message":"success","number":3,"people":[
    {"craft":"ISS","name":"Oleg Kononenko"},
    {"craft":"ISS","name":"Tracy Dyson"},
    {"craft":"Tiangong","name":"Ye Guangfu"}
]}"#;

pub const ISS_NOW_JSON: &str = r#"{"message":"success","timestamp":1760000000,
    "iss_position":{"latitude":"51.6400","longitude":"-0.1278"}}"#;

pub const ISS_PASS_JSON: &str = r#"{"message":"success",
    "response":[{"risetime":0},{"risetime":1609459200,"duration":612}]}"#;

/// All three endpoints answering with canned success payloads
pub fn open_notify_router() -> Router {
    Router::new()
        .route("/astros.json", json_route(ASTROS_JSON))
        .route("/iss-now.json", json_route(ISS_NOW_JSON))
        .route("/iss-pass.json", json_route(ISS_PASS_JSON))
}

/// Same as [`open_notify_router`] but `failing` answers with `status`
pub fn open_notify_router_failing(failing: &str, status: StatusCode) -> Router {
    let route = |path: &str, body: &'static str| {
        if path == failing {
            failing_route(status)
        } else {
            json_route(body)
        }
    };
    Router::new()
        .route("/astros.json", route("/astros.json", ASTROS_JSON))
        .route("/iss-now.json", route("/iss-now.json", ISS_NOW_JSON))
        .route("/iss-pass.json", route("/iss-pass.json", ISS_PASS_JSON))
}

/// Router answering only `path`, always with `body`
pub fn router_with_body(path: &str, body: &'static str) -> Router {
    Router::new().route(path, json_route(body))
}

/// Fresh scratch directory under the system temp dir
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Write a solid-colour PNG usable as a map or icon asset
pub fn write_png(path: &Path, width: u32, height: u32, rgba: [u8; 4]) {
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height).unwrap();
    pixmap.fill(resvg::tiny_skia::Color::from_rgba8(rgba[0], rgba[1], rgba[2], rgba[3]));
    pixmap.save_png(path).unwrap();
}
