///! Map viewer
///!
///! Serves the rendered map directory over HTTP until the user presses Ctrl-C.
use crate::config::ViewerConfig;
use axum::{http::StatusCode, response::IntoResponse, routing::get, Router};
use std::net::SocketAddr;
use std::path::Path;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// An empty (or all-slash) prefix serves the map directory at the root
pub fn router(map_dir: &Path, url_prefix: &str) -> Router {
    let prefix = url_prefix.trim_matches('/');
    let router = Router::new().route("/health", get(health_check));

    let router = if prefix.is_empty() {
        router.fallback_service(ServeDir::new(map_dir))
    } else {
        router.nest_service(&format!("/{}", prefix), ServeDir::new(map_dir))
    };

    router.layer(TraceLayer::new_for_http())
}

/// URL under which `file_name` is served
pub fn map_url(config: &ViewerConfig, file_name: &str) -> String {
    match config.url_prefix.trim_matches('/') {
        "" => format!("http://127.0.0.1:{}/{}", config.port, file_name),
        prefix => format!("http://127.0.0.1:{}/{}/{}", config.port, prefix, file_name),
    }
}

/// Serve `map_dir` on localhost and block until Ctrl-C
pub async fn serve_until_dismissed(config: &ViewerConfig, map_dir: &Path) -> anyhow::Result<()> {
    if !map_dir.exists() {
        anyhow::bail!("Map directory not found: {}", map_dir.display());
    }

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Serving {} on http://{}", map_dir.display(), addr);

    axum::serve(listener, router(map_dir, &config.url_prefix))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl-C: {}", e);
            }
        })
        .await?;

    tracing::info!("Map viewer closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{scratch_dir, spawn_mock};

    #[test]
    fn test_map_url() {
        let config = ViewerConfig {
            enable: true,
            port: 4040,
            url_prefix: "/map/".to_string(),
        };
        assert_eq!(map_url(&config, "iss_map.png"), "http://127.0.0.1:4040/map/iss_map.png");
    }

    #[test]
    fn test_map_url_root_prefix() {
        let mut config = ViewerConfig {
            enable: true,
            port: 4040,
            url_prefix: String::new(),
        };
        assert_eq!(map_url(&config, "iss_map.png"), "http://127.0.0.1:4040/iss_map.png");
        config.url_prefix = "/".to_string();
        assert_eq!(map_url(&config, "iss_map.png"), "http://127.0.0.1:4040/iss_map.png");
    }

    #[tokio::test]
    async fn test_router_serves_map_at_root() {
        let dir = scratch_dir("iss_tracker_viewer_root_test");
        std::fs::write(dir.join("iss_map.png"), b"root map").unwrap();

        for prefix in ["", "/"] {
            let base = spawn_mock(router(&dir, prefix)).await;

            let health = reqwest::get(format!("{}/health", base)).await.unwrap();
            assert_eq!(health.text().await.unwrap(), "OK");

            let map = reqwest::get(format!("{}/iss_map.png", base)).await.unwrap();
            assert_eq!(map.status(), reqwest::StatusCode::OK);
            assert_eq!(map.bytes().await.unwrap().as_ref(), b"root map");
        }

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_router_serves_map_and_health() {
        let dir = scratch_dir("iss_tracker_viewer_test");
        std::fs::write(dir.join("iss_map.png"), b"not really a png").unwrap();

        let base = spawn_mock(router(&dir, "map")).await;

        let health = reqwest::get(format!("{}/health", base)).await.unwrap();
        assert_eq!(health.status(), reqwest::StatusCode::OK);
        assert_eq!(health.text().await.unwrap(), "OK");

        let map = reqwest::get(format!("{}/map/iss_map.png", base)).await.unwrap();
        assert_eq!(map.status(), reqwest::StatusCode::OK);
        assert_eq!(map.bytes().await.unwrap().as_ref(), b"not really a png");

        let missing = reqwest::get(format!("{}/map/nothing.png", base)).await.unwrap();
        assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_serve_missing_dir() {
        let config = ViewerConfig::default();
        let result = serve_until_dismissed(&config, Path::new("/nonexistent/iss/maps")).await;
        assert!(result.is_err());
    }
}
