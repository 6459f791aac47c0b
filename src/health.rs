//! Liveness endpoint for hosting-platform health checks.

use anyhow::{Context, Result};
use axum::routing::get;
use axum::Router;
use std::net::{Ipv4Addr, SocketAddr};
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Body returned by `GET /`.
pub const ALIVE_MESSAGE: &str = "🤖 Бот работает 24/7";

/// Builds the liveness router.
pub fn router() -> Router {
    Router::new().route("/", get(alive))
}

async fn alive() -> &'static str {
    ALIVE_MESSAGE
}

/// Binds `0.0.0.0:<port>` and serves the liveness router in the background.
///
/// Binding happens before returning so a taken port fails startup.
pub async fn spawn(port: u16) -> Result<JoinHandle<()>> {
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind health endpoint on {}", addr))?;

    info!("Health endpoint listening on http://{}", addr);

    Ok(tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router()).await {
            error!("Health endpoint stopped: {}", e);
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_root_returns_alive() {
        let response = router()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], ALIVE_MESSAGE.as_bytes());
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let response = router()
            .oneshot(Request::builder().uri("/status").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_spawn_serves_on_port() {
        let handle = spawn(0).await.unwrap();
        assert!(!handle.is_finished());
        handle.abort();
    }
}
