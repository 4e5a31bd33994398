//! Tiny HTTP keepalive endpoint.
//!
//! Free hosting platforms health-check the service over plain HTTP and
//! reap instances that stop answering; this serves a one-line body on
//! its own port, independent of the webhook server.

use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Spawn the keepalive server on the given port.
pub fn spawn(port: u16) {
    tokio::spawn(async move {
        let app = Router::new().route("/", get(|| async { "✅ ScenesPacks bot is running!" }));

        let addr = format!("0.0.0.0:{port}");
        let listener = match TcpListener::bind(&addr).await {
            Ok(listener) => listener,
            Err(e) => {
                warn!("Keepalive server could not bind {}: {}", addr, e);
                return;
            }
        };

        info!("Keepalive server listening on {}", addr);
        if let Err(e) = axum::serve(listener, app).await {
            warn!("Keepalive server stopped: {}", e);
        }
    });
}
