//! Fake upstream HTTP services
//!
//! Adapter tests point the real reqwest-based clients at a local axum
//! router standing in for YouTube, Jamendo or the OpenAI API.

use axum::Router;
use tokio::net::TcpListener;

/// A local HTTP server serving a caller-supplied router.
///
/// Dropping it shuts the server down.
pub struct MockUpstream {
    pub base_url: String,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl MockUpstream {
    pub async fn spawn(router: Router) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock upstream");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Mock upstream failed");
        });

        Self {
            base_url: format!("http://127.0.0.1:{}", port),
            _shutdown_tx: Some(shutdown_tx),
        }
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
