//! In-process HTTP server for client tests
//!
//! Binds 127.0.0.1:0 and serves an axum router on a background task until
//! the handle is dropped.

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

pub struct TestServer {
    /// e.g. "http://127.0.0.1:12345"
    pub base_url: String,
    _shutdown_tx: oneshot::Sender<()>,
}

impl TestServer {
    /// Serve `app` on a random local port
    ///
    /// The listener is bound before this returns, so requests made right
    /// after are queued rather than refused.
    pub async fn spawn(app: Router) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        Self {
            base_url: format!("http://127.0.0.1:{}", port),
            _shutdown_tx: shutdown_tx,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
