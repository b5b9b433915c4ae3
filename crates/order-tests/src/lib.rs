//! Integration tests for the Coffee Order API.
//!
//! Each test starts its own server in-process on an ephemeral port and talks
//! to it over HTTP through [`order_client`].

use coffee_order_backend::api::create_router;
use coffee_order_backend::state::AppState;
use order_client::{ClientConfig, OrderClient};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A running server and a client pointed at it.
pub struct TestServer {
    /// Client for the server.
    pub client: OrderClient,
    /// Shared state, for inspecting the store directly.
    pub state: Arc<AppState>,
    /// Base URL of the server.
    pub base_url: String,
    handle: JoinHandle<()>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Starts a server over an empty in-memory store without a notifier.
///
/// # Panics
/// Panics if the listener cannot be bound.
pub async fn spawn_test_server() -> TestServer {
    spawn_server_with(AppState::in_memory()).await
}

/// Starts a server over the given state.
///
/// # Panics
/// Panics if the listener cannot be bound.
pub async fn spawn_server_with(state: AppState) -> TestServer {
    let state = Arc::new(state);
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no address");

    let app = create_router(Arc::clone(&state));
    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let base_url = format!("http://{}", addr);
    let client = OrderClient::new(ClientConfig {
        base_url: base_url.clone(),
        timeout: Duration::from_secs(10),
    })
    .expect("Failed to create client");

    TestServer {
        client,
        state,
        base_url,
        handle,
    }
}
