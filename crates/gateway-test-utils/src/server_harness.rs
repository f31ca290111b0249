//! Test server harness for E2E testing
//!
//! Provides `TestGatewayServer` for spawning real gateway instances in tests.

use crate::token_fixtures::{TEST_API_KEY, TEST_API_SECRET, TEST_ROOM};
use gateway_service::config::Config;
use gateway_service::routes::{self, AppState};
use gateway_service::services::chat::ChatResponder;
use gateway_service::services::transcription::Transcriber;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Builder for a test server.
///
/// Starts from an environment with no integrations configured. Upstream
/// clients can be replaced with mocks after configuration is applied.
#[derive(Default)]
pub struct TestGatewayServerBuilder {
    vars: HashMap<String, String>,
    responder: Option<Arc<dyn ChatResponder>>,
    transcriber: Option<Arc<dyn Transcriber>>,
}

impl TestGatewayServerBuilder {
    /// Configure LiveKit with the harness credentials and room.
    pub fn with_livekit(self) -> Self {
        self.with_var("LIVEKIT_API_KEY", TEST_API_KEY)
            .with_var("LIVEKIT_API_SECRET", TEST_API_SECRET)
            .with_var("LIVEKIT_ROOM", TEST_ROOM)
            .with_var("LIVEKIT_URL", "wss://livekit.test")
    }

    /// Set one configuration variable.
    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_string(), value.to_string());
        self
    }

    /// Replace the configured chat responder.
    pub fn with_responder(mut self, responder: Arc<dyn ChatResponder>) -> Self {
        self.responder = Some(responder);
        self
    }

    /// Replace (or enable) the transcriber.
    pub fn with_transcriber(mut self, transcriber: Arc<dyn Transcriber>) -> Self {
        self.transcriber = Some(transcriber);
        self
    }

    /// Build state and serve it on a random local port.
    pub async fn spawn(self) -> Result<TestGatewayServer, anyhow::Error> {
        let config = Config::from_vars(&self.vars)
            .map_err(|e| anyhow::anyhow!("Failed to create config: {}", e))?;

        let mut state = AppState::from_config(config.clone())
            .map_err(|e| anyhow::anyhow!("Failed to build app state: {}", e))?;
        if let Some(responder) = self.responder {
            state.responder = responder;
        }
        if let Some(transcriber) = self.transcriber {
            state.transcriber = Some(transcriber);
        }

        // A local recorder per server; the global one can only be installed once.
        let metrics_handle = PrometheusBuilder::new().build_recorder().handle();

        let app = routes::build_routes(Arc::new(state), metrics_handle);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        let handle = tokio::spawn(async move {
            let make_service = app.into_make_service_with_connect_info::<SocketAddr>();
            if let Err(e) = axum::serve(listener, make_service).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(TestGatewayServer {
            addr,
            config,
            _handle: handle,
        })
    }
}

/// Test harness for spawning the gateway in E2E tests.
///
/// # Example
/// ```rust,ignore
/// let server = TestGatewayServer::builder().with_livekit().spawn().await?;
/// let response = reqwest::get(format!("{}/get-token?identity=alice", server.url())).await?;
/// assert_eq!(response.status(), 200);
/// ```
pub struct TestGatewayServer {
    addr: SocketAddr,
    config: Config,
    _handle: JoinHandle<()>,
}

impl TestGatewayServer {
    pub fn builder() -> TestGatewayServerBuilder {
        TestGatewayServerBuilder::default()
    }

    /// Spawn with no integrations configured.
    pub async fn spawn() -> Result<Self, anyhow::Error> {
        Self::builder().spawn().await
    }

    /// Get the base URL of the test server.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the socket address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get reference to the server configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Drop for TestGatewayServer {
    fn drop(&mut self) {
        self._handle.abort();
    }
}
