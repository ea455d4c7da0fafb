//! ServerBuilder for fluent API to build HTTP servers

use super::router::{build_request_routes, with_http_layers};
use crate::config::ServiceConfig;
use crate::core::envelope::ResponseAssembler;
use crate::core::store::RequestStore;
use crate::lifecycle::handlers::AppState;
use crate::lifecycle::service::RequestService;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for creating the request tracker HTTP server
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_config(ServiceConfig::default())
///     .with_store(InMemoryRequestStore::new())
///     .build()?;
/// ```
pub struct ServerBuilder {
    config: ServiceConfig,
    store: Option<Arc<dyn RequestStore>>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder with the default configuration
    pub fn new() -> Self {
        Self {
            config: ServiceConfig::default(),
            store: None,
            custom_routes: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: ServiceConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the request store (required)
    pub fn with_store(mut self, store: impl RequestStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Set an already shared request store (required)
    pub fn with_shared_store(mut self, store: Arc<dyn RequestStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Add routes served next to the request API
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the handler state from the configuration and the store
    pub fn build_state(&mut self) -> Result<AppState> {
        let store = self
            .store
            .take()
            .ok_or_else(|| anyhow::anyhow!("RequestStore is required. Call .with_store()"))?;

        let service = RequestService::new(store)
            .with_policy(self.config.status_policy)
            .with_pagination(self.config.pagination);
        let assembler = ResponseAssembler::new(self.config.expose_internal_errors());

        Ok(AppState::new(service, assembler))
    }

    /// Build the final router with tracing and CORS layers
    pub fn build(mut self) -> Result<Router> {
        let state = self.build_state()?;

        let mut router = build_request_routes(state);
        for routes in std::mem::take(&mut self.custom_routes) {
            router = router.merge(routes);
        }

        Ok(with_http_layers(router))
    }

    /// Serve the application with graceful shutdown
    ///
    /// Handles SIGTERM and SIGINT (Ctrl+C).
    ///
    /// # Example
    ///
    /// ```ignore
    /// ServerBuilder::new()
    ///     .with_store(store)
    ///     .serve("127.0.0.1:5000").await?;
    /// ```
    pub async fn serve(self, addr: &str) -> Result<()> {
        let environment = self.config.environment;
        let policy = self.config.status_policy;
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!(?environment, ?policy, "Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
