//! Server setup and lifecycle management

use crate::api::create_router;
use crate::api::rest::{normalize_path, AppState};
use crate::config::{LandingConfig, StorageConfig};
use crate::error::{DaemonError, DaemonResult};
use crate::notify::Notifier;
use crate::service::SubmissionService;
use crate::storage::{InMemoryStorage, PostgresStorage, Storage, StorageHealth};
use axum::{extract::Request, ServiceExt};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::Layer;

/// Landing daemon server
pub struct Server {
    config: LandingConfig,
    storage: Arc<dyn Storage>,
    notifier: Arc<Notifier>,
}

impl Server {
    /// Create a new server with the given configuration.
    ///
    /// An unreachable database is logged, not fatal: the landing page keeps
    /// serving and submissions fail until storage recovers.
    pub async fn new(config: LandingConfig) -> DaemonResult<Self> {
        let storage: Arc<dyn Storage> = match &config.storage {
            StorageConfig::Memory => {
                tracing::warn!("Using in-memory storage, applications are lost on restart");
                Arc::new(InMemoryStorage::new())
            }
            StorageConfig::Postgres(pg) => {
                let storage = PostgresStorage::connect_lazy(pg);
                if let Err(e) = storage.initialize().await {
                    tracing::error!(
                        error = %e,
                        host = %pg.host,
                        database = %pg.database,
                        "PostgreSQL not ready at startup, continuing without schema check"
                    );
                }
                Arc::new(storage)
            }
        };

        let notifier = Arc::new(Notifier::from_config(&config.mail));

        Ok(Self::with_components(config, storage, notifier))
    }

    /// Assemble a server from prebuilt storage and notifier
    pub fn with_components(
        config: LandingConfig,
        storage: Arc<dyn Storage>,
        notifier: Arc<Notifier>,
    ) -> Self {
        Self {
            config,
            storage,
            notifier,
        }
    }

    /// Run the server until Ctrl+C or SIGTERM
    pub async fn run(self) -> DaemonResult<()> {
        let addr = self.config.server.listen_addr;
        let listener = TcpListener::bind(addr).await?;

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> DaemonResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;

        if self.config.admin.token.is_none() {
            tracing::warn!("No admin token configured, application listing is open");
        }

        let service = SubmissionService::new(self.storage.clone(), self.notifier.clone());
        let state = AppState::new(service, self.config.admin.token.clone());
        let router = create_router(state, &self.config.server);

        // Paths are normalized before the router sees them
        let app = axum::middleware::from_fn(normalize_path).layer(router);

        tracing::info!(
            %addr,
            storage = self.storage.backend(),
            mail = self.notifier.transport_name(),
            "Landing daemon listening"
        );

        axum::serve(
            listener,
            ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
        )
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| DaemonError::Server(e.to_string()))?;

        tracing::info!("Landing daemon shutting down");
        Ok(())
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}
