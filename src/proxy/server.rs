use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::config::Config;
use crate::maintenance::{MaintenanceInterceptor, MaintenanceLayer};
use crate::proxy::error::ProxyError;
use crate::proxy::shutdown::ShutdownManager;
use crate::proxy::upstream::{proxy_handler, UpstreamClient};

/// Every request falls through to the upstream proxy, with the maintenance
/// layer in front of it.
pub fn build_router(interceptor: Arc<MaintenanceInterceptor>, upstream: Arc<UpstreamClient>) -> Router {
    Router::new()
        .fallback(proxy_handler)
        .with_state(upstream)
        .layer(MaintenanceLayer::from_interceptor(interceptor))
}

pub struct GateServer {
    pub addr: SocketAddr,
    /// The bound listener. Populated by try_bind(), consumed by run().
    listener: Option<TcpListener>,
    interceptor: Arc<MaintenanceInterceptor>,
    upstream: Arc<UpstreamClient>,
    shutdown: Arc<ShutdownManager>,
}

impl GateServer {
    /// Builds the interceptor and upstream client.
    ///
    /// Fails when the maintenance page is unreadable; there is no degraded
    /// startup without it.
    pub fn new(config: &Config) -> Result<Self, ProxyError> {
        let maintenance = &config.maintenance;
        let interceptor = MaintenanceInterceptor::new(maintenance, maintenance.name.clone())?.shared();
        let upstream = Arc::new(UpstreamClient::new(&config.proxy)?);

        let addr = config
            .proxy
            .bind_addr
            .parse()
            .map_err(|e| ProxyError::Internal(format!("Invalid bind address '{}': {}", config.proxy.bind_addr, e)))?;

        Ok(Self {
            addr,
            listener: None,
            interceptor,
            upstream,
            shutdown: Arc::new(ShutdownManager::new()),
        })
    }

    /// Binds the configured address and records the actual one (useful when
    /// the configured port is 0).
    pub async fn try_bind(&mut self) -> Result<SocketAddr, ProxyError> {
        let listener = TcpListener::bind(self.addr)
            .await
            .map_err(|e| ProxyError::Internal(format!("Failed to bind {}: {}", self.addr, e)))?;
        let actual_addr = listener
            .local_addr()
            .map_err(|e| ProxyError::Internal(e.to_string()))?;

        self.addr = actual_addr;
        self.listener = Some(listener);
        tracing::info!("Bound to {} (upstream: {})", actual_addr, self.upstream.base_url());
        Ok(actual_addr)
    }

    pub fn interceptor(&self) -> Arc<MaintenanceInterceptor> {
        self.interceptor.clone()
    }

    pub fn handle(&self) -> GateHandle {
        GateHandle {
            shutdown: self.shutdown.clone(),
        }
    }

    /// Run the server until shutdown is signaled.
    ///
    /// Consumes self to take ownership of the pre-bound listener.
    /// Call try_bind() before run().
    pub async fn run(self) -> Result<(), ProxyError> {
        let listener = self
            .listener
            .ok_or_else(|| ProxyError::Internal("try_bind() must be called before run()".to_string()))?;

        tracing::info!("Starting maintenance gate on {}", self.addr);

        let app = build_router(self.interceptor.clone(), self.upstream.clone());

        let shutdown = self.shutdown.clone();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                if let Err(e) = shutdown.wait_for_shutdown().await {
                    tracing::error!("Shutdown signal handler failed: {}", e);
                }
            })
            .into_future()
            .await
            .map_err(|e| ProxyError::Internal(format!("Server error: {}", e)))?;

        tracing::info!("Server stopped");
        Ok(())
    }
}

#[derive(Clone)]
pub struct GateHandle {
    shutdown: Arc<ShutdownManager>,
}

impl GateHandle {
    pub fn shutdown(&self) {
        self.shutdown.signal_shutdown();
    }
}
