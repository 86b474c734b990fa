//! Tower middleware placing the interceptor in front of another service.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::http::Request;
use axum::response::Response;
use tower::{Layer, Service};

use crate::config::MaintenanceConfig;
use crate::maintenance::error::MaintenanceError;
use crate::maintenance::interceptor::MaintenanceInterceptor;

/// Wraps services in a [`MaintenanceService`].
#[derive(Clone)]
pub struct MaintenanceLayer {
    interceptor: Arc<MaintenanceInterceptor>,
}

impl MaintenanceLayer {
    /// Builds the interceptor from `config`. Propagates its construction error.
    pub fn new(config: &MaintenanceConfig, name: impl Into<String>) -> Result<Self, MaintenanceError> {
        let interceptor = MaintenanceInterceptor::new(config, name)?;
        Ok(Self::from_interceptor(interceptor.shared()))
    }

    pub fn from_interceptor(interceptor: Arc<MaintenanceInterceptor>) -> Self {
        Self { interceptor }
    }

    pub fn interceptor(&self) -> Arc<MaintenanceInterceptor> {
        self.interceptor.clone()
    }
}

impl<S> Layer<S> for MaintenanceLayer {
    type Service = MaintenanceService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MaintenanceService {
            inner,
            interceptor: self.interceptor.clone(),
        }
    }
}

/// Serves maintenance content while the trigger is present and forwards to
/// `inner` otherwise.
pub struct MaintenanceService<S> {
    inner: S,
    interceptor: Arc<MaintenanceInterceptor>,
}

impl<S: Clone> Clone for MaintenanceService<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            interceptor: self.interceptor.clone(),
        }
    }
}

impl<S, B> Service<Request<B>> for MaintenanceService<S>
where
    S: Service<Request<B>, Response = Response, Error = Infallible> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<B>) -> Self::Future {
        // Take the service that was driven to readiness and leave a fresh
        // clone behind for the next call.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let interceptor = self.interceptor.clone();
        let path = req.uri().path().to_owned();

        Box::pin(async move {
            if let Some(response) = interceptor.intercept(&path).await {
                return Ok(response);
            }
            inner.call(req).await
        })
    }
}
