//! The maintenance decision and the responses it produces.

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::Response;

use crate::config::{MaintenanceConfig, DEFAULT_IMAGE_CONTENT_TYPE, DEFAULT_IMAGE_ROUTE};
use crate::maintenance::error::MaintenanceError;
use crate::maintenance::resource::{LoadOnceResource, PolledResource};

/// A file served verbatim at a fixed URL path.
#[derive(Debug, Clone)]
pub struct AssetRoute {
    pub resource: PolledResource,
    pub content_type: HeaderValue,
}

/// Decides per request whether maintenance content replaces the downstream
/// response.
///
/// Everything here is fixed after construction. The trigger file and the
/// assets are consulted on the filesystem at request time.
#[derive(Debug)]
pub struct MaintenanceInterceptor {
    name: String,
    enabled: bool,
    trigger: PolledResource,
    page: LoadOnceResource,
    status: StatusCode,
    content_type: HeaderValue,
    assets: HashMap<String, AssetRoute>,
}

impl MaintenanceInterceptor {
    /// Builds the interceptor and reads the maintenance page into memory.
    ///
    /// Fails if the page cannot be read or an option does not form a valid
    /// HTTP status or header value.
    pub fn new(config: &MaintenanceConfig, name: impl Into<String>) -> Result<Self, MaintenanceError> {
        let name = name.into();
        let page = LoadOnceResource::load(&config.filename)?;

        let status = StatusCode::from_u16(config.http_response_code).map_err(|e| {
            MaintenanceError::InvalidOption {
                option: "httpResponseCode",
                reason: e.to_string(),
            }
        })?;

        let content_type = HeaderValue::from_str(&config.http_content_type).map_err(|e| {
            MaintenanceError::InvalidOption {
                option: "httpContentType",
                reason: e.to_string(),
            }
        })?;

        let mut assets = HashMap::new();
        assets.insert(
            DEFAULT_IMAGE_ROUTE.to_string(),
            AssetRoute {
                resource: PolledResource::new(&config.image_file),
                content_type: HeaderValue::from_static(DEFAULT_IMAGE_CONTENT_TYPE),
            },
        );
        for (route, asset) in &config.assets {
            let content_type = HeaderValue::from_str(&asset.content_type()).map_err(|e| {
                MaintenanceError::InvalidOption {
                    option: "assets",
                    reason: format!("{}: {}", route, e),
                }
            })?;
            assets.insert(
                route.clone(),
                AssetRoute {
                    resource: PolledResource::new(&asset.file),
                    content_type,
                },
            );
        }

        tracing::info!(
            name = %name,
            enabled = config.enabled,
            page = %page.path().display(),
            trigger = %config.trigger_filename.display(),
            status = status.as_u16(),
            assets = assets.len(),
            "Maintenance interceptor ready"
        );

        Ok(Self {
            name,
            enabled: config.enabled,
            trigger: PolledResource::new(&config.trigger_filename),
            page,
            status,
            content_type,
            assets,
        })
    }

    /// Wraps the interceptor for sharing across request tasks.
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether maintenance mode is in effect right now.
    pub async fn is_active(&self) -> bool {
        self.enabled && self.trigger.is_present().await
    }

    /// Returns the maintenance response for `path`, or `None` when the
    /// request should go to the downstream handler.
    pub async fn intercept(&self, path: &str) -> Option<Response> {
        if !self.is_active().await {
            return None;
        }

        let response = match self.assets.get(path) {
            Some(route) => self.serve_asset(route).await,
            None => self.serve_page(),
        };

        tracing::debug!(
            name = %self.name,
            path,
            status = response.status().as_u16(),
            "Served maintenance response"
        );
        Some(response)
    }

    /// The cached maintenance page with the configured status and type.
    pub fn serve_page(&self) -> Response {
        let mut response = Response::new(Body::from(self.page.bytes()));
        *response.status_mut() = self.status;
        response
            .headers_mut()
            .insert(CONTENT_TYPE, self.content_type.clone());
        response
    }

    /// Reads `route` from disk and serves it with status 200, or 404 when
    /// the file cannot be read.
    pub async fn serve_asset(&self, route: &AssetRoute) -> Response {
        match route.resource.read().await {
            Ok(bytes) => {
                let mut response = Response::new(Body::from(bytes));
                response
                    .headers_mut()
                    .insert(CONTENT_TYPE, route.content_type.clone());
                response
            }
            Err(err) => {
                tracing::warn!(name = %self.name, error = %err, "Maintenance asset unavailable");
                not_found_response()
            }
        }
    }

    pub fn asset_route(&self, path: &str) -> Option<&AssetRoute> {
        self.assets.get(path)
    }
}

/// Plain-text 404 for an unreadable asset. The body never includes the
/// filesystem path.
fn not_found_response() -> Response {
    let mut response = Response::new(Body::from("Image not found"));
    *response.status_mut() = StatusCode::NOT_FOUND;
    response.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}
