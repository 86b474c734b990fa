//! Downstream handler used by the bundled host: a plain reverse proxy.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::header::{self, HeaderName, HOST};
use axum::http::{Request, Response};
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use reqwest::Client;
use tokio::time::timeout;

use crate::config::ProxyConfig;
use crate::proxy::error::ProxyError;

/// Connection-scoped headers that must not cross the proxy (RFC 9110 7.6.1).
const HOP_BY_HOP: [HeaderName; 7] = [
    header::CONNECTION,
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP.contains(name) || name == "keep-alive" || name == "proxy-connection"
}

pub struct UpstreamClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl UpstreamClient {
    pub fn new(config: &ProxyConfig) -> Result<Self, ProxyError> {
        let client = Client::builder()
            .build()
            .map_err(|e| ProxyError::Internal(format!("Failed to build upstream client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.upstream.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(u64::from(config.timeout_seconds)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn forward(&self, req: Request<Body>) -> Result<Response<Body>, ProxyError> {
        match timeout(self.timeout, self.do_forward(req)).await {
            Ok(response) => response,
            Err(_) => Err(ProxyError::RequestTimeout {
                duration: self.timeout.as_secs(),
            }),
        }
    }

    async fn do_forward(&self, req: Request<Body>) -> Result<Response<Body>, ProxyError> {
        let method = req.method().clone();
        let path_and_query = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");

        let upstream_uri = format!("{}{}", self.base_url, path_and_query);
        let mut builder = self.client.request(method, upstream_uri);

        for (name, value) in req.headers() {
            if name != HOST && !is_hop_by_hop(name) {
                builder = builder.header(name, value);
            }
        }

        let body_bytes = req
            .into_body()
            .collect()
            .await
            .map_err(|e| ProxyError::InvalidRequest(format!("Failed to read request body: {}", e)))?
            .to_bytes();

        let upstream_resp = builder
            .body(body_bytes)
            .send()
            .await
            .map_err(|e| ProxyError::ConnectionError {
                upstream: self.base_url.clone(),
                source: e,
            })?;

        let mut response_builder = Response::builder().status(upstream_resp.status());
        for (name, value) in upstream_resp.headers() {
            if !is_hop_by_hop(name) {
                response_builder = response_builder.header(name, value);
            }
        }

        let body_bytes = upstream_resp
            .bytes()
            .await
            .map_err(|e| ProxyError::Internal(format!("Failed to read response body: {}", e)))?;
        Ok(response_builder.body(Body::from(body_bytes))?)
    }
}

/// Axum fallback handler forwarding every request upstream.
pub async fn proxy_handler(
    State(upstream): State<Arc<UpstreamClient>>,
    req: Request<Body>,
) -> Response<Body> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    match upstream.forward(req).await {
        Ok(response) => response,
        Err(err) => {
            tracing::warn!(%method, %path, error = %err, "Upstream request failed");
            err.into_response()
        }
    }
}
