use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Route served with the configured `imageFile` while maintenance is active.
pub const DEFAULT_IMAGE_ROUTE: &str = "/maintenance-image.png";

/// Content type of the default image route.
pub const DEFAULT_IMAGE_CONTENT_TYPE: &str = "image/png";

/// Root configuration container.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub proxy: ProxyConfig,
    #[serde(default)]
    pub maintenance: MaintenanceConfig,
}

/// Settings for the bundled reverse proxy host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Bind address for the local server (host:port).
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Base URL requests are forwarded to when maintenance is off.
    #[serde(default = "default_upstream")]
    pub upstream: String,
    /// Total upstream request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// Options recognized by the maintenance interceptor.
///
/// Keys follow the camelCase names operators already use for this plugin
/// (`triggerFilename`, `httpResponseCode`, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceConfig {
    /// Instance name attached to log events.
    #[serde(default = "default_name")]
    pub name: String,
    /// Master switch. When false, every request goes downstream.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Maintenance page, read once at startup.
    #[serde(default = "default_filename")]
    pub filename: PathBuf,
    /// Marker whose existence turns maintenance mode on.
    #[serde(default = "default_trigger_filename")]
    pub trigger_filename: PathBuf,
    /// Status code sent with the maintenance page.
    #[serde(default = "default_response_code")]
    pub http_response_code: u16,
    /// Content type sent with the maintenance page.
    #[serde(default = "default_content_type")]
    pub http_content_type: String,
    /// Image served at [`DEFAULT_IMAGE_ROUTE`], re-read on every request.
    #[serde(default = "default_image_file", alias = "ImageFile")]
    pub image_file: PathBuf,
    /// Additional URL path to file mappings served while maintenance is active.
    #[serde(default)]
    pub assets: HashMap<String, AssetConfig>,
}

/// A file served at a fixed URL path during maintenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetConfig {
    pub file: PathBuf,
    /// Falls back to a guess from the file extension.
    #[serde(default)]
    pub content_type: Option<String>,
}

impl AssetConfig {
    pub fn content_type(&self) -> String {
        self.content_type
            .clone()
            .unwrap_or_else(|| guess_content_type(&self.file).to_string())
    }
}

fn guess_content_type(file: &std::path::Path) -> &'static str {
    let ext = file
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        Some("ico") => "image/x-icon",
        Some("css") => "text/css",
        Some("js") => "text/javascript",
        Some("html") => "text/html; charset=utf-8",
        _ => "application/octet-stream",
    }
}

fn default_bind_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_upstream() -> String {
    "http://127.0.0.1:3000".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_name() -> String {
    "maintenance".to_string()
}

fn default_enabled() -> bool {
    true
}

fn default_filename() -> PathBuf {
    PathBuf::from("maintenance.html")
}

fn default_trigger_filename() -> PathBuf {
    PathBuf::from("maintenance.trigger")
}

fn default_response_code() -> u16 {
    503
}

fn default_content_type() -> String {
    "text/html; charset=utf-8".to_string()
}

fn default_image_file() -> PathBuf {
    PathBuf::from("maintenance-image.png")
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            upstream: default_upstream(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            enabled: default_enabled(),
            filename: default_filename(),
            trigger_filename: default_trigger_filename(),
            http_response_code: default_response_code(),
            http_content_type: default_content_type(),
            image_file: default_image_file(),
            assets: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_asset_content_type_wins() {
        let asset = AssetConfig {
            file: PathBuf::from("logo.png"),
            content_type: Some("image/custom".to_string()),
        };
        assert_eq!(asset.content_type(), "image/custom");
    }

    #[test]
    fn test_asset_content_type_guessed_from_extension() {
        let cases = [
            ("logo.PNG", "image/png"),
            ("photo.jpeg", "image/jpeg"),
            ("style.css", "text/css"),
            ("font.woff2", "application/octet-stream"),
            ("no_extension", "application/octet-stream"),
        ];
        for (file, expected) in cases {
            let asset = AssetConfig {
                file: PathBuf::from(file),
                content_type: None,
            };
            assert_eq!(asset.content_type(), expected, "file: {}", file);
        }
    }
}
