//! Configuration file support.
//!
//! The file is TOML with a `[proxy]` table for the bundled host and a
//! `[maintenance]` table for the interceptor options.

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{
    AssetConfig, Config, MaintenanceConfig, ProxyConfig, DEFAULT_IMAGE_CONTENT_TYPE,
    DEFAULT_IMAGE_ROUTE,
};
