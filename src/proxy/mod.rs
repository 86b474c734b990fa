//! A small reverse proxy that hosts the maintenance layer.
//!
//! Requests go through [`crate::maintenance::MaintenanceLayer`] first and
//! are forwarded to the configured upstream when maintenance is off.

pub mod error;
pub mod server;
pub mod shutdown;
pub mod upstream;

pub use error::ProxyError;
pub use server::{build_router, GateHandle, GateServer};
pub use shutdown::ShutdownManager;
pub use upstream::UpstreamClient;
