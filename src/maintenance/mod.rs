//! Maintenance mode interception.
//!
//! While the trigger file exists (and the interceptor is enabled) every
//! request is answered with the cached maintenance page, except for the
//! configured asset routes, which are served straight from disk. Otherwise
//! requests pass through to the wrapped service untouched.

pub mod error;
pub mod interceptor;
pub mod layer;
pub mod resource;

pub use error::MaintenanceError;
pub use interceptor::{AssetRoute, MaintenanceInterceptor};
pub use layer::{MaintenanceLayer, MaintenanceService};
pub use resource::{LoadOnceResource, PolledResource};
