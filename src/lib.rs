pub mod config;
pub mod logging;
pub mod maintenance;
pub mod proxy;
