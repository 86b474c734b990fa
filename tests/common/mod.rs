//! Shared test utilities and fixtures.

#![allow(dead_code)]

pub mod mock_backend;

use std::net::TcpListener;
use std::path::{Path, PathBuf};

use maintenance_gate::config::MaintenanceConfig;
use tempfile::TempDir;

/// A 1x1 PNG image.
pub const PNG_BYTES: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// Files for one interceptor instance, living in a temp dir.
pub struct Fixture {
    pub dir: TempDir,
    pub config: MaintenanceConfig,
}

impl Fixture {
    /// Page contains `<h1>down</h1>`; no trigger and no image yet.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let page = dir.path().join("maintenance.html");
        std::fs::write(&page, "<h1>down</h1>").expect("Failed to write page");

        let config = MaintenanceConfig {
            name: "test-maintenance".to_string(),
            enabled: true,
            filename: page,
            trigger_filename: dir.path().join("maintenance.trigger"),
            http_response_code: 503,
            http_content_type: "text/html; charset=utf-8".to_string(),
            image_file: dir.path().join("maintenance-image.png"),
            ..MaintenanceConfig::default()
        };

        Self { dir, config }
    }

    pub fn disabled(mut self) -> Self {
        self.config.enabled = false;
        self
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn trigger(&self) -> PathBuf {
        self.config.trigger_filename.clone()
    }

    pub fn create_trigger(&self) {
        std::fs::write(self.trigger(), "").expect("Failed to create trigger");
    }

    pub fn remove_trigger(&self) {
        std::fs::remove_file(self.trigger()).expect("Failed to remove trigger");
    }

    pub fn write_image(&self, bytes: &[u8]) {
        std::fs::write(&self.config.image_file, bytes).expect("Failed to write image");
    }

    pub fn rewrite_page(&self, contents: &str) {
        std::fs::write(&self.config.filename, contents).expect("Failed to rewrite page");
    }
}

/// Find an available port for testing.
pub fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind to free port");
    listener.local_addr().unwrap().port()
}
