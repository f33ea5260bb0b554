//! Test fixtures for API model types
//!
//! Import via `use crate::client::fixtures::*` in test modules.

#![allow(dead_code)]

use super::models::{Application, Build, Sandbox};

/// ID assigned to sandboxes created through the mock client
pub const CREATED_SANDBOX_ID: &str = "9876";

/// Build ID of a successful release build
pub const BUILD_ID: &str = "1234";

/// File ID returned by uploads
pub const FILE_ID: &str = "2345";

/// Version label returned by the pre-scan
pub const PRESCAN_VERSION: &str = "Scan Dec 24 2019 (1)";

/// Application named `<name>-<id>`
pub fn app(name: &str, id: u32) -> Application {
    Application {
        id: id.to_string(),
        name: format!("{}-{}", name, id),
    }
}

/// Sandbox named `<name>-<id>`
pub fn sandbox(name: &str, id: u32) -> Sandbox {
    Sandbox {
        id: id.to_string(),
        name: format!("{}-{}", name, id),
    }
}

/// `test-app-1` .. `test-app-3`
pub fn app_list() -> Vec<Application> {
    vec![app("test-app", 1), app("test-app", 2), app("test-app", 3)]
}

/// Three plain sandboxes plus the scoped `@myscope/test-sandbox-44`
pub fn sandbox_list() -> Vec<Sandbox> {
    vec![
        sandbox("test-sandbox", 11),
        sandbox("test-sandbox", 22),
        sandbox("test-sandbox", 33),
        sandbox("@myscope/test-sandbox", 44),
    ]
}

pub fn release_build() -> Build {
    Build {
        id: BUILD_ID.to_string(),
        version: Some("0.1.0".to_string()),
    }
}

pub fn prescan_build() -> Build {
    Build {
        id: BUILD_ID.to_string(),
        version: Some(PRESCAN_VERSION.to_string()),
    }
}
