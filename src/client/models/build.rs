//! Build (scan record) models

use serde::Deserialize;

/// Build record returned by `createbuild.do` and `beginprescan.do`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Build {
    /// Build ID
    #[serde(rename = "@build_id")]
    pub id: String,

    /// Version label, assigned by the service for auto-versioned scans
    #[serde(rename = "@version", default)]
    pub version: Option<String>,
}

/// `<buildinfo>` response document
#[derive(Debug, Clone, Deserialize)]
pub struct BuildInfo {
    pub build: Build,
}

/// Options passed to `beginprescan.do`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrescanOptions {
    /// Start the full scan as soon as the pre-scan succeeds
    pub auto_scan: bool,

    /// Select every non-fatal top-level module for scanning
    pub scan_all_nonfatal_top_level_modules: bool,
}
