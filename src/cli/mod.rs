//! CLI definitions and handlers

use clap::Parser;

use crate::config::{ScanOptions, parse_excludes, parse_flag};

pub mod sandbox;

/// Veracode sandbox scan connector
///
/// Uploads the current directory to a Veracode sandbox and starts the
/// pre-scan. Credentials and application defaults come from VERA_ID,
/// VERA_KEY, VERA_APP_ID, VERA_APP_NAME, VERA_APP_VERSION (or
/// npm_package_version) and VERA_SANDBOX_NAME (or npm_package_name).
#[derive(Parser, Debug)]
#[command(name = "verascan")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Scan the current directory in a sandbox
    #[arg(long)]
    pub sandbox: bool,

    /// Application ID (skips the lookup by name)
    #[arg(long = "app-id", visible_alias = "appId")]
    pub app_id: Option<String>,

    /// Application name, used to look up the ID
    #[arg(long = "app-name", visible_alias = "appName")]
    pub app_name: Option<String>,

    /// Release version for the build
    #[arg(long = "app-version", visible_alias = "appVersion")]
    pub app_version: Option<String>,

    /// Sandbox name
    #[arg(long = "sandbox-name", visible_alias = "sandboxName")]
    pub sandbox_name: Option<String>,

    /// Comma-separated exclude globs; escape a literal comma as \,
    #[arg(long)]
    pub excludes: Option<String>,

    /// Scan all non-fatal top-level modules ("true" enables)
    #[arg(
        long = "scan-all-nonfatal-top-level-modules",
        visible_alias = "scanAllNonfatalTopLevelModules",
        value_name = "BOOL"
    )]
    pub scan_all_nonfatal_top_level_modules: Option<String>,

    /// Start the full scan once the pre-scan succeeds ("true" enables)
    #[arg(long = "auto-scan", visible_alias = "autoScan", value_name = "BOOL")]
    pub auto_scan: Option<String>,

    /// Override the Veracode API host
    #[arg(long, env = "VERACODE_API_HOST", hide_env = true)]
    pub api_host: Option<String>,

    /// Enable debug logging
    #[arg(long, env = "VERASCAN_DEBUG", hide_env = true)]
    pub debug: bool,
}

impl Cli {
    /// Explicit scan options given on the command line
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            app_id: self.app_id.clone(),
            app_name: self.app_name.clone(),
            app_version: self.app_version.clone(),
            sandbox_name: self.sandbox_name.clone(),
            excludes: self
                .excludes
                .as_deref()
                .filter(|e| !e.is_empty())
                .map(parse_excludes),
            scan_all_nonfatal_top_level_modules: self
                .scan_all_nonfatal_top_level_modules
                .as_deref()
                .map(parse_flag),
            auto_scan: self.auto_scan.as_deref().map(parse_flag),
            ..Default::default()
        }
    }
}
