//! Run configuration for a sandbox scan
//!
//! Precedence is: explicit option > environment > built-in default. Empty
//! strings count as unset at every layer.

pub mod environment;

pub use environment::Environment;

use environment::{
    NPM_PACKAGE_NAME, NPM_PACKAGE_VERSION, VERA_APP_ID, VERA_APP_NAME, VERA_APP_VERSION, VERA_ID,
    VERA_KEY, VERA_SANDBOX_NAME,
};

use crate::error::{ConfigError, Result};

/// Excludes used when none are given
pub const DEFAULT_EXCLUDES: &[&str] = &["node_modules/**/*"];

/// Explicit options, typically from the command line. `None` defers to the environment.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub robot_id: Option<String>,
    pub robot_key: Option<String>,
    pub app_id: Option<String>,
    pub app_name: Option<String>,
    pub app_version: Option<String>,
    pub sandbox_name: Option<String>,
    pub excludes: Option<Vec<String>>,
    pub scan_all_nonfatal_top_level_modules: Option<bool>,
    pub auto_scan: Option<bool>,
}

/// API credentials
#[derive(Clone)]
pub struct Credentials {
    pub id: String,
    pub key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("id", &self.id)
            .field("key", &"<redacted>")
            .finish()
    }
}

/// Fully resolved, immutable run configuration
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub credentials: Credentials,
    pub app_id: Option<String>,
    pub app_name: Option<String>,
    pub app_version: Option<String>,
    pub sandbox_name: Option<String>,
    pub excludes: Vec<String>,
    pub scan_all_nonfatal_top_level_modules: bool,
    pub auto_scan: bool,
}

impl RunConfig {
    /// Merge `options` over `env` and validate the credentials.
    ///
    /// Fails with `MissingRequiredProperty` for `robotId` and then `robotKey`.
    /// The remaining required fields are checked when a scan starts.
    pub fn resolve(options: ScanOptions, env: &Environment) -> Result<Self> {
        let file = env.file_credentials();

        let robot_id = non_empty(options.robot_id)
            .or_else(|| env.var(VERA_ID).map(str::to_string))
            .or_else(|| file.id.clone());
        let robot_key = non_empty(options.robot_key)
            .or_else(|| env.var(VERA_KEY).map(str::to_string))
            .or_else(|| file.key.clone());

        let config = Self {
            credentials: Credentials {
                id: robot_id.unwrap_or_default(),
                key: robot_key.unwrap_or_default(),
            },
            app_id: non_empty(options.app_id).or_else(|| env.var(VERA_APP_ID).map(str::to_string)),
            app_name: non_empty(options.app_name)
                .or_else(|| env.var(VERA_APP_NAME).map(str::to_string)),
            app_version: non_empty(options.app_version).or_else(|| {
                env.first_var(&[VERA_APP_VERSION, NPM_PACKAGE_VERSION])
                    .map(str::to_string)
            }),
            sandbox_name: non_empty(options.sandbox_name).or_else(|| {
                env.first_var(&[VERA_SANDBOX_NAME, NPM_PACKAGE_NAME])
                    .map(str::to_string)
            }),
            excludes: options
                .excludes
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect()),
            scan_all_nonfatal_top_level_modules: options
                .scan_all_nonfatal_top_level_modules
                .unwrap_or(false),
            auto_scan: options.auto_scan.unwrap_or(true),
        };

        config.log_summary();

        require(Some(&config.credentials.id), "robotId")?;
        require(Some(&config.credentials.key), "robotKey")?;

        Ok(config)
    }

    /// Log the resolved properties. The credentials are never logged.
    pub fn log_summary(&self) {
        let unset = "<unset>";
        log::info!("-----");
        log::info!("PROPS");
        log::info!("-----");
        log::info!("appId: {}", self.app_id.as_deref().unwrap_or(unset));
        log::info!("appName: {}", self.app_name.as_deref().unwrap_or(unset));
        log::info!("appVersion: {}", self.app_version.as_deref().unwrap_or(unset));
        log::info!("sandboxName: {}", self.sandbox_name.as_deref().unwrap_or(unset));
        log::info!("excludes: {:?}", self.excludes);
        log::info!(
            "scanAllNonfatalTopLevelModules: {}",
            self.scan_all_nonfatal_top_level_modules
        );
        log::info!("autoScan: {}", self.auto_scan);
        log::info!("-----");
    }
}

/// Return the value if it is set and non-empty, otherwise a named-property error.
pub fn require<'a>(value: Option<&'a String>, name: &'static str) -> Result<&'a str> {
    value
        .map(String::as_str)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ConfigError::MissingRequiredProperty(name).into())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Coerce a command-line string boolean: `"true"` is true, anything else is false.
pub fn parse_flag(value: &str) -> bool {
    value == "true"
}

/// Split a comma-separated exclude list. `\,` is kept as a literal comma
/// inside an entry.
///
/// `"a,b\\,c,d"` yields `["a", "b,c", "d"]`.
pub fn parse_excludes(value: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut chars = value.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&',') => {
                current.push(',');
                chars.next();
            }
            ',' => items.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    items.push(current);

    items
}
