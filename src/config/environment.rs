//! Configuration sources captured from the process environment
//!
//! The resolver never reads `std::env` itself. `main` captures the process
//! environment once into an [`Environment`] and hands it over, so resolution
//! is a pure function of its inputs.

use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

/// Credential id variable
pub const VERA_ID: &str = "VERA_ID";
/// Credential key variable
pub const VERA_KEY: &str = "VERA_KEY";
/// Application id variable
pub const VERA_APP_ID: &str = "VERA_APP_ID";
/// Application name variable
pub const VERA_APP_NAME: &str = "VERA_APP_NAME";
/// Application version variable
pub const VERA_APP_VERSION: &str = "VERA_APP_VERSION";
/// Sandbox name variable
pub const VERA_SANDBOX_NAME: &str = "VERA_SANDBOX_NAME";
/// Package version exported by npm scripts
pub const NPM_PACKAGE_VERSION: &str = "npm_package_version";
/// Package name exported by npm scripts
pub const NPM_PACKAGE_NAME: &str = "npm_package_name";

/// Overrides the credentials file location
pub const CREDENTIALS_FILE_VAR: &str = "VERACODE_CREDENTIALS_FILE";
/// Selects the credentials file profile
pub const CREDENTIALS_PROFILE_VAR: &str = "VERACODE_API_PROFILE";

const CREDENTIALS_ID_KEY: &str = "veracode_api_key_id";
const CREDENTIALS_SECRET_KEY: &str = "veracode_api_key_secret";

/// API credentials read from a Veracode credentials file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileCredentials {
    pub id: Option<String>,
    pub key: Option<String>,
}

/// Snapshot of the configuration sources available at startup
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: HashMap<String, String>,
    file_credentials: FileCredentials,
}

impl Environment {
    /// Capture the process environment and the credentials file, if any.
    ///
    /// Variables whose name or value is not valid UTF-8 are skipped.
    pub fn from_process() -> Result<Self> {
        Self::from_os_vars(std::env::vars_os())
    }

    fn from_os_vars<I>(os_vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        let vars: HashMap<String, String> = os_vars
            .into_iter()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();

        let path = match vars.get(CREDENTIALS_FILE_VAR).filter(|p| !p.is_empty()) {
            Some(custom) => Some(PathBuf::from(custom)),
            None => default_credentials_path(),
        };
        let profile = vars
            .get(CREDENTIALS_PROFILE_VAR)
            .filter(|p| !p.is_empty())
            .map(String::as_str)
            .unwrap_or("default");

        let file_credentials = match path {
            Some(path) => load_credentials_file(&path, profile)?,
            None => FileCredentials::default(),
        };

        Ok(Self {
            vars,
            file_credentials,
        })
    }

    /// Build an environment from explicit variable pairs.
    #[cfg(test)]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            file_credentials: FileCredentials::default(),
        }
    }

    /// Attach credentials as if they came from a credentials file.
    #[cfg(test)]
    pub fn with_file_credentials(mut self, credentials: FileCredentials) -> Self {
        self.file_credentials = credentials;
        self
    }

    /// Look up a variable, treating empty values as unset.
    pub fn var(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// First non-empty variable among `names`.
    pub fn first_var(&self, names: &[&str]) -> Option<&str> {
        names.iter().find_map(|name| self.var(name))
    }

    pub fn file_credentials(&self) -> &FileCredentials {
        &self.file_credentials
    }
}

/// `~/.veracode/credentials`
fn default_credentials_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".veracode").join("credentials"))
}

/// Read one profile out of a credentials file. A missing file yields no credentials.
pub fn load_credentials_file(path: &Path, profile: &str) -> Result<FileCredentials> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(FileCredentials::default());
        }
        Err(err) => {
            return Err(ConfigError::CredentialsFile {
                path: path.display().to_string(),
                reason: err.to_string(),
            }
            .into());
        }
    };

    log::debug!(
        "Reading credentials profile '{}' from {}",
        profile,
        path.display()
    );
    Ok(parse_credentials(&contents, profile))
}

/// Parse the INI-style credentials format:
///
/// ```text
/// [default]
/// veracode_api_key_id = ...
/// veracode_api_key_secret = ...
/// ```
pub fn parse_credentials(contents: &str, profile: &str) -> FileCredentials {
    let mut credentials = FileCredentials::default();
    let mut in_profile = false;

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(section) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            in_profile = section.trim() == profile;
            continue;
        }

        if !in_profile {
            continue;
        }

        if let Some((key, value)) = line.split_once('=') {
            let value = value.trim().to_string();
            if value.is_empty() {
                continue;
            }
            match key.trim() {
                CREDENTIALS_ID_KEY => credentials.id = Some(value),
                CREDENTIALS_SECRET_KEY => credentials.key = Some(value),
                _ => {}
            }
        }
    }

    credentials
}
