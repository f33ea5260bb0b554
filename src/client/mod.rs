//! Veracode API client

use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;

pub mod auth;
#[cfg(test)]
pub mod fixtures;
#[cfg(test)]
pub mod mock;
pub mod models;
pub mod veracode;
mod xml;

#[cfg(test)]
pub use mock::MockVeracodeClient;
pub use models::{Application, Build, PrescanOptions, Sandbox, UploadedFile};
pub use veracode::VeracodeClient;

/// Operations a sandbox scan needs from the Veracode platform
#[async_trait]
pub trait VeracodeApi: Send + Sync {
    /// List every application profile visible to the credentials
    async fn list_apps(&self) -> Result<Vec<Application>>;

    /// List the sandboxes of an application, in service order
    async fn list_sandboxes(&self, app_id: &str) -> Result<Vec<Sandbox>>;

    /// Create a sandbox under an application
    async fn create_sandbox(&self, app_id: &str, sandbox_name: &str) -> Result<Sandbox>;

    /// Create a release-versioned build record in a sandbox
    async fn create_build(&self, app_id: &str, sandbox_id: &str, version: &str) -> Result<Build>;

    /// Upload a file into the sandbox's current build
    async fn upload_file(&self, app_id: &str, sandbox_id: &str, file: &Path)
    -> Result<UploadedFile>;

    /// Start the pre-scan of the sandbox's current build
    async fn begin_prescan(
        &self,
        app_id: &str,
        sandbox_id: &str,
        options: &PrescanOptions,
    ) -> Result<Build>;
}
