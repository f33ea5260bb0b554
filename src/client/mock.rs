//! Mock Veracode API client for testing
//!
//! Provides a deterministic in-memory implementation of [`VeracodeApi`] for
//! unit tests without making real API calls.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::VeracodeApi;
use super::fixtures;
use super::models::{Application, Build, PrescanOptions, Sandbox, UploadedFile};
use crate::error::{ApiError, Result};

/// API operations, used to script failures and read call counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Call {
    ListApps,
    ListSandboxes,
    CreateSandbox,
    CreateBuild,
    UploadFile,
    BeginPrescan,
}

/// Mock API client for testing.
///
/// # Example
/// ```ignore
/// let mock = MockVeracodeClient::new()
///     .with_sandboxes(fixtures::sandbox_list())
///     .await
///     .with_failure(Call::CreateBuild, ApiError::Remote("exists".into()))
///     .await;
/// ```
pub struct MockVeracodeClient {
    /// Applications to return from list_apps
    apps: Arc<Mutex<Vec<Application>>>,
    /// Sandboxes to return from list_sandboxes
    sandboxes: Arc<Mutex<Vec<Sandbox>>>,
    /// Sandbox ID assigned by create_sandbox
    created_sandbox_id: Arc<Mutex<String>>,
    /// Build to return from create_build
    build: Arc<Mutex<Build>>,
    /// File ID to return from upload_file
    file_id: Arc<Mutex<String>>,
    /// Build to return from begin_prescan
    prescan: Arc<Mutex<Build>>,
    /// Scripted failures, consumed on first use
    failures: Arc<Mutex<HashMap<Call, ApiError>>>,
    /// Calls in the order they were made
    calls: Arc<Mutex<Vec<CapturedCall>>>,
    /// Uploads, with the archive entries seen at upload time
    uploads: Arc<Mutex<Vec<CapturedUpload>>>,
}

impl Default for MockVeracodeClient {
    fn default() -> Self {
        Self {
            apps: Arc::new(Mutex::new(Vec::new())),
            sandboxes: Arc::new(Mutex::new(Vec::new())),
            created_sandbox_id: Arc::new(Mutex::new(fixtures::CREATED_SANDBOX_ID.to_string())),
            build: Arc::new(Mutex::new(fixtures::release_build())),
            file_id: Arc::new(Mutex::new(fixtures::FILE_ID.to_string())),
            prescan: Arc::new(Mutex::new(fixtures::prescan_build())),
            failures: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            uploads: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

/// A recorded API call with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedCall {
    pub call: Call,
    pub args: Vec<String>,
}

/// A recorded upload.
#[derive(Debug, Clone)]
pub struct CapturedUpload {
    pub app_id: String,
    pub sandbox_id: String,
    pub file_name: String,
    /// Entry names of the zip archive, sorted
    pub entries: Vec<String>,
}

impl MockVeracodeClient {
    /// Create a new mock client with empty listings and fixture responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure applications to return from list_apps.
    pub async fn with_apps(self, apps: Vec<Application>) -> Self {
        *self.apps.lock().await = apps;
        self
    }

    /// Configure sandboxes to return from list_sandboxes.
    pub async fn with_sandboxes(self, sandboxes: Vec<Sandbox>) -> Self {
        *self.sandboxes.lock().await = sandboxes;
        self
    }

    /// Configure the ID assigned to a created sandbox.
    pub async fn with_created_sandbox_id(self, id: impl Into<String>) -> Self {
        *self.created_sandbox_id.lock().await = id.into();
        self
    }

    /// Configure the build returned by begin_prescan.
    pub async fn with_prescan(self, build: Build) -> Self {
        *self.prescan.lock().await = build;
        self
    }

    /// Make the next call of `call` fail with `error`.
    pub async fn with_failure(self, call: Call, error: ApiError) -> Self {
        self.failures.lock().await.insert(call, error);
        self
    }

    /// All calls made so far, in order.
    pub async fn calls(&self) -> Vec<CapturedCall> {
        self.calls.lock().await.clone()
    }

    /// Number of times `call` was made.
    pub async fn call_count(&self, call: Call) -> usize {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|c| c.call == call)
            .count()
    }

    /// All uploads made so far.
    pub async fn uploads(&self) -> Vec<CapturedUpload> {
        self.uploads.lock().await.clone()
    }

    /// Record the call, then return its scripted failure if there is one.
    async fn record(&self, call: Call, args: &[&str]) -> Result<()> {
        self.calls.lock().await.push(CapturedCall {
            call,
            args: args.iter().map(|a| a.to_string()).collect(),
        });

        match self.failures.lock().await.remove(&call) {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl VeracodeApi for MockVeracodeClient {
    async fn list_apps(&self) -> Result<Vec<Application>> {
        self.record(Call::ListApps, &[]).await?;
        Ok(self.apps.lock().await.clone())
    }

    async fn list_sandboxes(&self, app_id: &str) -> Result<Vec<Sandbox>> {
        self.record(Call::ListSandboxes, &[app_id]).await?;
        Ok(self.sandboxes.lock().await.clone())
    }

    async fn create_sandbox(&self, app_id: &str, sandbox_name: &str) -> Result<Sandbox> {
        self.record(Call::CreateSandbox, &[app_id, sandbox_name])
            .await?;

        let sandbox = Sandbox {
            id: self.created_sandbox_id.lock().await.clone(),
            name: sandbox_name.to_string(),
        };
        self.sandboxes.lock().await.push(sandbox.clone());
        Ok(sandbox)
    }

    async fn create_build(&self, app_id: &str, sandbox_id: &str, version: &str) -> Result<Build> {
        self.record(Call::CreateBuild, &[app_id, sandbox_id, version])
            .await?;
        Ok(self.build.lock().await.clone())
    }

    async fn upload_file(
        &self,
        app_id: &str,
        sandbox_id: &str,
        file: &Path,
    ) -> Result<UploadedFile> {
        let path = file.to_string_lossy();
        self.record(Call::UploadFile, &[app_id, sandbox_id, &*path])
            .await?;

        let archive = zip::ZipArchive::new(std::fs::File::open(file)?)?;
        let mut entries: Vec<String> = archive.file_names().map(str::to_string).collect();
        entries.sort();

        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.uploads.lock().await.push(CapturedUpload {
            app_id: app_id.to_string(),
            sandbox_id: sandbox_id.to_string(),
            file_name: file_name.clone(),
            entries,
        });

        Ok(UploadedFile {
            id: self.file_id.lock().await.clone(),
            name: file_name,
            status: Some("Uploaded".to_string()),
        })
    }

    async fn begin_prescan(
        &self,
        app_id: &str,
        sandbox_id: &str,
        options: &PrescanOptions,
    ) -> Result<Build> {
        let auto_scan = options.auto_scan.to_string();
        let scan_all = options.scan_all_nonfatal_top_level_modules.to_string();
        self.record(
            Call::BeginPrescan,
            &[app_id, sandbox_id, auto_scan.as_str(), scan_all.as_str()],
        )
        .await?;
        Ok(self.prescan.lock().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_returns_configured_apps() {
        let mock = MockVeracodeClient::new()
            .with_apps(fixtures::app_list())
            .await;

        let apps = mock.list_apps().await.unwrap();

        assert_eq!(apps.len(), 3);
        assert_eq!(mock.call_count(Call::ListApps).await, 1);
    }

    #[tokio::test]
    async fn test_mock_failure_is_consumed() {
        let mock = MockVeracodeClient::new()
            .with_failure(Call::CreateBuild, ApiError::Remote("exists".into()))
            .await;

        assert!(mock.create_build("1", "2", "v").await.is_err());
        assert!(mock.create_build("1", "2", "v").await.is_ok());
        assert_eq!(mock.call_count(Call::CreateBuild).await, 2);
    }

    #[tokio::test]
    async fn test_mock_create_sandbox_uses_configured_id() {
        let mock = MockVeracodeClient::new()
            .with_created_sandbox_id("555")
            .await;

        let sandbox = mock.create_sandbox("1", "fresh").await.unwrap();

        assert_eq!(sandbox.id, "555");
        assert_eq!(sandbox.name, "fresh");
        assert_eq!(mock.list_sandboxes("1").await.unwrap(), vec![sandbox]);
    }
}
