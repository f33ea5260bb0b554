//! Sandbox scan orchestration
//!
//! A run is a fixed sequence: resolve the application, resolve or create the
//! sandbox, try a release-versioned build, upload the packaged workspace and
//! begin the pre-scan. Only the release-build step may fail without aborting.

use std::path::{Path, PathBuf};

use crate::archive::{self, ArchiveSummary};
use crate::client::{PrescanOptions, VeracodeApi};
use crate::config::{RunConfig, require};
use crate::error::{Error, Result};

/// Result of the release-build attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseBuild {
    /// A build was created for the configured version
    Created { build_id: String },
    /// Creation was rejected; the scan continues auto-versioned
    Fallback { reason: String },
}

/// What a completed run did
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub app_id: String,
    pub sandbox_id: String,
    pub sandbox_created: bool,
    pub release_build: ReleaseBuild,
    pub archive: ArchiveSummary,
    pub file_id: String,
    pub scan_version: Option<String>,
}

/// Identifiers accumulated while a run progresses
struct ScanContext {
    app_id: String,
    sandbox_id: String,
    sandbox_created: bool,
}

/// One sandbox scan of a workspace directory
pub struct SandboxScan<'a, C: VeracodeApi + ?Sized> {
    client: &'a C,
    config: &'a RunConfig,
    workspace: PathBuf,
    archive_dir: PathBuf,
}

impl<'a, C: VeracodeApi + ?Sized> SandboxScan<'a, C> {
    /// Scan `workspace`, writing the archive to the platform temp directory.
    pub fn new(client: &'a C, config: &'a RunConfig, workspace: impl Into<PathBuf>) -> Self {
        Self {
            client,
            config,
            workspace: workspace.into(),
            archive_dir: std::env::temp_dir(),
        }
    }

    /// Write the archive somewhere other than the temp directory.
    #[cfg(test)]
    pub fn archive_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.archive_dir = dir.into();
        self
    }

    /// Execute the run.
    pub async fn run(&self) -> Result<ScanOutcome> {
        let app_version = require(self.config.app_version.as_ref(), "appVersion")?;
        let sandbox_name = require(self.config.sandbox_name.as_ref(), "sandboxName")?;

        let app_id = self.resolve_app_id().await?;
        log::info!("Using appId: {}", app_id);

        let context = self.resolve_sandbox(app_id, sandbox_name).await?;

        log::info!(
            "Setting up new scan for {}, sandbox_id: {}",
            sandbox_name,
            context.sandbox_id
        );
        let release_build = self
            .attempt_release_build(&context, sandbox_name, app_version)
            .await;

        let archive_path = archive_path(&self.archive_dir, sandbox_name);
        let archive = self.package(&archive_path).await?;
        let uploaded = self
            .client
            .upload_file(&context.app_id, &context.sandbox_id, &archive_path)
            .await;
        if let Err(err) = std::fs::remove_file(&archive_path) {
            log::debug!("Could not remove {}: {}", archive_path.display(), err);
        }
        let file_id = uploaded?.id;
        log::info!("New File ID: {}", file_id);

        let prescan = self
            .client
            .begin_prescan(
                &context.app_id,
                &context.sandbox_id,
                &PrescanOptions {
                    auto_scan: self.config.auto_scan,
                    scan_all_nonfatal_top_level_modules: self
                        .config
                        .scan_all_nonfatal_top_level_modules,
                },
            )
            .await?;
        log::info!(
            "New Scan Version: {}",
            prescan.version.as_deref().unwrap_or("unknown")
        );

        Ok(ScanOutcome {
            app_id: context.app_id,
            sandbox_id: context.sandbox_id,
            sandbox_created: context.sandbox_created,
            release_build,
            archive,
            file_id,
            scan_version: prescan.version,
        })
    }

    /// Configured app id, or the id of the first app whose name matches exactly.
    async fn resolve_app_id(&self) -> Result<String> {
        let mut app_id = self.config.app_id.clone().filter(|id| !id.is_empty());

        if app_id.is_none() {
            if let Some(app_name) = self.config.app_name.as_deref().filter(|n| !n.is_empty()) {
                app_id = self
                    .client
                    .list_apps()
                    .await?
                    .into_iter()
                    .find(|app| app.name == app_name)
                    .map(|app| app.id);
            }
        }

        Ok(require(app_id.as_ref(), "appId")?.to_string())
    }

    /// Adopt the first sandbox named exactly `sandbox_name`, creating it on a miss.
    async fn resolve_sandbox(&self, app_id: String, sandbox_name: &str) -> Result<ScanContext> {
        let existing = self
            .client
            .list_sandboxes(&app_id)
            .await?
            .into_iter()
            .find(|sandbox| sandbox.name == sandbox_name);

        let (sandbox_id, sandbox_created) = match existing {
            Some(sandbox) => (sandbox.id, false),
            None => {
                log::info!("Need to setup new sandbox for {}", sandbox_name);
                let sandbox = self.client.create_sandbox(&app_id, sandbox_name).await?;
                log::info!("New sandbox created, id: {}", sandbox.id);
                (sandbox.id, true)
            }
        };

        Ok(ScanContext {
            app_id,
            sandbox_id,
            sandbox_created,
        })
    }

    /// Any rejection here falls back to an auto-versioned scan.
    async fn attempt_release_build(
        &self,
        context: &ScanContext,
        sandbox_name: &str,
        app_version: &str,
    ) -> ReleaseBuild {
        match self
            .client
            .create_build(&context.app_id, &context.sandbox_id, app_version)
            .await
        {
            Ok(build) => {
                log::info!("New Build ID: {}", build.id);
                ReleaseBuild::Created { build_id: build.id }
            }
            Err(err) => {
                log::warn!(
                    "Failed to create a new release-versioned scan for {}; {}",
                    sandbox_name,
                    err
                );
                log::warn!("> Will try to scan as an auto-versioned scan...");
                ReleaseBuild::Fallback {
                    reason: err.to_string(),
                }
            }
        }
    }

    /// Zip the workspace on the blocking pool.
    async fn package(&self, dest: &Path) -> Result<ArchiveSummary> {
        let source = self.workspace.clone();
        let dest = dest.to_path_buf();
        let excludes = self.config.excludes.clone();

        tokio::task::spawn_blocking(move || archive::create_zip_archive(&source, &dest, &excludes))
            .await
            .map_err(|e| Error::Archive(format!("archive task failed: {}", e)))?
    }
}

/// Archive file name: the sandbox name with every non-word character removed.
pub fn archive_file_name(sandbox_name: &str) -> String {
    let stem: String = sandbox_name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();

    if stem.is_empty() {
        "workspace.zip".to_string()
    } else {
        format!("{}.zip", stem)
    }
}

/// Deterministic archive location for a sandbox under `dir`
pub fn archive_path(dir: &Path, sandbox_name: &str) -> PathBuf {
    dir.join(archive_file_name(sandbox_name))
}
