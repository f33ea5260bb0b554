//! Sandbox scan command

use crate::cli::Cli;
use crate::client::VeracodeClient;
use crate::config::{Environment, RunConfig};
use crate::error::Result;
use crate::scan::{ReleaseBuild, SandboxScan};

/// Resolve the configuration and scan the current directory.
pub async fn run(cli: &Cli, env: &Environment) -> Result<()> {
    let config = RunConfig::resolve(cli.scan_options(), env)?;
    let client = VeracodeClient::with_host(config.credentials.clone(), cli.api_host.clone())?;
    let workspace = std::env::current_dir()?;

    let outcome = SandboxScan::new(&client, &config, workspace).run().await?;

    log::debug!(
        "Scan {} submitted: app {} sandbox {} (created: {}), file {}, {} files archived, {} excluded",
        outcome.scan_version.as_deref().unwrap_or("unknown"),
        outcome.app_id,
        outcome.sandbox_id,
        outcome.sandbox_created,
        outcome.file_id,
        outcome.archive.files,
        outcome.archive.excluded
    );
    if let ReleaseBuild::Fallback { reason } = &outcome.release_build {
        log::debug!("Release build was skipped: {}", reason);
    }

    Ok(())
}
