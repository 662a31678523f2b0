//! One step run: validate inputs, resolve the project, optionally download

use std::io::Write;

use crate::actions::Workflow;
use crate::artifacts::{ArtifactDownloader, ContentFetcher};
use crate::catalog::Catalog;
use crate::config::{Mode, OUTPUT_PROJECT_ARN, RunConfig};
use crate::error::Result;
use crate::resolver::resolve_project;
use crate::types::Arn;

/// Name of the log group wrapping the download phase
pub const DOWNLOAD_GROUP: &str = "Download artifacts";

/// What a successful run did
#[derive(Clone, Debug, PartialEq)]
pub struct RunReport {
    /// Mode the run executed in
    pub mode: Mode,
    /// Resolved project ARN, also published as the `project-arn` output
    pub project_arn: Arn,
    /// Number of artifact files written (0 in project mode)
    pub downloaded: usize,
}

/// Execute a run and report any failure as the step's failure message
///
/// The error is returned unchanged after it has been reported, so the
/// caller only has to pick the exit status.
pub async fn run<W: Write>(
    config: &RunConfig,
    catalog: &dyn Catalog,
    fetcher: &dyn ContentFetcher,
    workflow: &mut Workflow<W>,
) -> Result<RunReport> {
    match execute(config, catalog, fetcher, workflow).await {
        Ok(report) => Ok(report),
        Err(e) => {
            tracing::error!(error = %e, code = e.error_code(), "run failed");
            workflow.set_failed(&e.to_string())?;
            Err(e)
        }
    }
}

/// Execute a run without reporting failures
///
/// The mode is validated before anything else, so an invalid mode makes no
/// remote call.
pub async fn execute<W: Write>(
    config: &RunConfig,
    catalog: &dyn Catalog,
    fetcher: &dyn ContentFetcher,
    workflow: &mut Workflow<W>,
) -> Result<RunReport> {
    let mode = Mode::parse(&config.mode)?;
    let identifier = config.require_project()?;

    let project_arn = resolve_project(catalog, identifier).await?;
    let project_id = project_arn.resource_id().unwrap_or("unknown");
    tracing::info!("Project Id: {project_id}.");
    workflow.set_output(OUTPUT_PROJECT_ARN, project_arn.as_str())?;

    let mut downloaded = 0;
    if mode == Mode::Artifact && !config.artifact_types.is_empty() {
        workflow.start_group(DOWNLOAD_GROUP)?;
        let result = ArtifactDownloader::new(catalog, fetcher, &config.artifact_folder)
            .download(&project_arn, &config.artifact_types)
            .await;
        let closed = workflow.end_group();
        downloaded = result?;
        closed?;
        tracing::info!(
            files = downloaded,
            folder = %config.artifact_folder.display(),
            "artifacts downloaded"
        );
    }

    Ok(RunReport {
        mode,
        project_arn,
        downloaded,
    })
}
