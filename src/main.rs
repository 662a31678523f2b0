//! testgrid-artifacts step binary
//!
//! Usage:
//!   testgrid-artifacts --mode project --project-arn my-project
//!   testgrid-artifacts --mode artifact --project-arn arn:aws:devicefarm:... --artifact-types ALL
//!
//! Every flag falls back to its GitHub Actions input (`INPUT_MODE`,
//! `INPUT_PROJECT-ARN`, ...), so the binary runs unchanged as a step.

use clap::Parser;
use std::process::ExitCode;

use testgrid_artifacts::actions::{self, Workflow};
use testgrid_artifacts::config::{
    INPUT_ARTIFACT_FOLDER, INPUT_ARTIFACT_TYPES, INPUT_MODE, INPUT_PROJECT_ARN,
};
use testgrid_artifacts::{DeviceFarmClient, HttpFetcher, Result, RunConfig, run};

#[derive(Parser)]
#[command(name = "testgrid-artifacts")]
#[command(about = "Resolve a Device Farm TestGrid project and download its session artifacts")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// What to do: `project` or `artifact`
    #[arg(long)]
    mode: Option<String>,
    /// Project ARN, or the name of a project to find or create
    #[arg(long)]
    project_arn: Option<String>,
    /// Comma-separated artifact types (VIDEO, LOG or ALL)
    #[arg(long)]
    artifact_types: Option<String>,
    /// Folder artifacts are downloaded into
    #[arg(long)]
    artifact_folder: Option<String>,
}

impl Cli {
    /// Flag value, else the step input of the same name
    fn input(flag: Option<String>, name: &str) -> Option<String> {
        flag.filter(|value| !value.trim().is_empty())
            .or_else(|| actions::get_input(name))
    }

    fn into_run_config(self) -> Result<RunConfig> {
        let mode = match self.mode.filter(|value| !value.trim().is_empty()) {
            Some(mode) => mode,
            None => actions::get_required_input(INPUT_MODE)?,
        };
        let project = Self::input(self.project_arn, INPUT_PROJECT_ARN);
        let artifact_types = Self::input(self.artifact_types, INPUT_ARTIFACT_TYPES);
        let artifact_folder = Self::input(self.artifact_folder, INPUT_ARTIFACT_FOLDER);

        Ok(RunConfig::from_inputs(
            &mode,
            project.as_deref(),
            artifact_types.as_deref(),
            artifact_folder.as_deref(),
        ))
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut workflow = Workflow::from_env();

    // AWS settings and credentials load on the first signed call
    let client = DeviceFarmClient::from_env();

    let outcome = match cli.into_run_config() {
        Ok(config) => run(&config, &client, &HttpFetcher::new(), &mut workflow)
            .await
            .map(|report| {
                tracing::debug!(
                    mode = %report.mode,
                    project = %report.project_arn,
                    files = report.downloaded,
                    "run complete"
                );
            }),
        Err(e) => {
            // Setup failures never reach the run, so report them here
            tracing::error!(error = %e, code = e.error_code(), "setup failed");
            if let Err(write_err) = workflow.set_failed(&e.to_string()) {
                tracing::error!(error = %write_err, "failed to report failure");
            }
            Err(e)
        }
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
