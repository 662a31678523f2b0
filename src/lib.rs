//! # testgrid-artifacts
//!
//! GitHub Actions step for AWS Device Farm TestGrid projects.
//!
//! A run resolves a project input to a project ARN (looking it up by name and
//! creating it when missing), publishes that ARN as the `project-arn` step
//! output and, in `artifact` mode, downloads the video and log artifacts of
//! every session of the project into a local folder.
//!
//! ## Quick Start
//!
//! ```no_run
//! use testgrid_artifacts::{DeviceFarmClient, HttpFetcher, RunConfig, Workflow, run};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RunConfig::from_inputs("artifact", Some("my-project"), Some("ALL"), None);
//!     let client = DeviceFarmClient::from_env();
//!     let fetcher = HttpFetcher::new();
//!
//!     let report = run(&config, &client, &fetcher, &mut Workflow::from_env()).await?;
//!     println!("{} files for {}", report.downloaded, report.project_arn);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// GitHub Actions inputs, outputs and workflow commands
pub mod actions;
/// Session artifact download
pub mod artifacts;
/// Device Farm catalog access
pub mod catalog;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Token-paginated listings as streams
pub mod pagination;
/// Project ARN resolution
pub mod resolver;
/// Step run orchestration
pub mod runner;
/// Core types
pub mod types;

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;

// Re-export commonly used types
pub use actions::Workflow;
pub use artifacts::{ArtifactDownloader, ContentFetcher, HttpFetcher, download_artifacts};
pub use catalog::{Catalog, DeviceFarmClient};
pub use config::{AwsConfig, CredentialSource, Credentials, Mode, RunConfig};
pub use error::{Error, Result};
pub use resolver::resolve_project;
pub use runner::{RunReport, execute, run};
pub use types::{Arn, Artifact, ArtifactCategory, Project, SeleniumProperties, Session};
