//! Configuration types for testgrid-artifacts
//!
//! Two groups of settings:
//! - [`RunConfig`] - the step inputs (mode, project, artifact types, folder)
//! - [`AwsConfig`] - where and as whom to call Device Farm, read from the
//!   standard AWS environment variables

use std::path::PathBuf;
use url::Url;

use crate::error::{Error, Result};

/// Name of the mode input
pub const INPUT_MODE: &str = "mode";
/// Name of the project input
pub const INPUT_PROJECT_ARN: &str = "project-arn";
/// Name of the artifact types input
pub const INPUT_ARTIFACT_TYPES: &str = "artifact-types";
/// Name of the artifact folder input
pub const INPUT_ARTIFACT_FOLDER: &str = "artifact-folder";
/// Name of the step output carrying the resolved project ARN
pub const OUTPUT_PROJECT_ARN: &str = "project-arn";

/// What the run does after resolving the project
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Resolve (or create) the project and report its ARN
    Project,
    /// Resolve the project, then download session artifacts
    Artifact,
}

impl Mode {
    /// Every accepted mode value
    pub const VALID: [&'static str; 2] = ["project", "artifact"];

    /// Parse a mode input, case-insensitively
    pub fn parse(raw: &str) -> Result<Self> {
        let mode = raw.trim().to_lowercase();
        match mode.as_str() {
            "project" => Ok(Mode::Project),
            "artifact" => Ok(Mode::Artifact),
            _ => Err(Error::config(
                INPUT_MODE,
                format!(
                    "The mode specified: \"{mode}\", is invalid, please retry with a valid mode: [{}]",
                    Self::VALID.join(",")
                ),
            )),
        }
    }

    /// Input value of this mode
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Project => "project",
            Mode::Artifact => "artifact",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Step inputs, normalized
///
/// The mode is kept as given: validating it is the run's first step, so an
/// invalid value is reported the same way as any other failure.
#[derive(Clone, Debug, PartialEq)]
pub struct RunConfig {
    /// Raw mode input
    pub mode: String,
    /// Project ARN or project name (required, checked by the run)
    pub project: Option<String>,
    /// Requested artifact types, trimmed, empties dropped
    pub artifact_types: Vec<String>,
    /// Root folder for downloaded artifacts (default: "artifacts")
    pub artifact_folder: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Project.as_str().to_string(),
            project: None,
            artifact_types: Vec::new(),
            artifact_folder: default_artifact_folder(),
        }
    }
}

impl RunConfig {
    /// Build a config from raw input strings
    ///
    /// Blank inputs count as not supplied, the way the Actions runner passes
    /// them.
    pub fn from_inputs(
        mode: &str,
        project: Option<&str>,
        artifact_types: Option<&str>,
        artifact_folder: Option<&str>,
    ) -> Self {
        let project = project
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(String::from);
        let artifact_folder = artifact_folder
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_artifact_folder);

        Self {
            mode: mode.to_string(),
            project,
            artifact_types: artifact_types.map(parse_artifact_types).unwrap_or_default(),
            artifact_folder,
        }
    }

    /// The project input, or the error the run reports when it is missing
    pub fn require_project(&self) -> Result<&str> {
        self.project.as_deref().ok_or_else(|| {
            Error::config(
                INPUT_PROJECT_ARN,
                format!("Input required and not supplied: {INPUT_PROJECT_ARN}"),
            )
        })
    }
}

/// Split a comma-separated artifact type list, trimming entries and dropping
/// empty ones
pub fn parse_artifact_types(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .collect()
}

/// Static AWS credentials
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Access key id
    pub access_key_id: String,
    /// Secret access key
    pub secret_access_key: String,
    /// Session token for temporary credentials
    pub session_token: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// Where signed calls get their credentials from
#[derive(Clone, Debug, Default, PartialEq)]
pub enum CredentialSource {
    /// The AWS default provider chain: environment, shared config and
    /// credentials files (`AWS_PROFILE`), web identity token, container and
    /// instance metadata roles
    #[default]
    DefaultChain,
    /// Fixed credentials
    Static(Credentials),
    /// No credentials; every signed call fails
    Disabled,
}

/// Device Farm connection settings
#[derive(Clone, Debug, PartialEq)]
pub struct AwsConfig {
    /// Region to call (default: "us-west-2", the only Device Farm region)
    pub region: String,
    /// Endpoint override (default: the regional Device Farm endpoint)
    pub endpoint: Option<Url>,
    /// Credential source; consulted only when a signed call is made
    pub credentials: CredentialSource,
    /// Page size for listings (None = API default)
    pub max_results: Option<u32>,
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            endpoint: None,
            credentials: CredentialSource::default(),
            max_results: None,
        }
    }
}

impl AwsConfig {
    /// Read settings from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, using the standard AWS variable names
    ///
    /// - `AWS_REGION`, then `AWS_DEFAULT_REGION`
    /// - `AWS_ENDPOINT_URL_DEVICE_FARM`, then `AWS_ENDPOINT_URL`
    /// - `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`, `AWS_SESSION_TOKEN` as
    ///   static credentials when both keys are set, else the default chain
    /// - `TESTGRID_MAX_RESULTS` (listing page size)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let region = get("AWS_REGION")
            .or_else(|| get("AWS_DEFAULT_REGION"))
            .unwrap_or_else(default_region);

        let endpoint = get("AWS_ENDPOINT_URL_DEVICE_FARM")
            .or_else(|| get("AWS_ENDPOINT_URL"))
            .map(|raw| {
                Url::parse(raw.trim()).map_err(|e| {
                    Error::config("endpoint", format!("invalid endpoint URL '{raw}': {e}"))
                })
            })
            .transpose()?;

        let credentials = match (get("AWS_ACCESS_KEY_ID"), get("AWS_SECRET_ACCESS_KEY")) {
            (Some(access_key_id), Some(secret_access_key)) => {
                CredentialSource::Static(Credentials {
                    access_key_id,
                    secret_access_key,
                    session_token: get("AWS_SESSION_TOKEN"),
                })
            }
            _ => CredentialSource::DefaultChain,
        };

        let max_results = get("TESTGRID_MAX_RESULTS")
            .map(|raw| {
                raw.trim().parse::<u32>().map_err(|e| {
                    Error::config("max_results", format!("invalid page size '{raw}': {e}"))
                })
            })
            .transpose()?;

        Ok(Self {
            region,
            endpoint,
            credentials,
            max_results,
        })
    }

    /// Endpoint to send requests to
    pub fn endpoint_url(&self) -> Result<Url> {
        match &self.endpoint {
            Some(url) => Ok(url.clone()),
            None => {
                let raw = format!("https://devicefarm.{}.amazonaws.com/", self.region);
                Url::parse(&raw).map_err(|e| {
                    Error::config("region", format!("invalid region '{}': {e}", self.region))
                })
            }
        }
    }
}

fn default_artifact_folder() -> PathBuf {
    PathBuf::from("artifacts")
}

fn default_region() -> String {
    "us-west-2".to_string()
}
