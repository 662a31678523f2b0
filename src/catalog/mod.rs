//! Remote TestGrid catalog
//!
//! The [`Catalog`] trait is the seam between the resolver/downloader and AWS
//! Device Farm. [`DeviceFarmClient`] is the real implementation; tests plug in
//! in-memory catalogs.
//!
//! Request and response types mirror the Device Farm JSON shapes so they can
//! be sent and parsed directly.

mod client;
mod credentials;
mod signing;

pub use client::{DeviceFarmClient, SERVICE_TARGET_PREFIX};
pub use signing::{SigningParams, sign_request};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::pagination::{Page, PageRequest};
use crate::types::{Arn, Artifact, ArtifactCategory, Project, Session};

/// Operations the run needs from the remote catalog
///
/// Implementations must be shareable across concurrently running listings;
/// every call is independent.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// List one page of projects
    async fn list_projects(&self, request: ListProjectsRequest) -> Result<ListProjectsPage>;

    /// Create a project with the given name
    async fn create_project(&self, request: CreateProjectRequest) -> Result<Project>;

    /// List one page of sessions of a project
    async fn list_sessions(&self, request: ListSessionsRequest) -> Result<ListSessionsPage>;

    /// List one page of artifacts of one category of a session
    async fn list_session_artifacts(
        &self,
        request: ListArtifactsRequest,
    ) -> Result<ListArtifactsPage>;
}

/// `ListTestGridProjects` request
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProjectsRequest {
    /// Page size (API default when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_result: Option<u32>,
    /// Continuation token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

/// `ListTestGridProjects` response
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProjectsPage {
    /// Projects on this page
    #[serde(default)]
    pub test_grid_projects: Vec<Project>,
    /// Continuation token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

/// `CreateTestGridProject` request
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    /// Project name
    pub name: String,
    /// Optional description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CreateProjectRequest {
    /// Request creating a project called `name`
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }
}

/// `CreateTestGridProject` response
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectResponse {
    /// The created project
    pub test_grid_project: Project,
}

/// `ListTestGridSessions` request
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSessionsRequest {
    /// Project to list sessions of
    pub project_arn: Arn,
    /// Page size (API default when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_result: Option<u32>,
    /// Continuation token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

impl ListSessionsRequest {
    /// First-page request for every session of `project_arn`
    pub fn for_project(project_arn: Arn) -> Self {
        Self {
            project_arn,
            max_result: None,
            next_token: None,
        }
    }
}

/// `ListTestGridSessions` response
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSessionsPage {
    /// Sessions on this page
    #[serde(default)]
    pub test_grid_sessions: Vec<Session>,
    /// Continuation token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

/// `ListTestGridSessionArtifacts` request
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListArtifactsRequest {
    /// Session to list artifacts of
    pub session_arn: Arn,
    /// Category filter
    #[serde(rename = "type")]
    pub category: ArtifactCategory,
    /// Page size (API default when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_result: Option<u32>,
    /// Continuation token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

impl ListArtifactsRequest {
    /// First-page request for the `category` artifacts of `session_arn`
    pub fn for_session(session_arn: Arn, category: ArtifactCategory) -> Self {
        Self {
            session_arn,
            category,
            max_result: None,
            next_token: None,
        }
    }
}

/// `ListTestGridSessionArtifacts` response
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListArtifactsPage {
    /// Artifacts on this page
    #[serde(default)]
    pub artifacts: Vec<Artifact>,
    /// Continuation token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

impl PageRequest for ListProjectsRequest {
    fn with_next_token(mut self, token: Option<String>) -> Self {
        self.next_token = token;
        self
    }
}

impl Page for ListProjectsPage {
    type Item = Project;

    fn next_token(&self) -> Option<&str> {
        self.next_token.as_deref()
    }

    fn into_items(self) -> Vec<Project> {
        self.test_grid_projects
    }
}

impl PageRequest for ListSessionsRequest {
    fn with_next_token(mut self, token: Option<String>) -> Self {
        self.next_token = token;
        self
    }
}

impl Page for ListSessionsPage {
    type Item = Session;

    fn next_token(&self) -> Option<&str> {
        self.next_token.as_deref()
    }

    fn into_items(self) -> Vec<Session> {
        self.test_grid_sessions
    }
}

impl PageRequest for ListArtifactsRequest {
    fn with_next_token(mut self, token: Option<String>) -> Self {
        self.next_token = token;
        self
    }
}

impl Page for ListArtifactsPage {
    type Item = Artifact;

    fn next_token(&self) -> Option<&str> {
        self.next_token.as_deref()
    }

    fn into_items(self) -> Vec<Artifact> {
        self.artifacts
    }
}
