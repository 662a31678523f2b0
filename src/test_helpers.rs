//! Shared test helpers: an in-memory catalog and fetcher that record every call.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::artifacts::ContentFetcher;
use crate::catalog::{
    Catalog, CreateProjectRequest, ListArtifactsPage, ListArtifactsRequest, ListProjectsPage,
    ListProjectsRequest, ListSessionsPage, ListSessionsRequest,
};
use crate::error::{Error, Result};
use crate::types::{Arn, Artifact, Project, Session};

/// A call received by [`FakeCatalog`]
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Call {
    ListProjects { token: Option<String> },
    CreateProject { name: String },
    ListSessions { project: Arn, token: Option<String> },
    ListArtifacts { session: Arn, category: String, token: Option<String> },
}

/// In-memory catalog
///
/// Listings are served as pages; the continuation token is the index of the
/// next page.
#[derive(Default)]
pub(crate) struct FakeCatalog {
    pub(crate) project_pages: Vec<Vec<Project>>,
    pub(crate) session_pages: Vec<Vec<Session>>,
    /// Keyed by (session ARN, category)
    pub(crate) artifact_pages: HashMap<(String, String), Vec<Vec<Artifact>>>,
    /// Message of a remote error returned by every session listing
    session_error: Option<String>,
    /// Message of a remote error returned by every artifact listing
    artifact_error: Option<String>,
    calls: Mutex<Vec<Call>>,
}

impl FakeCatalog {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_project_pages(mut self, pages: Vec<Vec<Project>>) -> Self {
        self.project_pages = pages;
        self
    }

    pub(crate) fn with_session_pages(mut self, pages: Vec<Vec<Session>>) -> Self {
        self.session_pages = pages;
        self
    }

    pub(crate) fn with_artifact_pages(
        mut self,
        session: &Session,
        category: &str,
        pages: Vec<Vec<Artifact>>,
    ) -> Self {
        self.artifact_pages
            .insert((session.arn.0.clone(), category.to_string()), pages);
        self
    }

    pub(crate) fn with_session_error(mut self, message: &str) -> Self {
        self.session_error = Some(message.to_string());
        self
    }

    pub(crate) fn with_artifact_error(mut self, message: &str) -> Self {
        self.artifact_error = Some(message.to_string());
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| matches(c)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

/// Page `token` of `pages` plus the token of the page after it
fn serve<T: Clone>(pages: &[Vec<T>], token: Option<&str>) -> (Vec<T>, Option<String>) {
    let index: usize = token.map(|t| t.parse().unwrap()).unwrap_or(0);
    let items = pages.get(index).cloned().unwrap_or_default();
    let next = (index + 1 < pages.len()).then(|| (index + 1).to_string());
    (items, next)
}

fn remote(message: &str) -> Error {
    Error::Remote {
        code: "ArgumentException".into(),
        message: message.into(),
        status: 400,
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn list_projects(&self, request: ListProjectsRequest) -> Result<ListProjectsPage> {
        self.record(Call::ListProjects {
            token: request.next_token.clone(),
        });
        let (test_grid_projects, next_token) =
            serve(&self.project_pages, request.next_token.as_deref());
        Ok(ListProjectsPage {
            test_grid_projects,
            next_token,
        })
    }

    async fn create_project(&self, request: CreateProjectRequest) -> Result<Project> {
        self.record(Call::CreateProject {
            name: request.name.clone(),
        });
        Ok(project(
            &format!("arn:aws:devicefarm:us-west-2:account-d:testgrid-project:{}", request.name),
            &request.name,
        ))
    }

    async fn list_sessions(&self, request: ListSessionsRequest) -> Result<ListSessionsPage> {
        self.record(Call::ListSessions {
            project: request.project_arn.clone(),
            token: request.next_token.clone(),
        });
        if let Some(message) = &self.session_error {
            return Err(remote(message));
        }
        let (test_grid_sessions, next_token) =
            serve(&self.session_pages, request.next_token.as_deref());
        Ok(ListSessionsPage {
            test_grid_sessions,
            next_token,
        })
    }

    async fn list_session_artifacts(
        &self,
        request: ListArtifactsRequest,
    ) -> Result<ListArtifactsPage> {
        self.record(Call::ListArtifacts {
            session: request.session_arn.clone(),
            category: request.category.to_string(),
            token: request.next_token.clone(),
        });
        // Let sibling listings interleave
        tokio::task::yield_now().await;
        if let Some(message) = &self.artifact_error {
            return Err(remote(message));
        }
        let key = (request.session_arn.0.clone(), request.category.to_string());
        let pages = self.artifact_pages.get(&key).cloned().unwrap_or_default();
        let (artifacts, next_token) = serve(&pages, request.next_token.as_deref());
        Ok(ListArtifactsPage {
            artifacts,
            next_token,
        })
    }
}

/// Serves fixed bodies by URL and records every fetch
#[derive(Default)]
pub(crate) struct StaticFetcher {
    bodies: HashMap<String, Vec<u8>>,
    fetched: Mutex<Vec<String>>,
}

impl StaticFetcher {
    pub(crate) fn with(mut self, url: &str, body: &[u8]) -> Self {
        self.bodies.insert(url.to_string(), body.to_vec());
        self
    }

    pub(crate) fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.fetched.lock().unwrap().push(url.to_string());
        self.bodies.get(url).cloned().ok_or_else(|| Error::Fetch {
            status: 404,
            url: url.to_string(),
        })
    }
}

pub(crate) fn project(arn: &str, name: &str) -> Project {
    Project {
        arn: Arn::from(arn),
        name: name.to_string(),
        description: None,
        created: None,
    }
}

pub(crate) fn session(session_id: &str, browser: &str, version: &str, platform: &str) -> Session {
    Session {
        arn: Arn::new(format!(
            "arn:aws:devicefarm:us-west-2:account-id:testgrid-session:project-id/{session_id}"
        )),
        selenium_properties: serde_json::json!({
            "browser": browser,
            "browserVersion": version,
            "platform": platform,
        })
        .to_string(),
        status: Some("CLOSED".into()),
        created: None,
        ended: None,
        billing_minutes: None,
    }
}

pub(crate) fn artifact(filename: &str, kind: &str, url: &str) -> Artifact {
    Artifact {
        filename: filename.to_string(),
        kind: Some(kind.to_string()),
        url: url.to_string(),
    }
}
