//! Device Farm JSON 1.1 client

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::OnceCell;
use url::Url;

use super::credentials::load_credentials;
use super::signing::{SigningParams, sign_request};
use super::{
    Catalog, CreateProjectRequest, CreateProjectResponse, ListArtifactsPage, ListArtifactsRequest,
    ListProjectsPage, ListProjectsRequest, ListSessionsPage, ListSessionsRequest,
};
use crate::config::{AwsConfig, Credentials};
use crate::error::{Error, Result};
use crate::types::Project;

/// `X-Amz-Target` prefix of every Device Farm operation
pub const SERVICE_TARGET_PREFIX: &str = "DeviceFarm_20150623";

const SIGNING_NAME: &str = "devicefarm";
const CONTENT_TYPE: &str = "application/x-amz-json-1.1";

/// Settings a client resolves once, on its first signed call
struct Resolved {
    endpoint: Url,
    region: String,
    credentials: Credentials,
    max_results: Option<u32>,
}

type ConfigLoader = Box<dyn Fn() -> Result<AwsConfig> + Send + Sync>;

/// Catalog backed by the AWS Device Farm API
///
/// One instance is built per run and shared by reference with every listing
/// and create call. Settings and credentials are loaded on the first call,
/// so a run that never reaches Device Farm never needs them.
pub struct DeviceFarmClient {
    http: reqwest::Client,
    load: ConfigLoader,
    resolved: OnceCell<Resolved>,
}

impl DeviceFarmClient {
    /// Create a client for the given settings
    pub fn new(config: AwsConfig) -> Self {
        Self::with_http_client(reqwest::Client::new(), config)
    }

    /// Create a client that reads its settings from the environment on
    /// first use
    pub fn from_env() -> Self {
        Self::with_loader(reqwest::Client::new(), AwsConfig::from_env)
    }

    /// Create a client that sends requests through `http`
    pub fn with_http_client(http: reqwest::Client, config: AwsConfig) -> Self {
        Self::with_loader(http, move || Ok(config.clone()))
    }

    fn with_loader<F>(http: reqwest::Client, load: F) -> Self
    where
        F: Fn() -> Result<AwsConfig> + Send + Sync + 'static,
    {
        Self {
            http,
            load: Box::new(load),
            resolved: OnceCell::new(),
        }
    }

    /// Endpoint requests are sent to, resolving settings if needed
    pub async fn endpoint(&self) -> Result<&Url> {
        Ok(&self.resolved().await?.endpoint)
    }

    async fn resolved(&self) -> Result<&Resolved> {
        self.resolved
            .get_or_try_init(|| async {
                let config = (self.load)()?;
                let endpoint = config.endpoint_url()?;
                let credentials = load_credentials(&config.credentials, &config.region).await?;
                tracing::debug!(endpoint = %endpoint, region = %config.region, "Device Farm client ready");
                Ok::<_, Error>(Resolved {
                    endpoint,
                    region: config.region,
                    credentials,
                    max_results: config.max_results,
                })
            })
            .await
    }

    /// Send one signed operation and decode its response
    async fn call<Req, Resp>(&self, operation: &str, request: &Req) -> Result<Resp>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let resolved = self.resolved().await?;

        let body = serde_json::to_vec(request)?;
        let target = format!("{SERVICE_TARGET_PREFIX}.{operation}");
        let headers = [("content-type", CONTENT_TYPE), ("x-amz-target", target.as_str())];

        let params = SigningParams {
            credentials: &resolved.credentials,
            region: &resolved.region,
            service: SIGNING_NAME,
            time: Utc::now(),
        };
        let auth_headers = sign_request(&params, "POST", &resolved.endpoint, &headers, &body)?;

        let mut builder = self.http.post(resolved.endpoint.clone());
        for (name, value) in headers {
            builder = builder.header(name, value);
        }
        for (name, value) in auth_headers {
            builder = builder.header(name, value);
        }

        tracing::debug!(operation, endpoint = %resolved.endpoint, "calling Device Farm");
        let response = builder.body(body).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let err = api_error(status.as_u16(), &bytes);
            tracing::debug!(operation, status = status.as_u16(), error = %err, "Device Farm call failed");
            return Err(err);
        }

        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Page size to put on listing requests that leave it unset
    async fn page_size(&self, requested: Option<u32>) -> Result<Option<u32>> {
        Ok(requested.or(self.resolved().await?.max_results))
    }
}

#[async_trait]
impl Catalog for DeviceFarmClient {
    async fn list_projects(&self, mut request: ListProjectsRequest) -> Result<ListProjectsPage> {
        request.max_result = self.page_size(request.max_result).await?;
        self.call("ListTestGridProjects", &request).await
    }

    async fn create_project(&self, request: CreateProjectRequest) -> Result<Project> {
        let response: CreateProjectResponse = self.call("CreateTestGridProject", &request).await?;
        Ok(response.test_grid_project)
    }

    async fn list_sessions(&self, mut request: ListSessionsRequest) -> Result<ListSessionsPage> {
        request.max_result = self.page_size(request.max_result).await?;
        self.call("ListTestGridSessions", &request).await
    }

    async fn list_session_artifacts(
        &self,
        mut request: ListArtifactsRequest,
    ) -> Result<ListArtifactsPage> {
        request.max_result = self.page_size(request.max_result).await?;
        self.call("ListTestGridSessionArtifacts", &request).await
    }
}

/// Turn an error response into [`Error::Remote`]
///
/// JSON protocol errors look like `{"__type": "ns#ArgumentException",
/// "message": "..."}`; some services spell the field `Message`. A body that
/// is not JSON is kept as the message.
fn api_error(status: u16, body: &[u8]) -> Error {
    let parsed: Option<serde_json::Value> = serde_json::from_slice(body).ok();
    let field = |name: &str| {
        parsed
            .as_ref()
            .and_then(|v| v.get(name))
            .and_then(|v| v.as_str())
            .map(String::from)
    };

    let code = field("__type")
        .or_else(|| field("code"))
        .map(|t| t.rsplit('#').next().unwrap_or_default().to_string())
        .unwrap_or_else(|| "UnknownError".to_string());
    let message = field("message")
        .or_else(|| field("Message"))
        .unwrap_or_else(|| {
            let text = String::from_utf8_lossy(body).trim().to_string();
            if text.is_empty() {
                format!("{code}: HTTP status {status}")
            } else {
                text
            }
        });

    Error::Remote {
        code,
        message,
        status,
    }
}
