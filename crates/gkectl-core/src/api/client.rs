//! REST client for the container API (v1)

use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use super::error::{ApiError, ApiResult};
use super::types::{
    Cluster, ClusterUpdate, CreateClusterRequest, Operation, ServerConfig, UpdateClusterBody,
};
use super::ClusterManager;
use crate::config::ClientConfig;

/// HTTP implementation of [`ClusterManager`]
#[derive(Clone, Debug)]
pub struct ContainerClient {
    http: reqwest::Client,
    base_url: String,
    access_token: Option<String>,
}

impl ContainerClient {
    /// Build a client from connection settings
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        let base = Url::parse(&config.api_url)?;
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout)
            .build()?;

        debug!(api_url = %base, authenticated = config.access_token.is_some(), "Creating container API client");

        Ok(Self {
            http,
            base_url: base.as_str().trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn location_url(&self, project: &str, location: &str) -> String {
        format!(
            "{}/v1/projects/{}/locations/{}",
            self.base_url, project, location
        )
    }

    fn cluster_url(&self, project: &str, location: &str, name: &str) -> String {
        format!("{}/clusters/{}", self.location_url(project, location), name)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let request = match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        trace!(status = status.as_u16(), url = %response.url(), "API response");

        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_response(status.as_u16(), &body))
    }
}

#[async_trait]
impl ClusterManager for ContainerClient {
    async fn get_cluster(
        &self,
        project: &str,
        location: &str,
        name: &str,
    ) -> ApiResult<Cluster> {
        let url = self.cluster_url(project, location, name);
        debug!(%url, "GET cluster");
        self.send(self.http.get(url)).await
    }

    async fn create_cluster(
        &self,
        project: &str,
        location: &str,
        request: &CreateClusterRequest,
    ) -> ApiResult<Operation> {
        let url = format!("{}/clusters", self.location_url(project, location));
        debug!(%url, cluster = %request.cluster.name, "POST cluster");
        self.send(self.http.post(url).json(request)).await
    }

    async fn update_cluster(
        &self,
        project: &str,
        location: &str,
        name: &str,
        update: &ClusterUpdate,
    ) -> ApiResult<Operation> {
        let url = self.cluster_url(project, location, name);
        debug!(%url, ?update, "PUT cluster");
        self.send(self.http.put(url).json(&UpdateClusterBody { update }))
            .await
    }

    async fn get_operation(
        &self,
        project: &str,
        location: &str,
        operation_id: &str,
    ) -> ApiResult<Operation> {
        let url = format!(
            "{}/operations/{}",
            self.location_url(project, location),
            operation_id
        );
        trace!(%url, "GET operation");
        self.send(self.http.get(url)).await
    }

    async fn get_server_config(&self, project: &str, location: &str) -> ApiResult<ServerConfig> {
        let url = format!("{}/serverConfig", self.location_url(project, location));
        debug!(%url, "GET server config");
        self.send(self.http.get(url)).await
    }
}
