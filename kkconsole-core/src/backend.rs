//! Read-side HTTP client for the KubeKey console backend
//!
//! Cluster listings and version option lookups. Option lookups feed
//! selection lists, so a failed lookup yields an empty list and a warning
//! rather than an error.

use crate::config::{
    BackendConfig, CLUSTER_LIST_PATH, CLUSTER_VERSION_OPTIONS_PATH, KS_VERSION_OPTIONS_PATH,
};
use crate::error::{ConsoleError, ConsoleResult};
use crate::spec::SpecDocument;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

#[derive(Debug, Deserialize)]
struct ClusterListResponse {
    #[serde(rename = "clusterData", default)]
    cluster_data: Vec<serde_json::Value>,
}

#[derive(Debug, Clone)]
pub struct BackendClient {
    base: Url,
    http: reqwest::Client,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> ConsoleResult<Self> {
        let http = reqwest::ClientBuilder::new()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            base: config.http_base()?,
            http,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Clusters currently managed by the backend, as editable documents
    pub async fn list_clusters(&self) -> ConsoleResult<Vec<SpecDocument>> {
        let url = self.base.join(CLUSTER_LIST_PATH)?;
        let body: ClusterListResponse = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        debug!(count = body.cluster_data.len(), "cluster list fetched");
        body.cluster_data
            .iter()
            .map(|entry| SpecDocument::new(serde_yaml::to_value(entry)?))
            .collect()
    }

    /// Look a cluster up by its `metadata.name`
    pub async fn find_cluster(&self, name: &str) -> ConsoleResult<SpecDocument> {
        self.list_clusters()
            .await?
            .into_iter()
            .find(|doc| doc.name() == name)
            .ok_or_else(|| ConsoleError::ClusterNotFound {
                name: name.to_string(),
            })
    }

    /// Kubernetes versions the backend can install
    pub async fn kubernetes_versions(&self) -> Vec<String> {
        self.options(CLUSTER_VERSION_OPTIONS_PATH, "clusterVersionOptions")
            .await
    }

    /// KubeSphere versions compatible with a Kubernetes version
    pub async fn kubesphere_versions(&self, kubernetes_version: &str) -> Vec<String> {
        let path = format!("{}/{}", KS_VERSION_OPTIONS_PATH, kubernetes_version);
        self.options(&path, "ksVersionOptions").await
    }

    async fn options(&self, path: &str, field: &str) -> Vec<String> {
        match self.fetch_options(path, field).await {
            Ok(options) => options,
            Err(e) => {
                warn!(path, error = %e, "option lookup failed");
                Vec::new()
            }
        }
    }

    async fn fetch_options(&self, path: &str, field: &str) -> ConsoleResult<Vec<String>> {
        let url = self.base.join(path)?;
        let mut body: serde_json::Value = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        match body.get_mut(field).map(serde_json::Value::take) {
            Some(list) => Ok(serde_json::from_value(list)?),
            None => Err(ConsoleError::serialization(
                "json",
                std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("response has no '{}' field", field),
                ),
            )),
        }
    }
}
